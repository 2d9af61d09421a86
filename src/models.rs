use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Followers,
    Following,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Followers, Tab::Following];

    pub fn as_index(&self) -> usize {
        match self {
            Tab::Followers => 0,
            Tab::Following => 1,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Followers => "Followers",
            Tab::Following => "Following",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Tab::Followers => "followers",
            Tab::Following => "following",
        }
    }

    pub fn other(&self) -> Tab {
        match self {
            Tab::Followers => Tab::Following,
            Tab::Following => Tab::Followers,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Tab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "followers" | "0" => Ok(Tab::Followers),
            "following" | "1" => Ok(Tab::Following),
            other => Err(anyhow::anyhow!("unknown tab '{}', expected followers or following", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub is_following: bool,
}

// Ids repeat once the list has been padded with duplicates, so the position
// is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub id: String,
    pub position: usize,
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.id, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub page_size: u32,
}

impl PageCursor {
    pub fn first(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }

    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    #[serde(default)]
    pub data: Vec<User>,
    pub page: u32,
    pub total_pages: u32,
}

impl PageResponse {
    pub fn has_more(&self) -> bool {
        self.total_pages > self.page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Reset,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Page(PageResponse),
    Empty { page: u32, total_pages: u32 },
    Failed(String),
}

impl FetchOutcome {
    pub fn from_result(result: anyhow::Result<Option<PageResponse>>) -> Self {
        match result {
            Ok(Some(response)) if response.data.is_empty() => FetchOutcome::Empty {
                page: response.page,
                total_pages: response.total_pages,
            },
            Ok(Some(response)) => FetchOutcome::Page(response),
            Ok(None) => FetchOutcome::Failed("empty response".to_string()),
            Err(e) => FetchOutcome::Failed(format!("{:#}", e)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Fetch(FetchMode),
    Degrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub tab: Tab,
    pub page: u32,
    pub kind: TicketKind,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { ticket: Ticket, page_size: u32 },
    Delay { ticket: Ticket, duration: Duration },
}

impl Effect {
    pub fn ticket(&self) -> Ticket {
        match self {
            Effect::Fetch { ticket, .. } | Effect::Delay { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Fetched(Ticket, FetchOutcome),
    DelayElapsed(Ticket),
}

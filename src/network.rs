use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::debug;

use crate::models::{PageResponse, Tab, User};

/// Source of follow list pages. `Ok(None)` means the backend answered
/// without a usable body.
#[async_trait]
pub trait FollowApi: Send + Sync {
    async fn fetch_page(&self, tab: Tab, page: u32, page_size: u32) -> Result<Option<PageResponse>>;
}

pub struct HttpFollowApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFollowApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self, tab: Tab) -> String {
        format!("{}/{}", self.base_url, tab.endpoint())
    }
}

#[async_trait]
impl FollowApi for HttpFollowApi {
    async fn fetch_page(&self, tab: Tab, page: u32, page_size: u32) -> Result<Option<PageResponse>> {
        let url = self.endpoint(tab);
        debug!(%url, page, page_size, "GET");
        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await
            .with_context(|| format!("requesting {}", url))?
            .error_for_status()?;
        let body = response.text().await?;
        decode_page(&body)
    }
}

/// Parses a page body; blank bodies and `null` carry no page.
pub fn decode_page(body: &str) -> Result<Option<PageResponse>> {
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Ok(None);
    }
    let page = serde_json::from_str(body).context("decoding page response")?;
    Ok(Some(page))
}

const FIXTURE_NAMES: [&str; 12] = [
    "Ada Lovelace",
    "Grace Hopper",
    "Alan Turing",
    "Barbara Liskov",
    "Ken Thompson",
    "Margaret Hamilton",
    "Dennis Ritchie",
    "Frances Allen",
    "Edsger Dijkstra",
    "Radia Perlman",
    "Donald Knuth",
    "Hedy Lamarr",
];

pub struct FixtureApi {
    followers: u32,
    following: u32,
    latency: Duration,
    failures: Mutex<HashSet<(Tab, u32)>>,
    calls: AtomicUsize,
}

impl FixtureApi {
    pub fn new(followers: u32, following: u32) -> Self {
        Self {
            followers,
            following,
            latency: Duration::ZERO,
            failures: Mutex::new(HashSet::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The next request for `page` of `tab` fails; later ones succeed.
    pub fn fail_once(self, tab: Tab, page: u32) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert((tab, page));
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn total(&self, tab: Tab) -> u32 {
        match tab {
            Tab::Followers => self.followers,
            Tab::Following => self.following,
        }
    }

    fn user(tab: Tab, index: u32) -> User {
        let name = FIXTURE_NAMES[index as usize % FIXTURE_NAMES.len()];
        let handle = name.to_ascii_lowercase().replace(' ', "_");
        User {
            id: format!("{}-{}", tab.endpoint(), index),
            name: name.to_string(),
            username: format!("{}{}", handle, index),
            is_following: match tab {
                Tab::Following => true,
                Tab::Followers => index % 3 != 0,
            },
        }
    }
}

#[async_trait]
impl FollowApi for FixtureApi {
    async fn fetch_page(&self, tab: Tab, page: u32, page_size: u32) -> Result<Option<PageResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let should_fail = self
            .failures
            .lock()
            .map_err(|_| anyhow!("fixture state poisoned"))?
            .remove(&(tab, page));
        if should_fail {
            return Err(anyhow!("fixture failure for {} page {}", tab, page));
        }

        if page == 0 || page_size == 0 {
            return Err(anyhow!("invalid page request {}/{}", page, page_size));
        }

        let total = self.total(tab);
        let total_pages = total.div_ceil(page_size);
        let start = (page - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        let data = (start..end).map(|i| Self::user(tab, i)).collect();

        Ok(Some(PageResponse { data, page, total_pages }))
    }
}

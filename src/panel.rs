use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{
    Completion, Effect, FetchMode, FetchOutcome, PageCursor, RowKey, Tab, Ticket, TicketKind,
    User,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FirstLoadStrategy {
    #[default]
    AlwaysFetch,
    // Branches on the outgoing tab's has-more flag.
    InheritPrevious,
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub page_size: u32,
    pub degrade_delay: Duration,
    pub first_load_strategy: FirstLoadStrategy,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            degrade_delay: Duration::from_millis(500),
            first_load_strategy: FirstLoadStrategy::default(),
        }
    }
}

// Replaced as a whole on each transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub tab: Tab,
    pub cursor: PageCursor,
    pub has_more: bool,
    pub outstanding: Option<Ticket>,
    pub first_load_pending: bool,
    pub generation: u64,
    pub last_error: Option<String>,
}

impl Snapshot {
    fn initial(tab: Tab, page_size: u32) -> Self {
        Self {
            tab,
            cursor: PageCursor::first(page_size),
            has_more: false,
            outstanding: None,
            first_load_pending: true,
            generation: 0,
            last_error: None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.outstanding.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSlot<'a> {
    User { key: RowKey, user: &'a User },
    Placeholder(usize),
}

/// While the first load is pending only placeholders are shown. Afterwards
/// the users are listed, with a trailing block of placeholders while a load
/// is running.
pub fn select_rows<'a>(
    first_load_pending: bool,
    in_flight: bool,
    users: &'a [User],
    page_size: u32,
) -> Vec<RowSlot<'a>> {
    let placeholders = (0..page_size as usize).map(RowSlot::Placeholder);
    if first_load_pending {
        return placeholders.collect();
    }

    let mut rows: Vec<RowSlot<'a>> = users
        .iter()
        .enumerate()
        .map(|(position, user)| RowSlot::User {
            key: RowKey { id: user.id.clone(), position },
            user,
        })
        .collect();
    if in_flight {
        rows.extend(placeholders);
    }
    rows
}

pub struct Panel {
    config: PanelConfig,
    snapshot: Snapshot,
    users: Vec<User>,
    next_ticket: u64,
}

impl Panel {
    pub fn new(config: PanelConfig, tab: Tab) -> Self {
        let snapshot = Snapshot::initial(tab, config.page_size);
        Self {
            config,
            snapshot,
            users: Vec::new(),
            next_ticket: 1,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn visible_user_count(&self) -> usize {
        if self.snapshot.first_load_pending {
            0
        } else {
            self.users.len()
        }
    }

    pub fn rows(&self) -> Vec<RowSlot<'_>> {
        select_rows(
            self.snapshot.first_load_pending,
            self.snapshot.in_flight(),
            &self.users,
            self.snapshot.cursor.page_size,
        )
    }

    pub fn mount(&mut self) -> Vec<Effect> {
        info!(tab = %self.snapshot.tab, "mounting follow panel");
        self.settle()
    }

    pub fn teardown(&mut self) -> Option<Ticket> {
        let outstanding = self.snapshot.outstanding;
        self.snapshot = Snapshot {
            outstanding: None,
            ..self.snapshot.clone()
        };
        outstanding
    }

    pub fn select_tab(&mut self, tab: Tab) -> Vec<Effect> {
        if tab == self.snapshot.tab {
            debug!(%tab, "tab already active");
            return Vec::new();
        }

        let previous = self.snapshot.clone();
        self.users.clear();
        self.snapshot = Snapshot {
            tab,
            cursor: PageCursor::first(self.config.page_size),
            has_more: false,
            outstanding: previous.outstanding,
            first_load_pending: true,
            generation: previous.generation + 1,
            last_error: None,
        };
        info!(from = %previous.tab, to = %tab, generation = self.snapshot.generation, "switching tab");

        if previous.in_flight() {
            // The running request finishes first, is dropped as stale, and
            // the first-load rule picks the new tab up from there.
            debug!("previous load still running, deferring first load");
            return Vec::new();
        }

        match self.config.first_load_strategy {
            FirstLoadStrategy::AlwaysFetch => vec![self.request_page(FetchMode::Reset)],
            FirstLoadStrategy::InheritPrevious if previous.has_more => {
                vec![self.request_page(FetchMode::Reset)]
            }
            FirstLoadStrategy::InheritPrevious => self.degrade(),
        }
    }

    pub fn on_sentinel_visible(&mut self) -> Vec<Effect> {
        if self.snapshot.in_flight() {
            debug!("sentinel visible while loading, ignored");
            return Vec::new();
        }
        if self.snapshot.first_load_pending {
            debug!("sentinel visible before first load, ignored");
            return Vec::new();
        }
        if self.snapshot.last_error.is_some() {
            debug!("sentinel visible after a failed load, waiting for retry");
            return Vec::new();
        }
        self.load_next()
    }

    pub fn retry(&mut self) -> Vec<Effect> {
        if self.snapshot.in_flight() || self.snapshot.last_error.is_none() {
            return Vec::new();
        }
        info!(tab = %self.snapshot.tab, page = self.snapshot.cursor.page, "retrying load");
        self.snapshot = Snapshot {
            last_error: None,
            ..self.snapshot.clone()
        };
        if self.snapshot.first_load_pending {
            self.settle()
        } else {
            self.load_next()
        }
    }

    pub fn on_completion(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::Fetched(ticket, outcome) => self.on_fetch_complete(ticket, outcome),
            Completion::DelayElapsed(ticket) => self.on_delay_elapsed(ticket),
        }
    }

    pub fn on_fetch_complete(&mut self, ticket: Ticket, outcome: FetchOutcome) -> Vec<Effect> {
        if !self.release(ticket) {
            return Vec::new();
        }
        if ticket.generation != self.snapshot.generation {
            warn!(
                tab = %ticket.tab,
                page = ticket.page,
                active = %self.snapshot.tab,
                "discarding response for abandoned tab"
            );
            return self.settle();
        }
        self.apply_outcome(ticket, outcome);
        self.settle()
    }

    pub fn on_delay_elapsed(&mut self, ticket: Ticket) -> Vec<Effect> {
        if !self.release(ticket) {
            return Vec::new();
        }
        self.settle()
    }

    fn load_next(&mut self) -> Vec<Effect> {
        if self.snapshot.has_more {
            let cursor = PageCursor {
                page: self.snapshot.cursor.next_page(),
                ..self.snapshot.cursor
            };
            self.snapshot = Snapshot {
                cursor,
                ..self.snapshot.clone()
            };
            vec![self.request_page(FetchMode::Append)]
        } else {
            self.degrade()
        }
    }

    fn request_page(&mut self, mode: FetchMode) -> Effect {
        let ticket = self.issue(TicketKind::Fetch(mode));
        debug!(tab = %ticket.tab, page = ticket.page, ?mode, ticket = ticket.id, "requesting page");
        self.snapshot = Snapshot {
            outstanding: Some(ticket),
            ..self.snapshot.clone()
        };
        Effect::Fetch {
            ticket,
            page_size: self.snapshot.cursor.page_size,
        }
    }

    fn degrade(&mut self) -> Vec<Effect> {
        if self.users.is_empty() {
            debug!(tab = %self.snapshot.tab, "nothing to duplicate");
            return self.settle();
        }

        let count = self.users.len().min(self.snapshot.cursor.page_size as usize);
        let head: Vec<User> = self.users[..count].to_vec();
        self.users.extend(head);

        let ticket = self.issue(TicketKind::Degrade);
        debug!(tab = %ticket.tab, appended = count, total = self.users.len(), "duplicated rows");
        self.snapshot = Snapshot {
            outstanding: Some(ticket),
            ..self.snapshot.clone()
        };
        vec![Effect::Delay {
            ticket,
            duration: self.config.degrade_delay,
        }]
    }

    // An idle panel whose first load is still pending fetches page 1,
    // unless the last attempt failed.
    fn settle(&mut self) -> Vec<Effect> {
        let s = &self.snapshot;
        if s.first_load_pending && !s.in_flight() && s.last_error.is_none() {
            vec![self.request_page(FetchMode::Reset)]
        } else {
            Vec::new()
        }
    }

    fn issue(&mut self, kind: TicketKind) -> Ticket {
        let ticket = Ticket {
            id: self.next_ticket,
            tab: self.snapshot.tab,
            page: self.snapshot.cursor.page,
            kind,
            generation: self.snapshot.generation,
        };
        self.next_ticket += 1;
        ticket
    }

    fn release(&mut self, ticket: Ticket) -> bool {
        if self.snapshot.outstanding != Some(ticket) {
            warn!(ticket = ticket.id, "completion for unknown ticket ignored");
            return false;
        }
        self.snapshot = Snapshot {
            outstanding: None,
            ..self.snapshot.clone()
        };
        true
    }

    fn apply_outcome(&mut self, ticket: Ticket, outcome: FetchOutcome) {
        let mode = match ticket.kind {
            TicketKind::Fetch(mode) => mode,
            TicketKind::Degrade => return,
        };

        let mut next = self.snapshot.clone();
        match outcome {
            FetchOutcome::Page(response) => {
                next.has_more = response.has_more();
                let received = response.data.len();
                match mode {
                    FetchMode::Reset => self.users = response.data,
                    FetchMode::Append => self.users.extend(response.data),
                }
                next.first_load_pending = false;
                next.last_error = None;
                info!(
                    tab = %ticket.tab,
                    page = ticket.page,
                    received,
                    total = self.users.len(),
                    has_more = next.has_more,
                    "page loaded"
                );
            }
            FetchOutcome::Empty { page, total_pages } => {
                next.has_more = total_pages > page;
                if mode == FetchMode::Reset {
                    self.users.clear();
                }
                next.first_load_pending = false;
                next.last_error = None;
                info!(tab = %ticket.tab, page, total_pages, "empty page");
            }
            FetchOutcome::Failed(reason) => {
                warn!(tab = %ticket.tab, page = ticket.page, %reason, "page load failed");
                if mode == FetchMode::Append {
                    next.cursor.page = ticket.page.saturating_sub(1).max(1);
                }
                next.last_error = Some(reason);
            }
        }
        self.snapshot = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageResponse;

    fn users(prefix: &str, page: u32, count: usize) -> Vec<User> {
        (0..count)
            .map(|i| User {
                id: format!("{}-{}-{}", prefix, page, i),
                name: format!("User {} {}", page, i),
                username: format!("user_{}_{}", page, i),
                is_following: i % 2 == 0,
            })
            .collect()
    }

    fn page(prefix: &str, page: u32, total_pages: u32, count: usize) -> FetchOutcome {
        FetchOutcome::Page(PageResponse {
            data: users(prefix, page, count),
            page,
            total_pages,
        })
    }

    fn single(effects: Vec<Effect>) -> Effect {
        assert_eq!(effects.len(), 1, "expected exactly one effect: {:?}", effects);
        effects.into_iter().next().unwrap()
    }

    fn fetch_ticket(effect: &Effect, mode: FetchMode) -> Ticket {
        match effect {
            Effect::Fetch { ticket, .. } => {
                assert_eq!(ticket.kind, TicketKind::Fetch(mode));
                *ticket
            }
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    fn loaded_first_page() -> Panel {
        let mut panel = Panel::new(PanelConfig::default(), Tab::Followers);
        let ticket = fetch_ticket(&single(panel.mount()), FetchMode::Reset);
        assert_eq!(ticket.tab, Tab::Followers);
        assert_eq!(ticket.page, 1);
        assert!(panel.on_fetch_complete(ticket, page("f", 1, 3, 20)).is_empty());
        panel
    }

    #[test]
    fn first_page_populates_list() {
        let panel = loaded_first_page();
        let s = panel.snapshot();
        assert!(s.has_more);
        assert!(!s.first_load_pending);
        assert!(!s.in_flight());
        assert_eq!(panel.users().len(), 20);
    }

    #[test]
    fn scrolling_to_end_appends_next_page() {
        let mut panel = loaded_first_page();
        let effect = single(panel.on_sentinel_visible());
        let ticket = fetch_ticket(&effect, FetchMode::Append);
        assert_eq!(ticket.page, 2);
        assert_eq!(panel.snapshot().cursor.page, 2);

        panel.on_fetch_complete(ticket, page("f", 2, 3, 20));
        assert_eq!(panel.users().len(), 40);
        assert!(panel.snapshot().has_more);
    }

    #[test]
    fn last_page_switches_to_duplication() {
        let mut panel = loaded_first_page();
        for n in 2..=3 {
            let ticket = fetch_ticket(&single(panel.on_sentinel_visible()), FetchMode::Append);
            assert_eq!(ticket.page, n);
            panel.on_fetch_complete(ticket, page("f", n, 3, 20));
        }
        assert_eq!(panel.users().len(), 60);
        assert!(!panel.snapshot().has_more);

        let effect = single(panel.on_sentinel_visible());
        let ticket = match effect {
            Effect::Delay { ticket, duration } => {
                assert_eq!(duration, Duration::from_millis(500));
                assert_eq!(ticket.kind, TicketKind::Degrade);
                ticket
            }
            other => panic!("expected delay, got {:?}", other),
        };
        assert_eq!(panel.users().len(), 80);
        assert_eq!(panel.users()[60..], panel.users()[..20]);
        assert!(panel.snapshot().in_flight());

        assert!(panel.on_delay_elapsed(ticket).is_empty());
        assert!(!panel.snapshot().in_flight());
    }

    #[test]
    fn late_response_for_abandoned_tab_is_dropped() {
        let mut panel = loaded_first_page();
        let stale = fetch_ticket(&single(panel.on_sentinel_visible()), FetchMode::Append);

        assert!(panel.select_tab(Tab::Following).is_empty());
        assert_eq!(panel.snapshot().tab, Tab::Following);
        assert!(panel.users().is_empty());
        assert!(panel.snapshot().in_flight());

        let effect = single(panel.on_fetch_complete(stale, page("f", 2, 3, 20)));
        assert!(panel.users().is_empty());
        let fresh = fetch_ticket(&effect, FetchMode::Reset);
        assert_eq!(fresh.tab, Tab::Following);
        assert_eq!(fresh.page, 1);

        panel.on_fetch_complete(fresh, page("g", 1, 1, 5));
        assert_eq!(panel.users().len(), 5);
        assert!(panel.users().iter().all(|u| u.id.starts_with("g-")));
    }

    #[test]
    fn empty_first_page_shows_nothing() {
        let mut panel = Panel::new(PanelConfig::default(), Tab::Followers);
        let ticket = fetch_ticket(&single(panel.mount()), FetchMode::Reset);
        panel.on_fetch_complete(ticket, FetchOutcome::Empty { page: 1, total_pages: 0 });

        assert!(panel.users().is_empty());
        assert!(!panel.snapshot().has_more);
        assert!(!panel.snapshot().first_load_pending);
        assert!(panel.rows().is_empty());
        assert!(panel.on_sentinel_visible().is_empty());
        assert!(panel.rows().is_empty());
    }

    #[test]
    fn switching_away_and_back_resets_cursor() {
        let mut panel = loaded_first_page();
        let ticket = fetch_ticket(&single(panel.on_sentinel_visible()), FetchMode::Append);
        panel.on_fetch_complete(ticket, page("f", 2, 3, 20));

        panel.select_tab(Tab::Following);
        panel.select_tab(Tab::Followers);
        let s = panel.snapshot();
        assert_eq!(s.tab, Tab::Followers);
        assert_eq!(s.cursor.page, 1);
        assert!(s.first_load_pending);
        assert!(!s.has_more);
        assert!(panel.users().is_empty());
    }

    #[test]
    fn append_grows_by_page_length() {
        let mut panel = loaded_first_page();
        for (n, count) in [(2, 20), (3, 7)] {
            let before = panel.users().len();
            let ticket = fetch_ticket(&single(panel.on_sentinel_visible()), FetchMode::Append);
            panel.on_fetch_complete(ticket, page("f", n, 4, count));
            assert_eq!(panel.users().len(), before + count);
        }
    }

    #[test]
    fn empty_append_keeps_list() {
        let mut panel = loaded_first_page();
        let ticket = fetch_ticket(&single(panel.on_sentinel_visible()), FetchMode::Append);
        panel.on_fetch_complete(ticket, FetchOutcome::Empty { page: 2, total_pages: 2 });
        assert_eq!(panel.users().len(), 20);
        assert!(!panel.snapshot().has_more);
    }

    #[test]
    fn never_issues_work_while_busy() {
        let mut panel = loaded_first_page();
        let mut outstanding: Option<Ticket> = None;
        let mut served = 0;

        // Interleave clicks and sentinel hits with completions.
        let script = [
            "sentinel", "sentinel", "tab", "sentinel", "complete", "sentinel", "tab", "tab",
            "complete", "sentinel", "sentinel", "complete", "tab", "complete", "sentinel",
            "complete", "complete",
        ];
        for step in script {
            let busy = panel.snapshot().in_flight();
            let effects = match step {
                "sentinel" => panel.on_sentinel_visible(),
                "tab" => {
                    let other = panel.snapshot().tab.other();
                    panel.select_tab(other)
                }
                _ => match outstanding.take() {
                    Some(t) => match t.kind {
                        TicketKind::Degrade => panel.on_delay_elapsed(t),
                        TicketKind::Fetch(_) => {
                            served += 1;
                            panel.on_fetch_complete(t, page("x", t.page, 2, 3))
                        }
                    },
                    None => Vec::new(),
                },
            };
            if busy && step != "complete" {
                assert!(effects.is_empty(), "{} issued work while busy", step);
            }
            assert!(effects.len() <= 1);
            if let Some(effect) = effects.first() {
                assert!(outstanding.is_none());
                outstanding = Some(effect.ticket());
            }
            assert_eq!(outstanding, panel.snapshot().outstanding);
        }
        assert!(served > 0);
    }

    #[test]
    fn duplication_is_bounded_by_page_size_and_length() {
        let config = PanelConfig { page_size: 20, ..PanelConfig::default() };
        let mut panel = Panel::new(config, Tab::Followers);
        let ticket = fetch_ticket(&single(panel.mount()), FetchMode::Reset);
        panel.on_fetch_complete(ticket, page("f", 1, 1, 5));

        let effect = single(panel.on_sentinel_visible());
        assert_eq!(panel.users().len(), 10);
        panel.on_delay_elapsed(effect.ticket());

        single(panel.on_sentinel_visible());
        assert_eq!(panel.users().len(), 20);
    }

    #[test]
    fn exhausted_tab_keeps_duplicating_until_switch() {
        let mut panel = Panel::new(PanelConfig::default(), Tab::Followers);
        let ticket = fetch_ticket(&single(panel.mount()), FetchMode::Reset);
        panel.on_fetch_complete(ticket, page("f", 1, 1, 20));

        for _ in 0..4 {
            let effect = single(panel.on_sentinel_visible());
            assert!(matches!(effect, Effect::Delay { .. }));
            panel.on_delay_elapsed(effect.ticket());
        }
        assert_eq!(panel.users().len(), 100);

        let effect = single(panel.select_tab(Tab::Following));
        fetch_ticket(&effect, FetchMode::Reset);
    }

    #[test]
    fn failed_first_load_waits_for_retry() {
        let mut panel = Panel::new(PanelConfig::default(), Tab::Followers);
        let ticket = fetch_ticket(&single(panel.mount()), FetchMode::Reset);

        assert!(panel.on_fetch_complete(ticket, FetchOutcome::Failed("offline".into())).is_empty());
        let s = panel.snapshot();
        assert!(!s.in_flight());
        assert!(s.first_load_pending);
        assert_eq!(s.last_error.as_deref(), Some("offline"));
        assert_eq!(panel.rows().len(), 20);

        let retry = fetch_ticket(&single(panel.retry()), FetchMode::Reset);
        assert_eq!(retry.page, 1);
        assert!(panel.snapshot().last_error.is_none());
    }

    #[test]
    fn failed_append_requests_same_page_again() {
        let mut panel = loaded_first_page();
        let ticket = fetch_ticket(&single(panel.on_sentinel_visible()), FetchMode::Append);
        panel.on_fetch_complete(ticket, FetchOutcome::Failed("timeout".into()));

        assert_eq!(panel.users().len(), 20);
        assert!(panel.snapshot().has_more);
        assert_eq!(panel.snapshot().cursor.page, 1);

        assert!(panel.on_sentinel_visible().is_empty());
        assert!(panel.snapshot().last_error.is_some());

        let again = fetch_ticket(&single(panel.retry()), FetchMode::Append);
        assert_eq!(again.page, 2);
        assert!(panel.retry().is_empty());
    }

    #[test]
    fn cursor_page_size_sizes_requests_and_placeholders() {
        let config = PanelConfig { page_size: 7, ..PanelConfig::default() };
        let mut panel = Panel::new(config, Tab::Followers);
        assert_eq!(panel.snapshot().cursor.page_size, 7);

        let effect = single(panel.mount());
        assert!(matches!(effect, Effect::Fetch { page_size: 7, .. }));
        assert_eq!(panel.rows().len(), 7);

        panel.on_fetch_complete(effect.ticket(), page("f", 1, 1, 10));
        single(panel.on_sentinel_visible());
        assert_eq!(panel.users().len(), 17);
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let mut panel = loaded_first_page();
        let bogus = Ticket {
            id: 999,
            tab: Tab::Followers,
            page: 9,
            kind: TicketKind::Fetch(FetchMode::Append),
            generation: 0,
        };
        assert!(panel.on_fetch_complete(bogus, page("f", 9, 9, 20)).is_empty());
        assert_eq!(panel.users().len(), 20);
    }

    #[test]
    fn inherit_previous_fetches_when_outgoing_tab_had_more() {
        let config = PanelConfig {
            first_load_strategy: FirstLoadStrategy::InheritPrevious,
            ..PanelConfig::default()
        };
        let mut panel = Panel::new(config, Tab::Followers);
        let ticket = fetch_ticket(&single(panel.mount()), FetchMode::Reset);
        panel.on_fetch_complete(ticket, page("f", 1, 2, 20));

        let effect = single(panel.select_tab(Tab::Following));
        assert_eq!(fetch_ticket(&effect, FetchMode::Reset).tab, Tab::Following);
    }

    #[test]
    fn inherit_previous_without_more_falls_through_to_fetch() {
        let config = PanelConfig {
            first_load_strategy: FirstLoadStrategy::InheritPrevious,
            ..PanelConfig::default()
        };
        let mut panel = Panel::new(config, Tab::Followers);
        let ticket = fetch_ticket(&single(panel.mount()), FetchMode::Reset);
        panel.on_fetch_complete(ticket, page("f", 1, 1, 20));

        // The cleared list has nothing to duplicate, so the first-load rule
        // fetches page 1 of the new tab.
        let effect = single(panel.select_tab(Tab::Following));
        assert_eq!(fetch_ticket(&effect, FetchMode::Reset).page, 1);
        assert!(panel.users().is_empty());
    }

    #[test]
    fn selecting_active_tab_is_a_no_op() {
        let mut panel = loaded_first_page();
        assert!(panel.select_tab(Tab::Followers).is_empty());
        assert_eq!(panel.users().len(), 20);
    }

    #[test]
    fn render_selection() {
        let list = users("f", 1, 3);

        let rows = select_rows(true, true, &list, 4);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| matches!(r, RowSlot::Placeholder(_))));

        let rows = select_rows(false, false, &list, 4);
        assert_eq!(rows.len(), 3);

        let rows = select_rows(false, true, &list, 4);
        assert_eq!(rows.len(), 7);
        assert!(matches!(&rows[2], RowSlot::User { key, .. } if key.position == 2));
        assert!(matches!(rows[3], RowSlot::Placeholder(0)));
    }

    #[test]
    fn duplicated_rows_get_distinct_keys() {
        let mut panel = Panel::new(PanelConfig::default(), Tab::Followers);
        let ticket = fetch_ticket(&single(panel.mount()), FetchMode::Reset);
        panel.on_fetch_complete(ticket, page("f", 1, 1, 2));
        let effect = single(panel.on_sentinel_visible());
        panel.on_delay_elapsed(effect.ticket());

        let keys: Vec<String> = panel
            .rows()
            .iter()
            .filter_map(|r| match r {
                RowSlot::User { key, .. } => Some(key.to_string()),
                RowSlot::Placeholder(_) => None,
            })
            .collect();
        assert_eq!(keys, vec!["f-1-0_0", "f-1-1_1", "f-1-0_2", "f-1-1_3"]);
    }
}

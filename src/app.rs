use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::models::{Completion, Effect, FetchOutcome, Tab};
use crate::network::FollowApi;
use crate::panel::Panel;
use crate::scroll::{InfiniteScroll, Viewport};

pub struct App {
    panel: Panel,
    scroll: InfiniteScroll,
    api: Arc<dyn FollowApi>,
    runtime: Handle,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    cancel: CancellationToken,
    selected: usize,
    offset: usize,
    viewport_height: usize,
}

impl App {
    pub fn new(panel: Panel, api: Arc<dyn FollowApi>, runtime: Handle, sentinel_threshold: usize) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            panel,
            scroll: InfiniteScroll::new(sentinel_threshold),
            api,
            runtime,
            tx,
            rx,
            cancel: CancellationToken::new(),
            selected: 0,
            offset: 0,
            viewport_height: 0,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn start(&mut self) {
        let effects = self.panel.mount();
        self.run_effects(effects);
    }

    pub fn pump(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            let effects = self.panel.on_completion(completion);
            self.run_effects(effects);
        }
        self.sync_sentinel();
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        if height != self.viewport_height {
            self.viewport_height = height;
            self.follow_selection();
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.panel.snapshot().tab {
            return;
        }
        let effects = self.panel.select_tab(tab);
        self.selected = 0;
        self.offset = 0;
        self.run_effects(effects);
        self.sync_sentinel();
    }

    pub fn retry(&mut self) {
        let effects = self.panel.retry();
        self.run_effects(effects);
    }

    pub fn move_selection(&mut self, delta: isize) {
        let count = self.panel.visible_user_count();
        if count == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, count as isize - 1) as usize;
        self.follow_selection();
        self.sync_sentinel();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.follow_selection();
    }

    pub fn select_last(&mut self) {
        self.selected = self.panel.visible_user_count().saturating_sub(1);
        self.follow_selection();
        self.sync_sentinel();
    }

    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(ticket) = self.panel.teardown() {
            debug!(ticket = ticket.id, "cancelled outstanding work");
        }
        self.scroll.release();
        info!("follow panel shut down");
    }

    fn follow_selection(&mut self) {
        let height = self.viewport_height.max(1);
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }

    fn sync_sentinel(&mut self) {
        let count = self.panel.visible_user_count();
        self.scroll.attach(count);
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
            self.offset = self.offset.min(self.selected);
        }
        if self.viewport_height == 0 {
            return;
        }
        let viewport = Viewport::new(self.offset, self.viewport_height);
        let busy = self.panel.snapshot().in_flight();
        if self.scroll.observe(viewport, busy) {
            debug!(sentinel = ?self.scroll.sentinel(), "sentinel visible");
            let effects = self.panel.on_sentinel_visible();
            self.run_effects(effects);
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            debug!(ticket = effect.ticket().id, "running effect");
            let tx = self.tx.clone();
            let token = self.cancel.child_token();
            match effect {
                Effect::Fetch { ticket, page_size } => {
                    let api = Arc::clone(&self.api);
                    self.runtime.spawn(async move {
                        tokio::select! {
                            _ = token.cancelled() => {}
                            result = api.fetch_page(ticket.tab, ticket.page, page_size) => {
                                let outcome = FetchOutcome::from_result(result);
                                let _ = tx.send(Completion::Fetched(ticket, outcome));
                            }
                        }
                    });
                }
                Effect::Delay { ticket, duration } => {
                    self.runtime.spawn(async move {
                        tokio::select! {
                            _ = token.cancelled() => {}
                            _ = tokio::time::sleep(duration) => {
                                let _ = tx.send(Completion::DelayElapsed(ticket));
                            }
                        }
                    });
                }
            }
        }
    }
}

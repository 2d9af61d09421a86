#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(offset: usize, height: usize) -> Self {
        Self { offset, height }
    }

    /// Whether `index` is on screen or within `threshold` rows below it.
    pub fn reaches(&self, index: usize, threshold: usize) -> bool {
        index >= self.offset && index < self.offset + self.height + threshold
    }
}

// Fires on the transition into view only, never while busy. A row that stays
// on screen fires again after re-attaching or leaving and re-entering.
#[derive(Debug, Clone, Default)]
pub struct InfiniteScroll {
    threshold: usize,
    sentinel: Option<usize>,
    signalled: bool,
}

impl InfiniteScroll {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            sentinel: None,
            signalled: false,
        }
    }

    pub fn sentinel(&self) -> Option<usize> {
        self.sentinel
    }

    pub fn attach(&mut self, len: usize) {
        let sentinel = len.checked_sub(1);
        if sentinel != self.sentinel {
            self.sentinel = sentinel;
            self.signalled = false;
        }
    }

    pub fn release(&mut self) {
        self.sentinel = None;
        self.signalled = false;
    }

    pub fn observe(&mut self, viewport: Viewport, busy: bool) -> bool {
        let Some(index) = self.sentinel else {
            return false;
        };
        let visible = viewport.reaches(index, self.threshold) && !busy;
        let fired = visible && !self.signalled;
        self.signalled = visible;
        fired
    }
}

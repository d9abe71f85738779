//! Render generation clock
//!
//! A single monotonically increasing stamp devalues every previously rendered
//! surface in O(1): a page's content is stale iff its recorded stamp differs
//! from the current one. Nothing is enumerated or marked dirty; staleness is
//! discovered lazily the next time a page is considered for rendering.

/// Monotonic counter stamped onto every render result.
#[derive(Debug)]
pub struct GenerationClock {
    current: u64,
}

impl GenerationClock {
    #[must_use]
    pub fn new() -> Self {
        Self { current: 1 }
    }

    /// Advance the clock. Called exactly on document (re)load, scale change,
    /// and container resize.
    pub fn advance(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    #[must_use]
    pub fn current(&self) -> u64 {
        self.current
    }
}

impl Default for GenerationClock {
    fn default() -> Self {
        Self::new()
    }
}

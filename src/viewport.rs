//! Viewport visibility tracking
//!
//! Maintains the visible-page set from per-page intersection signals and
//! derives the current page as the mounted page whose top edge sits closest
//! to the container's top. The intersection signals are expected to carry a
//! generous lookahead margin (hundreds of pixels) so pages get scheduled
//! before they scroll into view; that margin is the shell's concern — the
//! tracker just consumes enter/leave events.

use std::collections::BTreeSet;

/// Tracks which page surfaces currently intersect the scroll container.
#[derive(Debug, Default)]
pub struct ViewportTracker {
    visible: BTreeSet<u32>,
}

impl ViewportTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page surface began intersecting the container (lookahead included).
    pub fn page_entered(&mut self, page: u32) {
        self.visible.insert(page);
    }

    /// A page surface stopped intersecting the container.
    pub fn page_left(&mut self, page: u32) {
        self.visible.remove(&page);
    }

    #[must_use]
    pub fn visible(&self) -> &BTreeSet<u32> {
        &self.visible
    }

    /// Forget all visibility state (document reload).
    pub fn clear(&mut self) {
        self.visible.clear();
    }
}

/// The page whose top offset is nearest to `scroll_top`, ties resolving to
/// the lower page number. `None` when no candidates exist — an empty
/// container is a no-op, not an error.
#[must_use]
pub fn nearest_top(scroll_top: f32, tops: impl IntoIterator<Item = (u32, f32)>) -> Option<u32> {
    let mut best: Option<(u32, f32)> = None;

    for (page, top) in tops {
        let delta = (top - scroll_top).abs();
        match best {
            Some((_, best_delta)) if delta >= best_delta => {}
            _ => best = Some((page, delta)),
        }
    }

    best.map(|(page, _)| page)
}

//! Per-page scheduler bookkeeping

use crate::provider::PageSurface;

/// Whether a drawable surface currently exists for a page.
#[derive(Debug)]
pub enum SurfaceState<S> {
    Unmounted,
    Mounted(S),
}

/// Scheduler-owned record for one page number.
///
/// Slots are created lazily as pages become targets and never destroyed
/// individually; global invalidation happens through the generation clock
/// without visiting them.
#[derive(Debug)]
pub struct PageSlot<S> {
    pub number: u32,
    surface: SurfaceState<S>,
    /// Last generation successfully drawn, if any. Content is stale iff this
    /// differs from the clock's current value.
    pub rendered_generation: Option<u64>,
    /// Layout height recorded on the last successful draw.
    pub measured_height: Option<u32>,
    /// Layout size currently shown on the surface. Survives measurement
    /// resets because the fast path rescales whatever is on screen.
    pub layout_size: Option<(u32, u32)>,
    failures: Option<(u64, u32)>,
}

impl<S: PageSurface> PageSlot<S> {
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self {
            number,
            surface: SurfaceState::Unmounted,
            rendered_generation: None,
            measured_height: None,
            layout_size: None,
            failures: None,
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        matches!(self.surface, SurfaceState::Mounted(_))
    }

    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        match &self.surface {
            SurfaceState::Mounted(surface) => Some(surface),
            SurfaceState::Unmounted => None,
        }
    }

    pub fn mount(&mut self, surface: S) {
        self.surface = SurfaceState::Mounted(surface);
    }

    /// Drop the surface handle. Rendered content is gone with it; the
    /// measured height stays so placeholders keep their size.
    pub fn unmount(&mut self) {
        self.surface = SurfaceState::Unmounted;
        self.rendered_generation = None;
        self.layout_size = None;
    }

    pub fn mark_rendered(&mut self, generation: u64, layout: (u32, u32)) {
        self.rendered_generation = Some(generation);
        self.measured_height = Some(layout.1);
        self.layout_size = Some(layout);
        self.failures = None;
    }

    /// Count a draw failure within `generation`. Returns the consecutive
    /// failure count for that generation.
    pub fn record_failure(&mut self, generation: u64) -> u32 {
        let count = match self.failures {
            Some((g, count)) if g == generation => count + 1,
            _ => 1,
        };
        self.failures = Some((generation, count));
        count
    }

    /// Whether this page has exhausted its draw attempts for `generation`.
    #[must_use]
    pub fn is_failed(&self, generation: u64, max_attempts: u32) -> bool {
        matches!(self.failures, Some((g, count)) if g == generation && count >= max_attempts)
    }
}

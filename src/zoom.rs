//! Zoom state and the synchronous fast-path rescale
//!
//! Stepped zoom bounded to a fixed range. An explicit zoom step first
//! rescales the layout of already-drawn surfaces by `next / previous` for
//! immediate feedback; the true re-render at the new resolution follows
//! asynchronously.

use crate::config::RenderConfig;

/// One applied zoom step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomChange {
    pub previous: f32,
    pub next: f32,
}

impl ZoomChange {
    /// Factor applied to drawn layout sizes by the fast path.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        self.next / self.previous
    }
}

/// User zoom factor with bounded stepping.
#[derive(Clone, Copy, Debug)]
pub struct Zoom {
    scale: f32,
    min: f32,
    max: f32,
    step: f32,
}

impl Zoom {
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        let mut zoom = Self {
            scale: 1.0,
            min: config.min_zoom,
            max: config.max_zoom,
            step: config.zoom_step,
        };
        zoom.scale = zoom.clamp(config.initial_zoom);
        zoom
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Zoom in one step. `None` when already at the upper bound.
    pub fn step_in(&mut self) -> Option<ZoomChange> {
        self.apply(self.scale + self.step)
    }

    /// Zoom out one step. `None` when already at the lower bound.
    pub fn step_out(&mut self) -> Option<ZoomChange> {
        self.apply(self.scale - self.step)
    }

    fn apply(&mut self, target: f32) -> Option<ZoomChange> {
        let next = self.clamp(target);
        if (next - self.scale).abs() < f32::EPSILON {
            return None;
        }

        let change = ZoomChange {
            previous: self.scale,
            next,
        };
        self.scale = next;
        Some(change)
    }

    fn clamp(&self, value: f32) -> f32 {
        // Two-decimal rounding keeps repeated steps from drifting
        // (0.9 + 0.2 lands on 1.1, not 1.1000001).
        let rounded = (value * 100.0).round() / 100.0;
        rounded.clamp(self.min, self.max)
    }
}

/// Rescale a drawn layout size for the fast path.
#[must_use]
pub fn rescale_layout(size: (u32, u32), ratio: f32) -> (u32, u32) {
    let (width, height) = size;
    let scaled_width = (width as f32 * ratio).round().max(1.0) as u32;
    let scaled_height = (height as f32 * ratio).round().max(1.0) as u32;
    (scaled_width, scaled_height)
}

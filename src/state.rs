//! Viewer state reducer
//!
//! Shell inputs are plain commands; applying one mutates the viewer state
//! and returns the effects the scheduling layer must carry out. Keeping the
//! mapping pure makes the event plumbing trivially testable.

use crate::config::RenderConfig;
use crate::zoom::Zoom;

/// Inputs accepted from the embedding shell.
#[derive(Clone, Debug)]
pub enum Command {
    /// A page surface began intersecting the viewport (lookahead included).
    PageEntered(u32),
    /// A page surface stopped intersecting the viewport.
    PageLeft(u32),
    /// The container scrolled to the given vertical offset.
    Scrolled { offset: f32 },
    /// The container was resized.
    Resized { width: f32, height: f32 },
    ZoomIn,
    ZoomOut,
    GoToPage(u32),
    Reload,
}

/// Work the scheduling layer performs in response to a command, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    MarkVisible(u32),
    MarkHidden(u32),
    /// Recompute the target set, rebuild the queue, pump.
    Reschedule,
    /// Advance the generation clock and drop measured heights.
    InvalidateAll,
    /// Synchronously rescale drawn visible surfaces by this layout ratio.
    RescaleDrawn { ratio: f32 },
    CancelInFlight,
    RecomputeCurrentPage,
    /// Ask the shell to scroll the page's top edge to the container top.
    ScrollToPage(u32),
    ReloadDocument,
}

/// Mutable viewer state driven by [`Command`]s.
#[derive(Debug)]
pub struct ViewerState {
    pub container_width: f32,
    pub container_height: f32,
    pub scroll_offset: f32,
    pub zoom: Zoom,
    /// Current page number, 0 until a document is loaded.
    pub current_page: u32,
    pub page_count: u32,
}

impl ViewerState {
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            container_width: 0.0,
            container_height: 0.0,
            scroll_offset: 0.0,
            zoom: Zoom::new(config),
            current_page: 0,
            page_count: 0,
        }
    }

    /// Apply a command and return the effects it produces.
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::PageEntered(page) => {
                vec![Effect::MarkVisible(page), Effect::Reschedule]
            }

            Command::PageLeft(page) => {
                vec![Effect::MarkHidden(page), Effect::Reschedule]
            }

            Command::Scrolled { offset } => {
                self.scroll_offset = offset.max(0.0);
                vec![Effect::RecomputeCurrentPage]
            }

            Command::Resized { width, height } => {
                if (self.container_width - width).abs() < f32::EPSILON
                    && (self.container_height - height).abs() < f32::EPSILON
                {
                    return vec![];
                }
                self.container_width = width;
                self.container_height = height;
                vec![Effect::InvalidateAll, Effect::Reschedule]
            }

            Command::ZoomIn => self.zoom_effects(true),
            Command::ZoomOut => self.zoom_effects(false),

            Command::GoToPage(page) => {
                if self.page_count == 0 {
                    return vec![];
                }
                let clamped = page.clamp(1, self.page_count);
                if clamped == self.current_page {
                    return vec![Effect::ScrollToPage(clamped)];
                }
                self.current_page = clamped;
                vec![Effect::ScrollToPage(clamped), Effect::Reschedule]
            }

            Command::Reload => vec![Effect::ReloadDocument],
        }
    }

    fn zoom_effects(&mut self, zoom_in: bool) -> Vec<Effect> {
        let change = if zoom_in {
            self.zoom.step_in()
        } else {
            self.zoom.step_out()
        };

        let Some(change) = change else {
            return vec![];
        };

        // Layout rescale happens before anything else so the user sees the
        // new size immediately; the redraw at true resolution follows.
        vec![
            Effect::RescaleDrawn {
                ratio: change.ratio(),
            },
            Effect::InvalidateAll,
            Effect::CancelInFlight,
            Effect::Reschedule,
        ]
    }
}

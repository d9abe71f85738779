//! Scheduler configuration
//!
//! The clamping thresholds and scheduling constants here are empirically
//! tuned values carried over from field use, not derived formulas. They are
//! kept configurable so embedders can adjust per device class without code
//! changes.

use serde::{Deserialize, Serialize};

/// Rough device capability bucket driving the surface-size clamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    #[default]
    Standard,
    /// Embedded/webview-style renderers with tighter surface limits.
    Constrained,
}

/// Static device facts supplied by the embedding shell.
#[derive(Clone, Copy, Debug)]
pub struct DeviceProfile {
    /// Native device pixel ratio.
    pub pixel_ratio: f32,
    pub class: DeviceClass,
    /// Logical core count, used to pick the draw concurrency cap.
    pub cores: usize,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            class: DeviceClass::Standard,
            cores: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pages kept pre-rendered on each side of the visible/current page.
    #[serde(default = "default_buffer_radius")]
    pub buffer_radius: u32,

    /// Fixed draw concurrency cap. `None` picks 1 on low-core devices
    /// (≤ 4 cores), otherwise 2.
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// Range request chunk size in bytes for the fast load profile.
    #[serde(default = "default_range_chunk_size")]
    pub range_chunk_size: u32,

    #[serde(default = "default_min_zoom")]
    pub min_zoom: f32,

    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,

    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,

    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f32,

    /// Total backing-pixel ceiling per surface.
    #[serde(default = "default_max_surface_area_px")]
    pub max_surface_area_px: u64,

    /// Largest backing dimension on standard devices.
    #[serde(default = "default_max_dimension_standard")]
    pub max_dimension_standard: u32,

    /// Largest backing dimension on constrained devices.
    #[serde(default = "default_max_dimension_constrained")]
    pub max_dimension_constrained: u32,

    /// The clamp never reduces the pixel ratio below this fraction of the
    /// device's native ratio.
    #[serde(default = "default_pixel_ratio_floor")]
    pub pixel_ratio_floor: f32,

    /// Consecutive draw failures before a page is surfaced as failed for the
    /// rest of its generation.
    #[serde(default = "default_max_draw_attempts")]
    pub max_draw_attempts: u32,

    /// Height/width ratio assumed for unmeasured pages until page 1 has been
    /// inspected. Approximates portrait A4.
    #[serde(default = "default_fallback_aspect_ratio")]
    pub fallback_aspect_ratio: f32,

    /// Pages mounted immediately after load so the first screen is not blank
    /// before any visibility signal arrives.
    #[serde(default = "default_initial_mount_burst")]
    pub initial_mount_burst: u32,
}

fn default_buffer_radius() -> u32 {
    2
}

fn default_range_chunk_size() -> u32 {
    65536
}

fn default_min_zoom() -> f32 {
    0.2
}

fn default_max_zoom() -> f32 {
    5.0
}

fn default_zoom_step() -> f32 {
    0.2
}

fn default_initial_zoom() -> f32 {
    0.9
}

fn default_max_surface_area_px() -> u64 {
    16_000_000
}

fn default_max_dimension_standard() -> u32 {
    8192
}

fn default_max_dimension_constrained() -> u32 {
    4096
}

fn default_pixel_ratio_floor() -> f32 {
    0.5
}

fn default_max_draw_attempts() -> u32 {
    3
}

fn default_fallback_aspect_ratio() -> f32 {
    1.414
}

fn default_initial_mount_burst() -> u32 {
    5
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            buffer_radius: default_buffer_radius(),
            concurrency: None,
            range_chunk_size: default_range_chunk_size(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            zoom_step: default_zoom_step(),
            initial_zoom: default_initial_zoom(),
            max_surface_area_px: default_max_surface_area_px(),
            max_dimension_standard: default_max_dimension_standard(),
            max_dimension_constrained: default_max_dimension_constrained(),
            pixel_ratio_floor: default_pixel_ratio_floor(),
            max_draw_attempts: default_max_draw_attempts(),
            fallback_aspect_ratio: default_fallback_aspect_ratio(),
            initial_mount_burst: default_initial_mount_burst(),
        }
    }
}

impl RenderConfig {
    /// Parse from a TOML snippet; missing fields take defaults.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Effective draw concurrency cap for the given device.
    #[must_use]
    pub fn concurrency_cap(&self, device: &DeviceProfile) -> usize {
        match self.concurrency {
            Some(cap) => cap.max(1),
            None if device.cores <= 4 => 1,
            None => 2,
        }
    }

    /// Largest backing dimension permitted for the given device class.
    #[must_use]
    pub fn max_dimension(&self, class: DeviceClass) -> u32 {
        match class {
            DeviceClass::Standard => self.max_dimension_standard,
            DeviceClass::Constrained => self.max_dimension_constrained,
        }
    }
}

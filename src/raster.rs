//! Per-draw layout and raster geometry
//!
//! Resolves the fit-to-width scale for one page, decides centered layout, and
//! clamps the backing pixel ratio so that surface allocation cannot fail on
//! memory-constrained renderers. Layout size is preserved exactly; only the
//! backing density shrinks.

use crate::config::{DeviceProfile, RenderConfig};
use crate::provider::PageViewport;

/// Frame-wide inputs shared by every draw in a scheduling pass.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    /// Scroll container width in layout pixels.
    pub container_width: f32,
    /// User zoom factor applied on top of fit-to-width.
    pub base_scale: f32,
    pub device: DeviceProfile,
}

/// Resolved geometry for one draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterSpec {
    /// Final scale against the page's natural viewport.
    pub scale: f32,
    /// On-screen size, floored to whole pixels.
    pub layout_width: u32,
    pub layout_height: u32,
    /// Backing store size after the pixel-ratio clamp.
    pub backing_width: u32,
    pub backing_height: u32,
    /// Effective backing pixel ratio after clamping.
    pub pixel_ratio: f32,
    /// Center iff the scaled width fits inside the container. Re-evaluated
    /// on every draw since scale or container width may have changed.
    pub centered: bool,
}

impl RasterSpec {
    #[must_use]
    pub fn compute(natural: PageViewport, params: &FrameParams, config: &RenderConfig) -> Self {
        let natural_width = natural.width.max(1.0);
        let width_scale = params.container_width.max(1.0) / natural_width;
        let scale = width_scale * params.base_scale;

        let width = natural.width * scale;
        let height = natural.height * scale;
        let centered = width <= params.container_width;

        let pixel_ratio = clamp_pixel_ratio(width, height, params.device, config);

        Self {
            scale,
            layout_width: width.floor().max(1.0) as u32,
            layout_height: height.floor().max(1.0) as u32,
            backing_width: (width * pixel_ratio).floor().max(1.0) as u32,
            backing_height: (height * pixel_ratio).floor().max(1.0) as u32,
            pixel_ratio,
            centered,
        }
    }
}

/// Reduce the native pixel ratio until neither the larger backing dimension
/// exceeds the device-class limit nor the total backing area exceeds the
/// ceiling, flooring at a fixed fraction of the native ratio.
fn clamp_pixel_ratio(width: f32, height: f32, device: DeviceProfile, config: &RenderConfig) -> f32 {
    let native = device.pixel_ratio.max(0.1);
    let mut ratio = native;

    let longest = width.max(height).max(1.0);
    let max_dimension = config.max_dimension(device.class) as f32;
    if longest * ratio > max_dimension {
        ratio = max_dimension / longest;
    }

    let area = (width * height).max(1.0);
    let max_area = config.max_surface_area_px as f32;
    if area * ratio * ratio > max_area {
        ratio = (max_area / area).sqrt();
    }

    ratio.max(native * config.pixel_ratio_floor)
}

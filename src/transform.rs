//! Transform helper for coordinate projection

use crate::data_types::{SurfaceSize, Viewport};
use crate::scales::LinearScale;
use glam::DVec2;

/// Maps between surface pixels and data space for one viewport. Pixel y
/// grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotTransform {
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub size: SurfaceSize,
}

impl PlotTransform {
    pub fn new(viewport: &Viewport, size: SurfaceSize) -> Self {
        Self {
            x_scale: LinearScale::new((viewport.x.min, viewport.x.max), (0.0, size.width)),
            y_scale: LinearScale::new((viewport.y.min, viewport.y.max), (size.height, 0.0)),
            size,
        }
    }

    pub fn data_to_screen(&self, point: DVec2) -> DVec2 {
        DVec2::new(self.x_scale.map(point.x), self.y_scale.map(point.y))
    }

    pub fn screen_to_data(&self, point: DVec2) -> DVec2 {
        DVec2::new(self.x_scale.invert(point.x), self.y_scale.invert(point.y))
    }

    /// Data-space x under a surface-relative pixel column.
    pub fn x_value_at_pixel(&self, canvas_x: f64) -> Option<f64> {
        if self.size.width <= 0.0 || !canvas_x.is_finite() {
            return None;
        }
        Some(self.x_scale.invert(canvas_x))
    }
}

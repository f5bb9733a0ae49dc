use super::axis::AxisRange;
use serde::{Deserialize, Serialize};

/// Region of data space currently mapped onto the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl Viewport {
    pub fn new(x: AxisRange, y: AxisRange) -> Self {
        Self { x, y }
    }

    /// Returns None when either extent is not finite.
    pub fn from_extent(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Option<Self> {
        Some(Self {
            x: AxisRange::from_extent(x_min, x_max)?,
            y: AxisRange::from_extent(y_min, y_max)?,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }
}

/// Pixel size of the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Plain copy of the interactive surface's on-screen geometry, taken at
/// event time so it can cross execution contexts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Converts client coordinates into surface-relative pixels.
    pub fn to_canvas(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.left, client_y - self.top)
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

/// Accessor for the live bounding rectangle of an on-screen element.
pub trait BoundingRectSource {
    fn bounding_client_rect(&self) -> BoundingRect;
}

impl BoundingRectSource for BoundingRect {
    fn bounding_client_rect(&self) -> BoundingRect {
        *self
    }
}

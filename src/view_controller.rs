use crate::data_types::{AxisRange, InteractionEvent, InteractionKind, Viewport, ZoomMode, MIN_SPAN};

/// Pixel delta that doubles or halves the span on a wheel step.
const WHEEL_SENSITIVITY: f64 = 100.0;

/// ViewController handles the arithmetic of interactions (zoom, pan)
/// independently of any surface so it can be tested on its own.
pub struct ViewController;

impl ViewController {
    /// Calculates and applies a pan on an axis based on a pixel delta.
    pub fn pan_axis(range: &mut AxisRange, delta_pixels: f64, total_pixels: f64, is_y: bool) {
        if total_pixels <= 0.0 || !delta_pixels.is_finite() {
            return;
        }
        let ratio = range.span() / total_pixels;

        // Dragging right pulls earlier x values into view; dragging down
        // (positive pixel y) shows larger y values.
        let delta_data = if is_y {
            delta_pixels * ratio
        } else {
            -delta_pixels * ratio
        };

        range.pan(delta_data);
        range.clamp();
    }

    /// Zooms on an axis at a pivot expressed as a fraction of the domain.
    pub fn zoom_axis_at(range: &mut AxisRange, pivot_pct: f64, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let mut new_factor = factor;
        if range.span() * factor < MIN_SPAN {
            new_factor = MIN_SPAN / range.span();
        }

        let pivot_data = range.min + range.span() * pivot_pct;
        range.zoom_at(pivot_data, pivot_pct, new_factor);
        range.clamp();
    }

    /// Calculates a zoom factor based on a pixel delta. Positive deltas zoom in.
    pub fn compute_zoom_factor(delta: f64, sensitivity: f64) -> f64 {
        let factor = 1.0 + delta.abs() / sensitivity;
        if delta > 0.0 {
            1.0 / factor
        } else {
            factor
        }
    }

    /// Applies one wheel or pan event to a viewport, restricted to the axes
    /// of `mode`. Returns the viewport unchanged for events that carry no
    /// usable geometry.
    pub fn apply_interaction(viewport: &Viewport, event: &InteractionEvent, mode: ZoomMode) -> Viewport {
        let mut next = *viewport;
        let rect = &event.bounding_client_rect;
        match event.kind {
            InteractionKind::Wheel => {
                let (pct_x, pct_y) = event.pivot_pct();
                if event.delta_y != 0.0 && event.delta_y.is_finite() {
                    let factor = Self::compute_zoom_factor(-event.delta_y, WHEEL_SENSITIVITY);
                    if mode.affects_x() {
                        Self::zoom_axis_at(&mut next.x, pct_x, factor);
                    }
                    if mode.affects_y() {
                        // Screen y grows downward, data y grows upward.
                        Self::zoom_axis_at(&mut next.y, 1.0 - pct_y, factor);
                    }
                }
                if event.delta_x != 0.0 && mode.affects_x() {
                    Self::pan_axis(&mut next.x, -event.delta_x, rect.width, false);
                }
            }
            InteractionKind::PanStart | InteractionKind::PanMove => {
                if mode.affects_x() {
                    Self::pan_axis(&mut next.x, event.delta_x, rect.width, false);
                }
                if mode.affects_y() {
                    Self::pan_axis(&mut next.y, event.delta_y, rect.height, true);
                }
            }
            InteractionKind::PanEnd => {}
        }
        if next.is_valid() {
            next
        } else {
            *viewport
        }
    }
}

use serde::{Deserialize, Serialize};

use super::viewport::{BoundingRect, BoundingRectSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Wheel,
    PanStart,
    PanMove,
    PanEnd,
}

/// Structured wheel/drag event ingested by the coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    pub delta_x: f64,
    pub delta_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub bounding_client_rect: BoundingRect,
    pub cancelable: bool,
}

impl InteractionEvent {
    pub fn wheel(event: &WheelEvent<'_>, rect: BoundingRect) -> Self {
        Self {
            kind: InteractionKind::Wheel,
            delta_x: event.delta_x,
            delta_y: event.delta_y,
            client_x: event.client_x,
            client_y: event.client_y,
            bounding_client_rect: rect,
            cancelable: false,
        }
    }

    pub fn pan(kind: InteractionKind, delta_x: f64, delta_y: f64, rect: BoundingRect) -> Self {
        Self {
            kind,
            delta_x,
            delta_y,
            client_x: rect.left,
            client_y: rect.top,
            bounding_client_rect: rect,
            cancelable: false,
        }
    }

    /// Pointer position as a fraction of the surface, clamped to [0, 1].
    pub fn pivot_pct(&self) -> (f64, f64) {
        let rect = &self.bounding_client_rect;
        let (cx, cy) = rect.to_canvas(self.client_x, self.client_y);
        let pct = |v: f64, total: f64| {
            if total > 0.0 {
                (v / total).clamp(0.0, 1.0)
            } else {
                0.5
            }
        };
        (pct(cx, rect.width), pct(cy, rect.height))
    }
}

/// Raw pointer event from the view layer.
#[derive(Clone, Copy)]
pub struct MouseEvent<'a> {
    pub client_x: f64,
    pub client_y: f64,
    pub current_target: &'a dyn BoundingRectSource,
}

/// Raw wheel event from the view layer.
#[derive(Clone, Copy)]
pub struct WheelEvent<'a> {
    pub delta_x: f64,
    pub delta_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub current_target: &'a dyn BoundingRectSource,
}

/// Identity of a physical key, compared case-insensitively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key(pub char);

impl Key {
    pub fn matches(&self, binding: char) -> bool {
        self.0.eq_ignore_ascii_case(&binding)
    }
}

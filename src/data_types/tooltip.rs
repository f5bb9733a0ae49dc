use serde::{Deserialize, Serialize};

use super::hover::HoverElement;

/// Pointer position handed to the tooltip builder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipRequest {
    pub client_x: f64,
    pub client_y: f64,
    pub canvas_x: f64,
    pub canvas_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TooltipItem {
    pub config_index: usize,
    pub value: f64,
}

impl From<&HoverElement> for TooltipItem {
    fn from(element: &HoverElement) -> Self {
        Self {
            config_index: element.config_index,
            value: element.data.display_value(),
        }
    }
}

/// Tooltip currently shown next to the pointer, in client coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveTooltip {
    pub x: f64,
    pub y: f64,
    pub data: Vec<TooltipItem>,
}

impl ActiveTooltip {
    /// Builds a tooltip from hit-test results, None when nothing was hit.
    /// Items keep the order the renderer reported them in.
    pub fn from_elements(request: &TooltipRequest, elements: &[HoverElement]) -> Option<Self> {
        if elements.is_empty() {
            return None;
        }
        Some(Self {
            x: request.client_x,
            y: request.client_y,
            data: elements.iter().map(TooltipItem::from).collect(),
        })
    }
}

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

/// How the panel's x coordinate is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XAxisMode {
    /// X is a timeline position in seconds.
    #[default]
    Timestamp,
    Index,
    Custom,
    CurrentCustom,
}

impl XAxisMode {
    pub fn is_timestamp(self) -> bool {
        self == Self::Timestamp
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub label: Option<String>,
    pub enabled: bool,
    pub color: Option<String>,
    pub line_width: f32,
    pub show_line: bool,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            label: None,
            enabled: true,
            color: None,
            line_width: 1.0,
            show_line: true,
        }
    }
}

impl SeriesConfig {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }
}

/// Keys that hold a transient zoom mode while pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomKeyBindings {
    pub y_axis: char,
    pub both_axes: char,
}

impl Default for ZoomKeyBindings {
    fn default() -> Self {
        Self {
            y_axis: 'v',
            both_axes: 'b',
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    pub should_sync: bool,
}

/// Panel-scoped configuration, read-only for the interaction layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub title: Option<String>,
    pub x_axis_mode: XAxisMode,
    pub series: Vec<SeriesConfig>,
    pub min_y_value: Option<f64>,
    pub max_y_value: Option<f64>,
    pub following_view_width: Option<f64>,
    pub zoom_keys: ZoomKeyBindings,
    pub sync: SyncOptions,
    pub hit_tolerance_px: f64,
    pub max_render_points: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: None,
            x_axis_mode: XAxisMode::Timestamp,
            series: Vec::new(),
            min_y_value: None,
            max_y_value: None,
            following_view_width: None,
            zoom_keys: ZoomKeyBindings::default(),
            sync: SyncOptions::default(),
            hit_tolerance_px: 8.0,
            max_render_points: 2000,
        }
    }
}

impl PlotConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).wrap_err("invalid plot configuration")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("failed to serialize plot configuration")
    }

    pub fn with_series(mut self, series: Vec<SeriesConfig>) -> Self {
        self.series = series;
        self
    }

    pub fn with_x_axis_mode(mut self, mode: XAxisMode) -> Self {
        self.x_axis_mode = mode;
        self
    }

    /// Label of a series for legends and exports.
    pub fn series_label(&self, index: usize) -> String {
        self.series
            .get(index)
            .and_then(|s| s.label.clone())
            .unwrap_or_else(|| format!("series {}", index))
    }

    pub fn is_series_enabled(&self, index: usize) -> bool {
        self.series.get(index).map_or(true, |s| s.enabled)
    }
}

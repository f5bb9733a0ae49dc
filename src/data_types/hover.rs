use serde::{Deserialize, Serialize};
use std::fmt;

use super::data::Sample;

/// Identity of one panel subscribing to shared interaction state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Hovered data-space position published by a panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HoverValue {
    /// Position on the playback timeline, in seconds.
    PlaybackSeconds(f64),
    /// Value on an axis with no timeline meaning.
    Other(f64),
}

impl HoverValue {
    pub fn value(&self) -> f64 {
        match *self {
            Self::PlaybackSeconds(v) | Self::Other(v) => v,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoverEntry {
    pub component_id: SubscriberId,
    pub value: HoverValue,
}

/// One candidate sample reported by the renderer under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoverElement {
    /// Index into the panel's series configuration.
    pub config_index: usize,
    pub data: Sample,
}

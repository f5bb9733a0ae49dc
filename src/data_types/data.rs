use serde::{Deserialize, Serialize};

/// Timeline time as whole seconds plus nanoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    pub sec: u32,
    pub nsec: u32,
}

impl Time {
    pub fn new(sec: u32, nsec: u32) -> Self {
        Self { sec, nsec }
    }

    pub fn to_sec(&self) -> f64 {
        self.sec as f64 + self.nsec as f64 * 1e-9
    }

    pub fn from_sec(seconds: f64) -> Self {
        let seconds = seconds.max(0.0);
        let sec = seconds.trunc();
        let nsec = ((seconds - sec) * 1e9).round().min(999_999_999.0);
        Self {
            sec: sec as u32,
            nsec: nsec as u32,
        }
    }
}

/// Value attached to a sample besides its plotted coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SampleValue {
    Scalar(f64),
    Time(Time),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub value: Option<SampleValue>,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, value: None }
    }

    pub fn with_value(mut self, value: SampleValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Value shown for this sample: the explicit scalar, else the time in
    /// seconds, else the y coordinate.
    pub fn display_value(&self) -> f64 {
        match self.value {
            Some(SampleValue::Scalar(v)) => v,
            Some(SampleValue::Time(t)) => t.to_sec(),
            None => self.y,
        }
    }
}

/// Bounds of a dataset in data space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DataExtent {
    pub fn empty() -> Self {
        Self {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max
    }

    pub fn include(&mut self, sample: &Sample) {
        if !sample.x.is_finite() || !sample.y.is_finite() {
            return;
        }
        self.x_min = self.x_min.min(sample.x);
        self.x_max = self.x_max.max(sample.x);
        self.y_min = self.y_min.min(sample.y);
        self.y_max = self.y_max.max(sample.y);
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

//! Linear scale mapping a data domain onto a pixel range.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let mut scale = Self {
            domain: (0.0, 1.0),
            range,
        };
        scale.update_domain(domain.0, domain.1);
        scale
    }

    pub fn map(&self, value: f64) -> f64 {
        let (m, c) = self.coefficients();
        let res = value * m + c;
        if res.is_nan() || res.is_infinite() {
            0.0
        } else {
            res
        }
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let r_span = r1 - r0;
        if r_span.abs() < f64::EPSILON {
            return d0;
        }
        d0 + (pixel - r0) / r_span * (d1 - d0)
    }

    pub fn update_domain(&mut self, min: f64, max: f64) {
        let mut d_min = min;
        let mut d_max = max;
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min -= 0.5;
            d_max += 0.5;
        }
        self.domain = (d_min, d_max);
    }

    /// Returns (m, c) such that screen = value * m + c
    pub fn coefficients(&self) -> (f64, f64) {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;
        let m = (r_max - r_min) / (d_max - d_min);
        let c = r_min - m * d_min;
        (m, c)
    }
}

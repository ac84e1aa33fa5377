//! Continuous scales mapping data values onto canvas distances and colors.

use crate::theme::ColorRamp;

/// Linear map from a numeric domain onto a numeric range.
///
/// A zero-width domain maps every input to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        let mut t = (value - d0) / span;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + (r1 - r0) * t
    }
}

/// Maps a domain onto `[0, 1]`, reshapes it, then samples a color ramp.
#[derive(Debug, Clone, Copy)]
pub struct SequentialScale {
    domain: (f64, f64),
    ramp: ColorRamp,
    offset: f64,
    span: f64,
    clamp: bool,
}

impl SequentialScale {
    pub fn new(domain: (f64, f64), ramp: ColorRamp) -> Self {
        Self {
            domain,
            ramp,
            offset: 0.0,
            span: 1.0,
            clamp: false,
        }
    }

    /// Samples the ramp at `offset + span * t` instead of `t`.
    pub fn reshaped(mut self, offset: f64, span: f64) -> Self {
        self.offset = offset;
        self.span = span;
        self
    }

    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn color(&self, value: f64) -> Option<String> {
        let (d0, d1) = self.domain;
        let width = d1 - d0;
        let mut t = if width == 0.0 { 0.5 } else { (value - d0) / width };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        self.ramp.at(self.offset + self.span * t)
    }
}

/// Minimum and maximum of the finite values, if any.
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

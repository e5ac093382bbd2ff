//! Square-root scale for circle radii.
//!
//! Radius grows with the square root of the input so circle *area* grows
//! linearly with traffic.

/// Maps `[domain.0, domain.1]` onto `[range.0, range.1]` through `sqrt`.
///
/// Inputs outside the domain are clamped, which keeps the scale
/// non-decreasing over all finite inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn with_range(self, range: (f64, f64)) -> Self {
        Self { range, ..self }
    }

    /// Scale a value.
    ///
    /// A degenerate domain (every station has the same traffic, usually
    /// zero) maps everything to the start of the range, so idle stations
    /// draw at the minimum radius. This differs from d3's `scaleSqrt`,
    /// which returns the midpoint of the range there. NaN maps to the
    /// start of the range as well.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;

        let lo = d0.max(0.0).sqrt();
        let hi = d1.max(0.0).sqrt();
        let span = hi - lo;
        if !span.is_finite() || span <= 0.0 || value.is_nan() {
            return r0;
        }

        let x = value.max(d0).min(d1).max(0.0).sqrt();
        r0 + (x - lo) / span * (r1 - r0)
    }
}

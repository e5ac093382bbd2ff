//! Quantize scale and the three-level departure/arrival indicator.

/// Maps a continuous domain onto a discrete range by cutting the domain
/// into equal-width bands, one per output.
///
/// Band `i` covers `[lo + i * step, lo + (i + 1) * step)`; the last band
/// also takes the upper bound. Values outside the domain fall into the
/// nearest band. NaN has no band.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantizeScale<T> {
    domain: (f64, f64),
    range: Vec<T>,
}

impl<T: Copy> QuantizeScale<T> {
    /// Returns `None` for an empty range or a domain that is not increasing
    pub fn new(domain: (f64, f64), range: Vec<T>) -> Option<Self> {
        let (lo, hi) = domain;
        if range.is_empty() || !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return None;
        }
        Some(Self { domain, range })
    }

    /// Lower bounds of bands 1..n
    pub fn thresholds(&self) -> Vec<f64> {
        let (lo, hi) = self.domain;
        let n = self.range.len();
        (1..n)
            .map(|i| lo + (hi - lo) * i as f64 / n as f64)
            .collect()
    }

    pub fn apply(&self, value: f64) -> Option<T> {
        if value.is_nan() {
            return None;
        }
        let band = self
            .thresholds()
            .iter()
            .take_while(|&&threshold| value >= threshold)
            .count();
        Some(self.range[band])
    }
}

/// Whether a station mostly loses or gains bikes in the current view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowLevel {
    /// Under a third of the traffic is departures
    ArrivalHeavy,
    Balanced,
    /// At least two thirds of the traffic is departures
    DepartureHeavy,
}

impl FlowLevel {
    pub const ALL: [FlowLevel; 3] = [Self::ArrivalHeavy, Self::Balanced, Self::DepartureHeavy];

    /// Value fed to the renderer's color mix: 0, 0.5 or 1
    pub fn value(self) -> f64 {
        match self {
            Self::ArrivalHeavy => 0.0,
            Self::Balanced => 0.5,
            Self::DepartureHeavy => 1.0,
        }
    }
}

/// `departures / total_traffic` onto the three flow levels
pub fn flow_scale() -> QuantizeScale<FlowLevel> {
    QuantizeScale {
        domain: (0.0, 1.0),
        range: FlowLevel::ALL.to_vec(),
    }
}

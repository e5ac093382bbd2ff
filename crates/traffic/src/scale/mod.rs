//! Visual scales derived from the current traffic view.

pub mod quantize;
pub mod sqrt;

pub use quantize::{flow_scale, FlowLevel, QuantizeScale};
pub use sqrt::SqrtScale;

use crate::config::ScaleConfig;
use crate::models::time_of_day::TimeFilter;
use crate::models::types::StationTraffic;

/// Radius and flow scales for one traffic view.
///
/// Rebuilt whenever the filter changes: the radius domain tracks the
/// busiest station and the radius range depends on whether a window is
/// active.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleModel {
    pub radius: SqrtScale,
    pub flow: QuantizeScale<FlowLevel>,
}

impl ScaleModel {
    pub fn for_view(view: &[StationTraffic], filter: TimeFilter, config: &ScaleConfig) -> Self {
        let max_traffic = view.iter().map(|s| s.total_traffic()).max().unwrap_or(0);
        let range = if filter.is_active() {
            config.filtered_radius
        } else {
            config.unfiltered_radius
        };

        Self {
            radius: SqrtScale::new((0.0, max_traffic as f64), range),
            flow: flow_scale(),
        }
    }

    pub fn radius_of(&self, station: &StationTraffic) -> f64 {
        self.radius.apply(station.total_traffic() as f64)
    }

    /// `None` for a station without traffic
    pub fn flow_of(&self, station: &StationTraffic) -> Option<FlowLevel> {
        station
            .departure_ratio()
            .and_then(|ratio| self.flow.apply(ratio))
    }
}

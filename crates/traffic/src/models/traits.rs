//! Core traits for traffic data.
//!
//! These traits define the public interface consumed by renderers.
//! The in-memory engine is one implementation; a host may back them with
//! precomputed tables instead.

use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;
use crate::models::time_of_day::TimeFilter;
use crate::models::types::*;

// ============================================================================
// Provider Trait
// ============================================================================

/// Provider of stations and their time-filtered traffic
pub trait TrafficProvider: Send + Sync {
    // ---- Lookups ----
    fn get_station(&self, id: &StationIdentifier) -> Option<Arc<Station>>;

    // ---- Collections ----
    fn all_stations(&self) -> Vec<Arc<Station>>;

    /// Number of trips in the loaded batch
    fn trip_count(&self) -> usize;

    // ---- Traffic ----

    /// Per-station counts for the given filter, in station-list order.
    ///
    /// Pure: calling twice with the same filter yields the same counts.
    fn station_traffic(&self, filter: TimeFilter) -> Vec<StationTraffic>;

    // ---- Spatial queries ----

    /// Find stations within radius (meters)
    fn stations_near(&self, point: Point, radius_m: f64) -> Vec<Arc<Station>>;

    /// The station closest to a point, if any are loaded
    fn nearest_station(&self, point: Point) -> Option<Arc<Station>>;
}

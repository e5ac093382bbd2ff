//! # station-traffic
//!
//! Time-of-day bikeshare traffic per station.
//!
//! ## Features
//!
//! - **Minute index**: trips bucketed by start and end minute, built once
//! - **Window queries**: ±60 minute windows that wrap past midnight
//! - **Station views**: departures, arrivals and total traffic per station
//! - **Scales**: square-root circle radius and a three-level flow indicator
//! - **Pluggable loading**: implement [`DataFetcher`] to supply the inputs
//!
//! ## Example
//!
//! ```
//! use station_traffic::prelude::*;
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let at = |h, m| day.and_hms_opt(h, m, 0).unwrap();
//!
//! let stations = vec![
//!     Station::new("A", -71.090, 42.360),
//!     Station::new("B", -71.100, 42.370),
//! ];
//! let trips = vec![
//!     Trip::new("A", "B", at(8, 5), at(8, 20)),
//!     Trip::new("B", "A", at(17, 30), at(17, 45)),
//! ];
//!
//! let mut engine = TrafficEngine::new(stations, trips, EngineConfig::default()).unwrap();
//!
//! // Slider at 08:05
//! engine.set_slider(485).unwrap();
//! let a = engine.traffic(&StationIdentifier::new("A")).unwrap();
//! assert_eq!((a.departures(), a.arrivals()), (1, 0));
//! assert_eq!(engine.scales().flow_of(a), Some(FlowLevel::DepartureHeavy));
//! ```

pub mod aggregate;
pub mod config;
pub mod identifiers;
pub mod index;
pub mod ingest;
pub mod models;
pub mod network;
pub mod provider;
pub mod scale;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::aggregate::aggregate;
    pub use crate::config::{EngineConfig, ScaleConfig, WindowConfig};
    pub use crate::identifiers::*;
    pub use crate::index::{Axis, MinuteWindow, TripIndex};
    pub use crate::ingest::{DataSource, RowPolicy};
    pub use crate::models::{
        minute_of_day, MinuteOfDay, Station, StationTraffic, TimeFilter, TrafficError,
        TrafficProvider, Trip, MINUTES_PER_DAY,
    };
    pub use crate::network::traits::*;
    pub use crate::provider::TrafficEngine;
    pub use crate::scale::{FlowLevel, ScaleModel, SqrtScale};
}

pub use prelude::*;

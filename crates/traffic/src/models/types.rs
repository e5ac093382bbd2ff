//! Core data types for bikeshare traffic.

use std::sync::Arc;

use chrono::NaiveDateTime;
use geo::Point;

use crate::identifiers::*;
use crate::models::time_of_day::{minute_of_day, MinuteOfDay};

// ============================================================================
// Data Structures
// ============================================================================

/// A single bikeshare ride.
///
/// Trips have no identifier of their own; they are addressed by position in
/// the loaded batch. Timestamps are local wall-clock times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub start_station: StationIdentifier,
    pub end_station: StationIdentifier,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn new(
        start_station: impl Into<StationIdentifier>,
        end_station: impl Into<StationIdentifier>,
        started_at: NaiveDateTime,
        ended_at: NaiveDateTime,
    ) -> Self {
        Self {
            start_station: start_station.into(),
            end_station: end_station.into(),
            started_at,
            ended_at,
        }
    }

    /// Minute slot this trip departs in
    pub fn start_minute(&self) -> MinuteOfDay {
        minute_of_day(&self.started_at)
    }

    /// Minute slot this trip arrives in
    pub fn end_minute(&self) -> MinuteOfDay {
        minute_of_day(&self.ended_at)
    }
}

/// A fixed dock location, keyed by its short code.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub short_name: StationIdentifier,
    pub name: Option<Arc<str>>,
    pub location: Point,
}

impl Station {
    pub fn new(short_name: impl Into<StationIdentifier>, lon: f64, lat: f64) -> Self {
        Self {
            short_name: short_name.into(),
            name: None,
            location: Point::new(lon, lat),
        }
    }

    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        self.name = Some(name.as_ref().into());
        self
    }

    pub fn lon(&self) -> f64 {
        self.location.x()
    }

    pub fn lat(&self) -> f64 {
        self.location.y()
    }
}

/// Traffic counts of one station under the active time filter.
///
/// The counts are a view over the trip batch: they are rebuilt from scratch
/// on every filter change and never edited in place. `total_traffic` is
/// always `departures + arrivals`.
#[derive(Clone, Debug, PartialEq)]
pub struct StationTraffic {
    pub station: Arc<Station>,
    departures: u32,
    arrivals: u32,
    total_traffic: u32,
}

impl StationTraffic {
    pub fn new(station: Arc<Station>, departures: u32, arrivals: u32) -> Self {
        Self {
            station,
            departures,
            arrivals,
            total_traffic: departures + arrivals,
        }
    }

    pub fn id(&self) -> &StationIdentifier {
        &self.station.short_name
    }

    pub fn departures(&self) -> u32 {
        self.departures
    }

    pub fn arrivals(&self) -> u32 {
        self.arrivals
    }

    pub fn total_traffic(&self) -> u32 {
        self.total_traffic
    }

    /// Share of the traffic that is departures.
    ///
    /// `None` when the station saw no traffic at all, so callers never have
    /// to deal with a `0 / 0` NaN.
    pub fn departure_ratio(&self) -> Option<f64> {
        if self.total_traffic == 0 {
            return None;
        }
        Some(self.departures as f64 / self.total_traffic as f64)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TrafficError {
    #[error("Station not found: {0}")]
    StationNotFound(StationIdentifier),

    #[error("Time filter {0} is outside [-1, 1439]")]
    FilterOutOfRange(i32),

    #[error("Window half-width of {0} minutes would cover a slot twice")]
    InvalidWindow(u16),

    #[error("Invalid timestamp {value:?} on row {row}")]
    InvalidTimestamp { value: String, row: u64 },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetch failed for {source_name}: {message}")]
    Fetch { source_name: String, message: String },
}

pub type Result<T> = std::result::Result<T, TrafficError>;

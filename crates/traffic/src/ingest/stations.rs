//! Station list parsing.
//!
//! Accepts a GBFS-style document (`{"data": {"stations": [...]}}`) or a
//! bare array of station objects. Coordinates may be numbers or numeric
//! strings.

use std::collections::HashSet;

use serde::Deserialize;

use crate::models::types::{Result, Station, TrafficError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StationDocument {
    Feed { data: StationData },
    List(Vec<StationRecord>),
}

#[derive(Debug, Deserialize)]
struct StationData {
    stations: Vec<StationRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Deserialize)]
struct StationRecord {
    short_name: Option<String>,
    name: Option<String>,
    lon: Coordinate,
    lat: Coordinate,
}

impl StationRecord {
    fn into_station(self) -> Result<Option<Station>> {
        let Some(short_name) = self.short_name.filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };

        let (Some(lon), Some(lat)) = (self.lon.value(), self.lat.value()) else {
            return Err(TrafficError::InvalidData(format!(
                "station {} has invalid coordinates",
                short_name
            )));
        };
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(TrafficError::InvalidData(format!(
                "station {} coordinates ({}, {}) out of range",
                short_name, lon, lat
            )));
        }

        let station = Station::new(short_name.trim(), lon, lat);
        Ok(Some(match self.name {
            Some(name) => station.with_name(name),
            None => station,
        }))
    }
}

/// Parse a station list.
///
/// Stations without a short name cannot be matched by any trip and are
/// left out. When a short name repeats, the first entry wins.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let records = match serde_json::from_slice::<StationDocument>(bytes)? {
        StationDocument::Feed { data } => data.stations,
        StationDocument::List(records) => records,
    };

    let mut seen = HashSet::new();
    let mut stations = Vec::with_capacity(records.len());
    for record in records {
        let Some(station) = record.into_station()? else {
            tracing::warn!("skipping station without short_name");
            continue;
        };
        if !seen.insert(station.short_name.clone()) {
            tracing::warn!(station = %station.short_name, "duplicate station short_name");
            continue;
        }
        stations.push(station);
    }

    tracing::debug!(stations = stations.len(), "parsed station list");
    Ok(stations)
}

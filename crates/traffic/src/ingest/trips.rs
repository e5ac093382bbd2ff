//! Trip CSV parsing.
//!
//! Expects a header row naming at least `start_station_id`,
//! `end_station_id`, `started_at` and `ended_at`. Other columns
//! (`ride_id`, `rideable_type`, ...) are ignored.

use std::io::Read;

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use crate::ingest::RowPolicy;
use crate::models::types::{Result, TrafficError, Trip};

#[derive(Debug, Deserialize)]
struct TripRow {
    start_station_id: String,
    end_station_id: String,
    started_at: String,
    ended_at: String,
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a local wall-clock timestamp.
///
/// RFC 3339 input keeps its wall-clock reading; the offset is dropped.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

fn timestamp(value: &str, row: u64) -> Result<NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| TrafficError::InvalidTimestamp {
        value: value.to_string(),
        row,
    })
}

fn parse_row(record: &csv::StringRecord, headers: &csv::StringRecord) -> Result<Trip> {
    let row = record.position().map_or(0, |p| p.line());
    let raw: TripRow = record.deserialize(Some(headers))?;

    Ok(Trip::new(
        raw.start_station_id.trim(),
        raw.end_station_id.trim(),
        timestamp(&raw.started_at, row)?,
        timestamp(&raw.ended_at, row)?,
    ))
}

/// Read every trip from a CSV source
pub fn read_trips<R: Read>(reader: R, policy: RowPolicy) -> Result<Vec<Trip>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut trips = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let parsed = result
            .map_err(TrafficError::from)
            .and_then(|record| parse_row(&record, &headers));

        match (parsed, policy) {
            (Ok(trip), _) => trips.push(trip),
            (Err(e), RowPolicy::Skip) => {
                tracing::warn!(error = %e, "skipping trip row");
                skipped += 1;
            }
            (Err(e), RowPolicy::Strict) => return Err(e),
        }
    }

    tracing::debug!(trips = trips.len(), skipped, "parsed trip CSV");
    Ok(trips)
}

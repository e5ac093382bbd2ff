//! Loading stations and trips into typed records.
//!
//! This is the validation boundary: everything past it assumes timestamps
//! resolve to a wall-clock minute and coordinates are finite.

pub mod stations;
pub mod trips;

pub use stations::parse_stations;
pub use trips::{parse_timestamp, read_trips};

use serde::{Deserialize, Serialize};

use crate::models::types::{Result, Station, Trip};
use crate::network::DataFetcher;

/// What to do with a trip row that fails validation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Fail the whole load
    #[default]
    Strict,
    /// Log the row and leave it out
    Skip,
}

/// Where the station list and trip batch come from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub stations: String,
    pub trips: String,
}

impl DataSource {
    pub fn new(stations: impl Into<String>, trips: impl Into<String>) -> Self {
        Self {
            stations: stations.into(),
            trips: trips.into(),
        }
    }
}

/// Fetch and parse both inputs
pub async fn load<F>(
    fetcher: &F,
    source: &DataSource,
    policy: RowPolicy,
) -> Result<(Vec<Station>, Vec<Trip>)>
where
    F: DataFetcher + ?Sized,
{
    let station_bytes = fetcher.fetch(&source.stations).await?;
    let stations = parse_stations(&station_bytes)?;

    let trip_bytes = fetcher.fetch(&source.trips).await?;
    let trips = read_trips(trip_bytes.as_slice(), policy)?;

    tracing::info!(
        stations = stations.len(),
        trips = trips.len(),
        "loaded bikeshare data"
    );
    Ok((stations, trips))
}

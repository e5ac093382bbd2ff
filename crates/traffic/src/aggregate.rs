//! Reduce a trip subset to per-station traffic counts.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::types::{Station, StationTraffic, Trip};

/// Group-and-count trips by a station key
fn count_by<'a, I, F>(trips: I, key: F) -> (HashMap<&'a str, u32>, usize)
where
    I: IntoIterator<Item = &'a Trip>,
    F: Fn(&'a Trip) -> &'a str,
{
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut considered = 0;
    for trip in trips {
        *counts.entry(key(trip)).or_default() += 1;
        considered += 1;
    }
    (counts, considered)
}

/// Count departures and arrivals for every station.
///
/// `departures` is matched on each trip's start station and `arrivals` on
/// its end station; the two sets come from separate window queries and may
/// differ. Stations without trips get zero counts. Trips naming a station
/// that is not in `stations` contribute nothing.
///
/// The result follows the order of `stations`.
pub fn aggregate<'a, D, A>(
    stations: &[Arc<Station>],
    departures: D,
    arrivals: A,
) -> Vec<StationTraffic>
where
    D: IntoIterator<Item = &'a Trip>,
    A: IntoIterator<Item = &'a Trip>,
{
    let (departure_counts, departures_considered) =
        count_by(departures, |trip| trip.start_station.as_str());
    let (arrival_counts, arrivals_considered) =
        count_by(arrivals, |trip| trip.end_station.as_str());

    let view: Vec<StationTraffic> = stations
        .iter()
        .map(|station| {
            let key = station.short_name.as_str();
            StationTraffic::new(
                station.clone(),
                departure_counts.get(key).copied().unwrap_or(0),
                arrival_counts.get(key).copied().unwrap_or(0),
            )
        })
        .collect();

    // Repeated station keys are counted once per entry, so matched can exceed considered
    let matched_departures: usize = view.iter().map(|s| s.departures() as usize).sum();
    let matched_arrivals: usize = view.iter().map(|s| s.arrivals() as usize).sum();
    tracing::debug!(
        stations = view.len(),
        departures = departures_considered,
        arrivals = arrivals_considered,
        unmatched_departures = departures_considered.saturating_sub(matched_departures),
        unmatched_arrivals = arrivals_considered.saturating_sub(matched_arrivals),
        "aggregated station traffic"
    );

    view
}

//! Minute-bucketed trip index.
//!
//! Trips are bucketed twice: by the minute they started (departures) and by
//! the minute they ended (arrivals). Each bucket stores positions into the
//! shared trip batch, so a trip is stored once however it is indexed.

use std::sync::Arc;

use crate::index::window::MinuteWindow;
use crate::models::time_of_day::{MinuteOfDay, TimeFilter, MINUTES_PER_DAY};
use crate::models::types::{Result, Trip};

/// Which timestamp of a trip a query looks at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Bucketed by `started_at`
    Departures,
    /// Bucketed by `ended_at`
    Arrivals,
}

/// 1440 slots, one per minute of the day
#[derive(Clone, Debug)]
struct MinuteBuckets {
    slots: Vec<Vec<usize>>,
}

impl MinuteBuckets {
    fn new() -> Self {
        Self {
            slots: vec![Vec::new(); MINUTES_PER_DAY as usize],
        }
    }

    fn push(&mut self, minute: MinuteOfDay, position: usize) {
        self.slots[minute.index()].push(position);
    }

    fn slot(&self, minute: MinuteOfDay) -> &[usize] {
        &self.slots[minute.index()]
    }

    fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    fn within(&self, window: &MinuteWindow) -> impl Iterator<Item = usize> + '_ {
        let (head, tail) = window.segments();
        let head = self.slots[head].iter();
        let tail = tail.into_iter().flat_map(move |range| self.slots[range].iter());
        head.chain(tail).flatten().copied()
    }

    fn all(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().flatten().copied()
    }
}

/// Read-only index over one batch of trips.
///
/// Cheap to clone; the trip batch is shared.
#[derive(Clone, Debug)]
pub struct TripIndex {
    trips: Arc<[Trip]>,
    departures: MinuteBuckets,
    arrivals: MinuteBuckets,
}

impl TripIndex {
    /// Bucket every trip by its start minute and by its end minute
    pub fn build(trips: impl Into<Arc<[Trip]>>) -> Self {
        let trips: Arc<[Trip]> = trips.into();

        let mut departures = MinuteBuckets::new();
        let mut arrivals = MinuteBuckets::new();

        for (position, trip) in trips.iter().enumerate() {
            departures.push(trip.start_minute(), position);
            arrivals.push(trip.end_minute(), position);
        }

        tracing::debug!(trips = trips.len(), "built minute trip index");

        Self {
            trips,
            departures,
            arrivals,
        }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    fn buckets(&self, axis: Axis) -> &MinuteBuckets {
        match axis {
            Axis::Departures => &self.departures,
            Axis::Arrivals => &self.arrivals,
        }
    }

    /// Number of trips bucketed along an axis; always equals `len()`
    pub fn indexed_count(&self, axis: Axis) -> usize {
        self.buckets(axis).len()
    }

    /// Trips in a single minute slot
    pub fn slot(&self, axis: Axis, minute: MinuteOfDay) -> Vec<&Trip> {
        self.buckets(axis)
            .slot(minute)
            .iter()
            .map(|&position| &self.trips[position])
            .collect()
    }

    /// Trips whose minute on `axis` lies inside the window
    pub fn within(&self, axis: Axis, window: &MinuteWindow) -> Vec<&Trip> {
        self.buckets(axis)
            .within(window)
            .map(|position| &self.trips[position])
            .collect()
    }

    /// Trips selected by a filter along one axis.
    ///
    /// `TimeFilter::Any` returns every trip. Order within the result is not
    /// meaningful.
    pub fn query(
        &self,
        axis: Axis,
        filter: TimeFilter,
        half_width: u16,
    ) -> Result<Vec<&Trip>> {
        let trips = match MinuteWindow::for_filter(filter, half_width)? {
            Some(window) => self.within(axis, &window),
            None => self
                .buckets(axis)
                .all()
                .map(|position| &self.trips[position])
                .collect(),
        };
        Ok(trips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(minute: u16) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0)
            .unwrap()
    }

    fn trip(from: &str, to: &str, start: u16, end: u16) -> Trip {
        Trip::new(from, to, at(start), at(end))
    }

    fn filter(value: i32) -> TimeFilter {
        TimeFilter::from_slider(value).unwrap()
    }

    #[test]
    fn test_index_completeness() {
        let trips: Vec<Trip> = (0..5000u16)
            .map(|i| trip("A", "B", (i * 7) % 1440, (i * 13 + 11) % 1440))
            .collect();
        let index = TripIndex::build(trips);

        assert_eq!(index.len(), 5000);
        assert_eq!(index.indexed_count(Axis::Departures), 5000);
        assert_eq!(index.indexed_count(Axis::Arrivals), 5000);
    }

    #[test]
    fn test_trip_lands_in_both_axes() {
        let index = TripIndex::build(vec![trip("A", "B", 485, 530)]);

        let minute = |m| MinuteOfDay::new(m).unwrap();
        assert_eq!(index.slot(Axis::Departures, minute(485)).len(), 1);
        assert_eq!(index.slot(Axis::Arrivals, minute(530)).len(), 1);
        assert!(index.slot(Axis::Departures, minute(530)).is_empty());
        assert!(index.slot(Axis::Arrivals, minute(485)).is_empty());
    }

    #[test]
    fn test_unfiltered_returns_everything() {
        let trips = vec![
            trip("A", "B", 0, 10),
            trip("B", "C", 700, 720),
            trip("C", "A", 1439, 5),
        ];
        let index = TripIndex::build(trips);

        assert_eq!(index.query(Axis::Departures, TimeFilter::Any, 60).unwrap().len(), 3);
        assert_eq!(index.query(Axis::Arrivals, TimeFilter::Any, 60).unwrap().len(), 3);
    }

    #[test]
    fn test_one_trip_per_minute_yields_window_size() {
        let trips: Vec<Trip> = (0..1440u16).map(|m| trip("A", "B", m, m)).collect();
        let index = TripIndex::build(trips);

        for center in [0, 1, 30, 59, 60, 61, 485, 1379, 1380, 1438, 1439] {
            let found = index.query(Axis::Departures, filter(center), 60).unwrap();
            assert_eq!(found.len(), 121, "center {}", center);
        }
    }

    #[test]
    fn test_wraparound_query() {
        let trips = vec![
            trip("A", "B", 5, 5),
            trip("A", "B", 1430, 1430),
            trip("A", "B", 1410, 1410),
            trip("A", "B", 90, 90),
            trip("A", "B", 91, 91),
            trip("A", "B", 1409, 1409),
        ];
        let index = TripIndex::build(trips);

        let mut minutes: Vec<u16> = index
            .query(Axis::Departures, filter(30), 60)
            .unwrap()
            .iter()
            .map(|t| t.start_minute().get())
            .collect();
        minutes.sort();

        assert_eq!(minutes, vec![5, 90, 1410, 1430]);
    }

    #[test]
    fn test_axes_are_queried_independently() {
        // Starts inside the 08:05 window, ends well after it
        let index = TripIndex::build(vec![trip("A", "B", 480, 700)]);

        assert_eq!(index.query(Axis::Departures, filter(485), 60).unwrap().len(), 1);
        assert!(index.query(Axis::Arrivals, filter(485), 60).unwrap().is_empty());
    }

    #[test]
    fn test_window_boundaries_inclusive() {
        let trips = vec![trip("A", "B", 425, 425), trip("A", "B", 545, 545)];
        let index = TripIndex::build(trips);

        assert_eq!(index.query(Axis::Departures, filter(485), 60).unwrap().len(), 2);
        assert_eq!(index.query(Axis::Departures, filter(484), 60).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_index() {
        let index = TripIndex::build(Vec::<Trip>::new());
        assert!(index.is_empty());
        assert!(index.query(Axis::Arrivals, filter(0), 60).unwrap().is_empty());
    }
}

//! In-memory traffic engine.
//!
//! Owns the station list, the trip index and the current traffic view.
//! Everything but the view is read-only after construction.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use rstar::RTree;

use crate::aggregate::aggregate;
use crate::config::EngineConfig;
use crate::identifiers::*;
use crate::index::{Axis, TripIndex};
use crate::ingest::{self, DataSource, RowPolicy};
use crate::models::{traits::*, types::*, TimeFilter};
use crate::network::DataFetcher;
use crate::scale::ScaleModel;
use crate::spatial::index::StationNode;
use crate::spatial::queries::{haversine_distance, search_radius_degrees};

/// Time-windowed station traffic over one batch of trips.
///
/// Cloning is cheap: the trip index and stations are shared through `Arc`s.
/// Each filter change recomputes the whole view and swaps it in at once,
/// so readers holding the previous view never see a half-updated one.
#[derive(Clone)]
pub struct TrafficEngine {
    // Core data
    stations: Vec<Arc<Station>>,
    index: Arc<TripIndex>,
    config: EngineConfig,

    // Lookup maps
    station_map: HashMap<StationIdentifier, usize>,

    // Spatial index
    station_tree: RTree<StationNode>,

    // Current view
    filter: TimeFilter,
    view: Arc<[StationTraffic]>,
    scales: ScaleModel,
}

impl TrafficEngine {
    /// Build the engine from already-validated data.
    ///
    /// The initial view is unfiltered.
    pub fn new(stations: Vec<Station>, trips: Vec<Trip>, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        // Build lookup maps; a repeated short_name keeps its first entry
        let mut station_map: HashMap<StationIdentifier, usize> = HashMap::new();
        let mut kept: Vec<Arc<Station>> = Vec::with_capacity(stations.len());
        for station in stations {
            if station_map.contains_key(&station.short_name) {
                tracing::warn!(station = %station.short_name, "duplicate station short_name");
                continue;
            }
            station_map.insert(station.short_name.clone(), kept.len());
            kept.push(Arc::new(station));
        }
        let stations = kept;

        // Build spatial index
        let station_tree = RTree::bulk_load(
            stations
                .iter()
                .map(|s| StationNode::new(s.location, s.clone()))
                .collect(),
        );

        let index = Arc::new(TripIndex::build(trips));

        let filter = TimeFilter::Any;
        let view: Arc<[StationTraffic]> =
            compute_view(&stations, &index, filter, &config)?.into();
        let scales = ScaleModel::for_view(&view, filter, &config.scales);

        Ok(Self {
            stations,
            index,
            config,
            station_map,
            station_tree,
            filter,
            view,
            scales,
        })
    }

    /// Fetch both inputs, then index them.
    ///
    /// This is the only suspension point; no query can run before the
    /// returned engine exists.
    pub async fn load<F>(
        fetcher: &F,
        source: &DataSource,
        config: EngineConfig,
        policy: RowPolicy,
    ) -> Result<Self>
    where
        F: DataFetcher + ?Sized,
    {
        let (stations, trips) = ingest::load(fetcher, source, policy).await?;
        Self::new(stations, trips, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &TripIndex {
        &self.index
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    /// Current per-station view, in station-list order
    pub fn view(&self) -> &[StationTraffic] {
        &self.view
    }

    /// Shared handle to the current view
    pub fn snapshot(&self) -> Arc<[StationTraffic]> {
        self.view.clone()
    }

    pub fn scales(&self) -> &ScaleModel {
        &self.scales
    }

    pub fn traffic(&self, id: &StationIdentifier) -> Result<&StationTraffic> {
        self.station_map
            .get(id)
            .map(|&position| &self.view[position])
            .ok_or_else(|| TrafficError::StationNotFound(id.clone()))
    }

    /// Switch the active filter and recompute the view.
    ///
    /// Setting the filter already in effect reuses the current view.
    pub fn set_filter(&mut self, filter: TimeFilter) -> Result<&[StationTraffic]> {
        if filter == self.filter {
            tracing::trace!(%filter, "filter unchanged, reusing view");
            return Ok(self.view());
        }

        let view: Arc<[StationTraffic]> =
            compute_view(&self.stations, &self.index, filter, &self.config)?.into();
        let scales = ScaleModel::for_view(&view, filter, &self.config.scales);

        self.filter = filter;
        self.view = view;
        self.scales = scales;
        Ok(self.view())
    }

    /// `set_filter` for a raw slider value in `[-1, 1439]`
    pub fn set_slider(&mut self, value: i32) -> Result<&[StationTraffic]> {
        self.set_filter(TimeFilter::from_slider(value)?)
    }
}

/// Query both axes for the filter and aggregate them
fn compute_view(
    stations: &[Arc<Station>],
    index: &TripIndex,
    filter: TimeFilter,
    config: &EngineConfig,
) -> Result<Vec<StationTraffic>> {
    let half_width = config.window.half_width_minutes;
    let departures = index.query(Axis::Departures, filter, half_width)?;
    let arrivals = index.query(Axis::Arrivals, filter, half_width)?;

    tracing::debug!(
        %filter,
        departures = departures.len(),
        arrivals = arrivals.len(),
        "recomputing station traffic"
    );

    Ok(aggregate(stations, departures, arrivals))
}

impl TrafficProvider for TrafficEngine {
    fn get_station(&self, id: &StationIdentifier) -> Option<Arc<Station>> {
        self.station_map
            .get(id)
            .map(|&position| self.stations[position].clone())
    }

    fn all_stations(&self) -> Vec<Arc<Station>> {
        self.stations.clone()
    }

    fn trip_count(&self) -> usize {
        self.index.len()
    }

    fn station_traffic(&self, filter: TimeFilter) -> Vec<StationTraffic> {
        if filter == self.filter {
            return self.view.to_vec();
        }
        match compute_view(&self.stations, &self.index, filter, &self.config) {
            Ok(view) => view,
            Err(error) => {
                tracing::warn!(%filter, %error, "station traffic query failed");
                Vec::new()
            }
        }
    }

    fn stations_near(&self, point: Point, radius_m: f64) -> Vec<Arc<Station>> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let radius_deg = search_radius_degrees(point, radius_m);
        self.station_tree
            .locate_within_distance([point.x(), point.y()], radius_deg * radius_deg)
            .filter(|node| haversine_distance(point, node.station.location) <= radius_m)
            .map(|node| node.station.clone())
            .collect()
    }

    fn nearest_station(&self, point: Point) -> Option<Arc<Station>> {
        self.station_tree
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|node| node.station.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::testing::MemoryFetcher;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn scenario() -> TrafficEngine {
        let stations = vec![
            Station::new("A", -71.090, 42.360),
            Station::new("B", -71.100, 42.370),
            Station::new("C", -71.120, 42.380),
        ];
        let trips = vec![
            Trip::new("A", "B", at(8, 5), at(8, 5)),
            Trip::new("B", "C", at(8, 50), at(8, 50)),
            Trip::new("C", "A", at(23, 58), at(23, 58)),
        ];
        TrafficEngine::new(stations, trips, EngineConfig::default()).unwrap()
    }

    fn counts(engine: &TrafficEngine) -> Vec<(&str, u32, u32)> {
        engine
            .view()
            .iter()
            .map(|s| (s.id().as_str(), s.departures(), s.arrivals()))
            .collect()
    }

    #[test]
    fn test_unfiltered_scenario() {
        let engine = scenario();
        assert_eq!(engine.filter(), TimeFilter::Any);
        assert_eq!(counts(&engine), vec![("A", 1, 1), ("B", 1, 1), ("C", 1, 1)]);
    }

    #[test]
    fn test_windowed_scenario() {
        let mut engine = scenario();
        engine.set_slider(485).unwrap();

        assert_eq!(counts(&engine), vec![("A", 1, 0), ("B", 1, 1), ("C", 0, 1)]);
    }

    #[test]
    fn test_late_night_window_wraps() {
        let mut engine = scenario();
        // 00:30 reaches back to 23:30 and catches the 23:58 trip
        engine.set_slider(30).unwrap();

        assert_eq!(counts(&engine), vec![("A", 0, 1), ("B", 0, 0), ("C", 1, 0)]);
    }

    #[test]
    fn test_back_to_any_time() {
        let mut engine = scenario();
        engine.set_slider(485).unwrap();
        engine.set_slider(-1).unwrap();

        assert_eq!(counts(&engine), vec![("A", 1, 1), ("B", 1, 1), ("C", 1, 1)]);
    }

    #[test]
    fn test_repeated_filter_is_idempotent() {
        let mut engine = scenario();
        let first = engine.set_slider(485).unwrap().to_vec();
        engine.set_slider(600).unwrap();
        let second = engine.set_slider(485).unwrap().to_vec();

        assert_eq!(first, second);
        assert_eq!(engine.station_traffic(TimeFilter::from_slider(485).unwrap()), first);
    }

    #[test]
    fn test_duplicate_stations_first_wins() {
        let stations = vec![
            Station::new("A", -71.090, 42.360).with_name("First"),
            Station::new("A", -71.100, 42.370).with_name("Second"),
            Station::new("B", -71.120, 42.380),
        ];
        let trips = vec![Trip::new("A", "A", at(8, 0), at(8, 10))];
        let engine = TrafficEngine::new(stations, trips, EngineConfig::default()).unwrap();

        assert_eq!(counts(&engine), vec![("A", 1, 1), ("B", 0, 0)]);
        let a = engine.get_station(&StationIdentifier::new("A")).unwrap();
        assert_eq!(a.name.as_deref(), Some("First"));
        // The dropped entry is not in the spatial index either
        let nearest = engine.nearest_station(Point::new(-71.100, 42.370)).unwrap();
        assert_eq!(nearest.name.as_deref(), Some("First"));
    }

    #[test]
    fn test_station_traffic_for_other_filter() {
        let engine = scenario();
        let other = engine.station_traffic(TimeFilter::from_slider(30).unwrap());

        let counts: Vec<(&str, u32, u32)> = other
            .iter()
            .map(|s| (s.id().as_str(), s.departures(), s.arrivals()))
            .collect();
        assert_eq!(counts, vec![("A", 0, 1), ("B", 0, 0), ("C", 1, 0)]);
        assert_eq!(engine.filter(), TimeFilter::Any);
    }

    #[test]
    fn test_rejected_slider_keeps_view() {
        let mut engine = scenario();
        engine.set_slider(485).unwrap();

        assert!(matches!(
            engine.set_slider(1440),
            Err(TrafficError::FilterOutOfRange(1440))
        ));
        assert_eq!(engine.filter().slider_value(), 485);
    }

    #[test]
    fn test_snapshot_survives_filter_change() {
        let mut engine = scenario();
        let before = engine.snapshot();
        engine.set_slider(485).unwrap();

        assert!(before.iter().all(|s| s.departures() == 1 && s.arrivals() == 1));
        assert_eq!(engine.view()[2].departures(), 0);
    }

    #[test]
    fn test_conservation_under_window() {
        let stations = vec![Station::new("A", 0.0, 0.0), Station::new("B", 0.0, 0.1)];
        let trips: Vec<Trip> = (0..24)
            .flat_map(|h| {
                [
                    Trip::new("A", "B", at(h, 0), at(h, 40)),
                    Trip::new("B", "A", at(h, 30), at((h + 1) % 24, 10)),
                    Trip::new("A", "GHOST", at(h, 15), at(h, 20)),
                ]
            })
            .collect();
        let mut engine = TrafficEngine::new(stations, trips, EngineConfig::default()).unwrap();

        for slider in [-1, 0, 30, 485, 720, 1439] {
            engine.set_slider(slider).unwrap();
            let filter = engine.filter();
            let half_width = engine.config().window.half_width_minutes;
            let index = engine.index();

            let matched_departures = index
                .query(Axis::Departures, filter, half_width)
                .unwrap()
                .into_iter()
                .filter(|t| t.start_station.as_str() != "GHOST")
                .count();
            let matched_arrivals = index
                .query(Axis::Arrivals, filter, half_width)
                .unwrap()
                .into_iter()
                .filter(|t| t.end_station.as_str() != "GHOST")
                .count();

            let total: u32 = engine.view().iter().map(|s| s.total_traffic()).sum();
            assert_eq!(total as usize, matched_departures + matched_arrivals, "slider {}", slider);
            for station in engine.view() {
                assert_eq!(station.total_traffic(), station.departures() + station.arrivals());
            }
        }
    }

    #[test]
    fn test_scales_follow_filter() {
        let mut engine = scenario();
        assert_eq!(engine.scales().radius.range(), (0.0, 25.0));
        assert_eq!(engine.scales().radius.domain(), (0.0, 2.0));

        engine.set_slider(485).unwrap();
        assert_eq!(engine.scales().radius.range(), (3.0, 50.0));
        assert_eq!(engine.scales().radius.domain(), (0.0, 2.0));

        let a = engine.traffic(&StationIdentifier::new("A")).unwrap();
        approx::assert_relative_eq!(engine.scales().radius_of(a), 3.0 + 47.0 / 2f64.sqrt());
    }

    #[test]
    fn test_lookups() {
        let engine = scenario();

        assert_eq!(engine.trip_count(), 3);
        assert_eq!(engine.all_stations().len(), 3);
        assert!(engine.get_station(&StationIdentifier::new("B")).is_some());
        assert!(engine.get_station(&StationIdentifier::new("Z")).is_none());
        assert!(matches!(
            engine.traffic(&StationIdentifier::new("Z")),
            Err(TrafficError::StationNotFound(_))
        ));
    }

    #[test]
    fn test_spatial_queries() {
        let engine = scenario();

        let nearest = engine.nearest_station(Point::new(-71.101, 42.371)).unwrap();
        assert_eq!(nearest.short_name.as_str(), "B");

        // A and B are about 1.4 km apart, C is over 3 km from A
        let near_a = engine.stations_near(Point::new(-71.090, 42.360), 1_500.0);
        let mut ids: Vec<&str> = near_a.iter().map(|s| s.short_name.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["A", "B"]);

        assert!(engine.stations_near(Point::new(-71.09, 42.36), -5.0).is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.window.half_width_minutes = 720;

        assert!(matches!(
            TrafficEngine::new(vec![], vec![], config),
            Err(TrafficError::InvalidWindow(720))
        ));
    }

    #[test]
    fn test_load_then_query() {
        let fetcher = MemoryFetcher::default()
            .with(
                "stations",
                r#"[{"short_name": "A", "lon": -71.09, "lat": 42.36},
                    {"short_name": "B", "lon": -71.10, "lat": 42.37}]"#,
            )
            .with(
                "trips",
                "started_at,ended_at,start_station_id,end_station_id\n\
                 2024-03-01 08:05:00,2024-03-01 08:20:00,A,B\n\
                 2024-03-01 17:45:00,2024-03-01 18:02:00,B,A\n",
            );
        let source = DataSource::new("stations", "trips");

        let mut engine = pollster::block_on(TrafficEngine::load(
            &fetcher,
            &source,
            EngineConfig::default(),
            RowPolicy::Strict,
        ))
        .unwrap();

        engine.set_slider(1080).unwrap();
        let a = engine.traffic(&StationIdentifier::new("A")).unwrap();
        let b = engine.traffic(&StationIdentifier::new("B")).unwrap();
        assert_eq!((a.departures(), a.arrivals()), (0, 1));
        assert_eq!((b.departures(), b.arrivals()), (1, 0));
    }
}

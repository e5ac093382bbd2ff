//! R-tree nodes for station hit-testing.
//!
//! ## Two-Stage Filtering
//!
//! Station lookups filter in two steps:
//! 1. **R-tree filter**: Euclidean distance in degrees, a cheap first cut
//! 2. **Haversine filter**: geodesic distance in meters on what remains
//!
//! The first stage must never discard a station the second would keep, so
//! callers widen the search radius when converting meters to degrees.

use std::sync::Arc;

use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::types::Station;

#[derive(Clone, Debug)]
pub struct StationNode {
    pub station: Arc<Station>,
    point: [f64; 2],
}

impl StationNode {
    pub fn new(location: Point, station: Arc<Station>) -> Self {
        Self {
            station,
            point: [location.x(), location.y()],
        }
    }
}

impl RTreeObject for StationNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StationNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstar::RTree;

    #[test]
    fn test_nearest_node() {
        let nodes: Vec<StationNode> = [("A", -71.09, 42.36), ("B", -71.12, 42.37)]
            .into_iter()
            .map(|(id, lon, lat)| {
                let station = Arc::new(Station::new(id, lon, lat));
                StationNode::new(station.location, station)
            })
            .collect();
        let tree = RTree::bulk_load(nodes);

        let nearest = tree.nearest_neighbor(&[-71.119, 42.371]).unwrap();
        assert_eq!(nearest.station.short_name.as_str(), "B");
    }
}

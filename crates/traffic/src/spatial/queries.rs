//! Spatial query utilities for distance calculations.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{HaversineDistance, Point};

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Convert meters to degrees of latitude (for bounding box queries)
pub fn meters_to_degrees_approx(meters: f64) -> f64 {
    meters / 111_320.0 // meters per degree at equator
}

/// Search radius in degrees that covers `radius_m` meters around `point`.
///
/// A degree of longitude shrinks with `cos(latitude)`, so the radius is
/// widened accordingly. Near the poles the whole globe is searched.
pub fn search_radius_degrees(point: Point, radius_m: f64) -> f64 {
    let cos_lat = point.y().to_radians().cos().abs();
    if cos_lat < 1e-6 {
        return 360.0;
    }
    meters_to_degrees_approx(radius_m) / cos_lat
}

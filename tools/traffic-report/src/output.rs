use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use std::path::Path;

use station_traffic::prelude::*;

/// Convert a station location to a GeoJSON Point
fn station_point(station: &Station) -> Value {
    Value::Point(vec![station.lon(), station.lat()])
}

/// Create a GeoJSON Feature from one station's traffic with scaled properties
fn station_to_feature(traffic: &StationTraffic, scales: &ScaleModel) -> Feature {
    let station = &traffic.station;

    let mut properties = serde_json::Map::new();
    properties.insert("short_name".to_string(), serde_json::json!(station.short_name.as_str()));
    if let Some(name) = &station.name {
        properties.insert("name".to_string(), serde_json::json!(name.as_ref()));
    }
    properties.insert("departures".to_string(), serde_json::json!(traffic.departures()));
    properties.insert("arrivals".to_string(), serde_json::json!(traffic.arrivals()));
    properties.insert("total_traffic".to_string(), serde_json::json!(traffic.total_traffic()));
    properties.insert("radius".to_string(), serde_json::json!(scales.radius_of(traffic)));
    // null for stations without traffic
    properties.insert(
        "departure_ratio".to_string(),
        serde_json::json!(scales.flow_of(traffic).map(FlowLevel::value)),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(station_point(station))),
        id: Some(geojson::feature::Id::String(station.short_name.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Build the FeatureCollection for a traffic view
pub fn traffic_collection(view: &[StationTraffic], scales: &ScaleModel, filter: TimeFilter) -> GeoJson {
    let mut foreign_members = serde_json::Map::new();
    foreign_members.insert("time_filter".to_string(), serde_json::json!(filter.slider_value()));
    foreign_members.insert("time_label".to_string(), serde_json::json!(filter.to_string()));

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features: view.iter().map(|s| station_to_feature(s, scales)).collect(),
        foreign_members: Some(foreign_members),
    })
}

/// Write station traffic to a GeoJSON file
pub fn write_traffic_geojson(
    view: &[StationTraffic],
    scales: &ScaleModel,
    filter: TimeFilter,
    path: &Path,
) -> Result<()> {
    let geojson = traffic_collection(view, scales, filter);

    std::fs::write(path, geojson.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

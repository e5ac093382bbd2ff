//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use index::StationNode;
pub use queries::{haversine_distance, search_radius_degrees};

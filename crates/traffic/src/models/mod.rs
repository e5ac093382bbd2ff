//! Bikeshare data models, types, and traits.

pub mod time_of_day;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use time_of_day::{minute_of_day, MinuteOfDay, TimeFilter, MINUTES_PER_DAY};
pub use traits::TrafficProvider;
pub use types::{Result, Station, StationTraffic, TrafficError, Trip};

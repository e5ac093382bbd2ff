//! Minute-of-day trip indexing and window queries.

pub mod trip_index;
pub mod window;

pub use trip_index::{Axis, TripIndex};
pub use window::MinuteWindow;

//! Traffic providers.

pub mod engine;

pub use engine::TrafficEngine;

//! Engine configuration.
//!
//! Every field has a default, so an empty document deserializes to the
//! standard one-hour window and the usual radius ranges.

use serde::{Deserialize, Serialize};

use crate::models::time_of_day::MINUTES_PER_DAY;
use crate::models::types::{Result, TrafficError};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub scales: ScaleConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        self.scales.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Minutes included on each side of the center minute
    pub half_width_minutes: u16,
}

impl WindowConfig {
    pub const DEFAULT_HALF_WIDTH: u16 = 60;

    /// Largest half-width whose window still visits each slot at most once
    pub const MAX_HALF_WIDTH: u16 = (MINUTES_PER_DAY - 1) / 2;

    pub fn validate(&self) -> Result<()> {
        if self.half_width_minutes > Self::MAX_HALF_WIDTH {
            return Err(TrafficError::InvalidWindow(self.half_width_minutes));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            half_width_minutes: Self::DEFAULT_HALF_WIDTH,
        }
    }
}

/// Pixel radius ranges for the circle scale
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Used when every trip is shown
    pub unfiltered_radius: (f64, f64),
    /// Used when a time window is active; volumes are much lower there
    pub filtered_radius: (f64, f64),
}

impl ScaleConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, (lo, hi)) in [
            ("unfiltered_radius", self.unfiltered_radius),
            ("filtered_radius", self.filtered_radius),
        ] {
            if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || hi < lo {
                return Err(TrafficError::InvalidData(format!(
                    "{} must satisfy 0 <= min <= max, got ({}, {})",
                    name, lo, hi
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            unfiltered_radius: (0.0, 25.0),
            filtered_radius: (3.0, 50.0),
        }
    }
}

//! Minute-of-day slots and the slider time filter.
//!
//! A day is split into 1440 one-minute slots. Only the wall-clock hour and
//! minute of a timestamp matter; the date part is ignored.

use std::fmt;

use chrono::Timelike;

use crate::models::types::{Result, TrafficError};

pub const MINUTES_PER_DAY: u16 = 1440;

/// A wall-clock minute in `[0, 1439]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfDay(pub(crate) u16);

impl MinuteOfDay {
    pub const MIDNIGHT: Self = Self(0);
    pub const LAST: Self = Self(MINUTES_PER_DAY - 1);

    pub fn new(minute: u16) -> Option<Self> {
        (minute < MINUTES_PER_DAY).then_some(Self(minute))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self((hour * 60 + minute) as u16))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Move around the clock face by `delta` minutes, wrapping at midnight
    pub fn offset(self, delta: i32) -> Self {
        let day = MINUTES_PER_DAY as i32;
        Self((self.0 as i32 + delta).rem_euclid(day) as u16)
    }

    /// 12-hour label as shown next to the slider (e.g. "8:05 AM")
    pub fn clock_label(self) -> String {
        let hour = self.hour();
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hour, self.minute(), suffix)
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Slot of a timestamp: `hour * 60 + minute` of its wall-clock time
pub fn minute_of_day<T: Timelike>(timestamp: &T) -> MinuteOfDay {
    MinuteOfDay((timestamp.hour() * 60 + timestamp.minute()) as u16)
}

/// Which part of the day the traffic view covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeFilter {
    /// Every trip in the batch
    #[default]
    Any,
    /// Trips within the configured window around this minute
    Around(MinuteOfDay),
}

impl TimeFilter {
    /// Slider value meaning "any time"
    pub const ANY_SLIDER_VALUE: i32 = -1;

    /// Interpret a raw slider value.
    ///
    /// `-1` disables filtering and `0..=1439` selects a center minute.
    /// Anything else is rejected instead of being wrapped.
    pub fn from_slider(value: i32) -> Result<Self> {
        match value {
            Self::ANY_SLIDER_VALUE => Ok(Self::Any),
            v if (0..MINUTES_PER_DAY as i32).contains(&v) => {
                Ok(Self::Around(MinuteOfDay(v as u16)))
            }
            v => Err(TrafficError::FilterOutOfRange(v)),
        }
    }

    pub fn slider_value(self) -> i32 {
        match self {
            Self::Any => Self::ANY_SLIDER_VALUE,
            Self::Around(center) => center.get() as i32,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Around(_))
    }

    pub fn center(self) -> Option<MinuteOfDay> {
        match self {
            Self::Any => None,
            Self::Around(center) => Some(center),
        }
    }
}

impl TryFrom<i32> for TimeFilter {
    type Error = TrafficError;

    fn try_from(value: i32) -> Result<Self> {
        Self::from_slider(value)
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "(any time)"),
            Self::Around(center) => write!(f, "{}", center.clock_label()),
        }
    }
}

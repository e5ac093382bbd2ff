//! Ring arithmetic for the ±N minute window.
//!
//! The 1440 minute slots form a ring. A window is the `2N + 1` consecutive
//! slots centered on a minute, and may straddle midnight. In that case it
//! is split into a tail segment `[lo, 1439]` and a head segment `[0, hi]`.

use std::ops::RangeInclusive;

use crate::config::WindowConfig;
use crate::models::time_of_day::{MinuteOfDay, TimeFilter, MINUTES_PER_DAY};
use crate::models::types::{Result, TrafficError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MinuteWindow {
    center: MinuteOfDay,
    half_width: u16,
    lo: MinuteOfDay,
    hi: MinuteOfDay,
}

impl MinuteWindow {
    pub fn new(center: MinuteOfDay, half_width: u16) -> Result<Self> {
        if half_width > WindowConfig::MAX_HALF_WIDTH {
            return Err(TrafficError::InvalidWindow(half_width));
        }
        let half = half_width as i32;
        Ok(Self {
            center,
            half_width,
            lo: center.offset(-half),
            hi: center.offset(half),
        })
    }

    /// Window for a filter, `None` when the filter lets every trip through
    pub fn for_filter(filter: TimeFilter, half_width: u16) -> Result<Option<Self>> {
        filter
            .center()
            .map(|center| Self::new(center, half_width))
            .transpose()
    }

    pub fn center(&self) -> MinuteOfDay {
        self.center
    }

    pub fn lo(&self) -> MinuteOfDay {
        self.lo
    }

    pub fn hi(&self) -> MinuteOfDay {
        self.hi
    }

    /// Number of slots covered, both ends included
    pub fn len(&self) -> usize {
        2 * self.half_width as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// True when the window crosses midnight
    pub fn wraps(&self) -> bool {
        self.lo > self.hi
    }

    pub fn contains(&self, minute: MinuteOfDay) -> bool {
        if self.wraps() {
            minute >= self.lo || minute <= self.hi
        } else {
            minute >= self.lo && minute <= self.hi
        }
    }

    /// Contiguous slot ranges covered by the window, in ring order
    pub fn segments(&self) -> (RangeInclusive<usize>, Option<RangeInclusive<usize>>) {
        let lo = self.lo.index();
        let hi = self.hi.index();
        if lo <= hi {
            (lo..=hi, None)
        } else {
            (lo..=MinuteOfDay::LAST.index(), Some(0..=hi))
        }
    }

    /// Every slot in the window, walking the ring from `lo` to `hi`
    pub fn slots(&self) -> impl Iterator<Item = MinuteOfDay> {
        let start = self.lo.get() as usize;
        let day = MINUTES_PER_DAY as usize;
        (0..self.len()).map(move |step| MinuteOfDay(((start + step) % day) as u16))
    }
}

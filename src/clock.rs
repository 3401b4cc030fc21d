//! Wall-clock access and the displayed-time mode.

use chrono::{Local, NaiveDateTime, NaiveTime};

use crate::error::OverrideError;

/// Source of the current local date and time.
pub trait WallClock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the operating system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl WallClock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: WallClock + ?Sized> WallClock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// What the pointers and digital readout show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTime {
    /// Follow the wall clock, refreshed once per second.
    Live,
    /// Frozen at a manually entered time; the refresh is suspended.
    Overridden(NaiveDateTime),
}

impl DisplayTime {
    pub fn is_overridden(&self) -> bool {
        matches!(self, DisplayTime::Overridden(_))
    }
}

/// Parse `HH:MM` override input into a time of day with zero seconds.
pub fn parse_time_override(input: &str) -> Result<NaiveTime, OverrideError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| OverrideError::InvalidTimeFormat(trimmed.to_string()))
}

//! Per-wake-cycle inputs and outputs that are not on the stack.

use chrono::{Datelike, Timelike};

use crate::config::DEFAULT_SLEEP_US;

/// Clock, battery and sleep state for one run.
///
/// The host fills in the clock and battery before running the script; the
/// `wakeup` builtin may change [`RunContext::sleep_time_us`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    /// Day of the week, 0 = Sunday.
    pub weekday: u32,
    /// Day of the month, 1-31.
    pub day: u32,
    /// Month, 1-12.
    pub month: u32,
    /// Full year, e.g. 2024.
    pub year: i32,
    pub hour: u32,
    pub minute: u32,
    /// Battery reading in volts.
    pub battery: f32,
    /// Deep-sleep duration requested for after the run.
    pub sleep_time_us: u64,
}

impl Default for RunContext {
    /// Thursday 1970-01-01 00:00 with an empty battery.
    fn default() -> Self {
        Self {
            weekday: 4,
            day: 1,
            month: 1,
            year: 1970,
            hour: 0,
            minute: 0,
            battery: 0.0,
            sleep_time_us: DEFAULT_SLEEP_US,
        }
    }
}

impl RunContext {
    /// Build from any chrono date-time.
    pub fn from_datetime<T: Datelike + Timelike>(dt: &T, battery: f32) -> Self {
        Self {
            weekday: dt.weekday().num_days_from_sunday(),
            day: dt.day(),
            month: dt.month(),
            year: dt.year(),
            hour: dt.hour(),
            minute: dt.minute(),
            battery,
            sleep_time_us: DEFAULT_SLEEP_US,
        }
    }

    /// Build from the local wall clock.
    pub fn now(battery: f32) -> Self {
        Self::from_datetime(&chrono::Local::now(), battery)
    }

    /// Minutes of the day, 0-1439.
    pub fn minute_of_day(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

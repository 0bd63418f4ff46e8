//! Simulated clock values
//!
//! The simulation runs in whole minutes. A `SimTime` counts minutes since
//! midnight of the first simulated day and never wraps: a run that goes past
//! midnight keeps counting into day 1, day 2, ...
//!
//! Time only moves when the engine pops an event; nothing here advances
//! on its own.

use serde::{Deserialize, Serialize};
use std::fmt;

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// A point in simulated time, in minutes since midnight of day 0
///
/// # Example
/// ```
/// use er_triage_core_rs::SimTime;
///
/// let opening = SimTime::from_hm(8, 0);
/// let triage_done = opening.plus_minutes(5);
///
/// assert_eq!(triage_done.minutes(), 8 * 60 + 5);
/// assert_eq!(triage_done.to_string(), "08:05");
/// assert!(opening < triage_done);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    /// Midnight of day 0
    pub const MIDNIGHT: SimTime = SimTime(0);

    /// Create a time from a raw minute count
    pub const fn from_minutes(minutes: u64) -> Self {
        SimTime(minutes)
    }

    /// Create a time of day on day 0
    ///
    /// # Panics
    /// Panics if `hour >= 24` or `minute >= 60`.
    ///
    /// # Example
    /// ```
    /// use er_triage_core_rs::SimTime;
    ///
    /// assert_eq!(SimTime::from_hm(20, 0).minutes(), 1200);
    /// ```
    pub const fn from_hm(hour: u64, minute: u64) -> Self {
        assert!(hour < 24, "hour must be below 24");
        assert!(minute < MINUTES_PER_HOUR, "minute must be below 60");
        SimTime(hour * MINUTES_PER_HOUR + minute)
    }

    /// Total minutes since midnight of day 0
    pub const fn minutes(self) -> u64 {
        self.0
    }

    /// This time shifted forward by `minutes`
    ///
    /// Saturates at `u64::MAX` instead of overflowing.
    pub const fn plus_minutes(self, minutes: u64) -> Self {
        SimTime(self.0.saturating_add(minutes))
    }

    /// Minutes elapsed from `earlier` to `self` (zero if `earlier` is later)
    ///
    /// # Example
    /// ```
    /// use er_triage_core_rs::SimTime;
    ///
    /// let a = SimTime::from_hm(8, 0);
    /// let b = SimTime::from_hm(9, 30);
    /// assert_eq!(b.minutes_since(a), 90);
    /// assert_eq!(a.minutes_since(b), 0);
    /// ```
    pub const fn minutes_since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Day index (0-based)
    pub const fn day(self) -> u64 {
        self.0 / MINUTES_PER_DAY
    }

    /// Hour within the current day
    pub const fn hour(self) -> u64 {
        (self.0 % MINUTES_PER_DAY) / MINUTES_PER_HOUR
    }

    /// Minute within the current hour
    pub const fn minute(self) -> u64 {
        self.0 % MINUTES_PER_HOUR
    }
}

impl fmt::Display for SimTime {
    /// `HH:MM` on day 0, `+Nd HH:MM` afterwards
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.day() == 0 {
            write!(f, "{:02}:{:02}", self.hour(), self.minute())
        } else {
            write!(f, "+{}d {:02}:{:02}", self.day(), self.hour(), self.minute())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "hour must be below 24")]
    fn test_invalid_hour_panics() {
        SimTime::from_hm(24, 0);
    }

    #[test]
    fn test_display_past_midnight() {
        let late = SimTime::from_hm(23, 50).plus_minutes(25);
        assert_eq!(late.day(), 1);
        assert_eq!(late.to_string(), "+1d 00:15");
    }

    #[test]
    fn test_plus_minutes_saturates() {
        let t = SimTime::from_minutes(u64::MAX - 1).plus_minutes(10);
        assert_eq!(t.minutes(), u64::MAX);
    }
}

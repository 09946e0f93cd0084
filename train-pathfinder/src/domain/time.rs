//! Conversions between fractional minutes and `chrono` durations.
//!
//! Schedules carry dwell and running times as fractional minutes, while
//! absolute times are `NaiveDateTime`. All conversions go through whole
//! milliseconds so that adding the same minute value twice always yields
//! the same instant.

use chrono::{Duration, NaiveDateTime};

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Converts fractional minutes to a `Duration`, rounded to the millisecond.
///
/// Returns `None` for NaN, infinities and spans too long to represent.
///
/// # Examples
///
/// ```
/// use train_pathfinder::domain::try_minutes;
/// use chrono::Duration;
///
/// assert_eq!(try_minutes(1.5), Some(Duration::seconds(90)));
/// assert_eq!(try_minutes(0.0), Some(Duration::zero()));
/// assert_eq!(try_minutes(f64::INFINITY), None);
/// ```
pub fn try_minutes(mins: f64) -> Option<Duration> {
    let millis = (mins * MILLIS_PER_MINUTE).round();
    // i64::MAX as f64 rounds up to 2^63, so this excludes it too
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// Advances `time` by fractional minutes, or `None` if the result can't
/// be represented.
pub fn add_minutes(time: NaiveDateTime, mins: f64) -> Option<NaiveDateTime> {
    time.checked_add_signed(try_minutes(mins)?)
}

/// Converts a `Duration` to fractional minutes.
pub fn as_minutes(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_MINUTE
}

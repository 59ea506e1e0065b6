//! Quiet hours arithmetic.

use chrono::{NaiveTime, Timelike};

use super::error::{Result, SettingsError};

/// Parses an `HH:mm` wall-clock time.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidTime`] if `value` is not a valid time.
pub fn parse_hh_mm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| SettingsError::InvalidTime(value.to_string()))
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Returns true if `now` falls inside the `[start, end)` window.
///
/// When `start` is not before `end` the window spans midnight, so
/// `22:00`..`08:00` covers late evening and early morning. Equal bounds
/// cover the whole day. Seconds are ignored.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidTime`] if either bound is malformed.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use guard_core::settings::is_in_quiet_hours;
///
/// let late = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
/// let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
/// assert!(is_in_quiet_hours("22:00", "08:00", late).unwrap());
/// assert!(!is_in_quiet_hours("22:00", "08:00", noon).unwrap());
/// ```
pub fn is_in_quiet_hours(start: &str, end: &str, now: NaiveTime) -> Result<bool> {
    let start = minute_of_day(parse_hh_mm(start)?);
    let end = minute_of_day(parse_hh_mm(end)?);
    let current = minute_of_day(now);

    if start < end {
        Ok(current >= start && current < end)
    } else {
        Ok(current >= start || current < end)
    }
}

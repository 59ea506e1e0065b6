//! User settings.
//!
//! [`AppSettings`] is always changed through a [`SettingsUpdate`] that is
//! merged onto the current values, never by replacing the whole record.

mod error;
mod quiet_hours;
pub mod types;

pub use error::{Result, SettingsError};
pub use quiet_hours::{is_in_quiet_hours, parse_hh_mm};
pub use types::{AppSettings, NudgeFrequency, SettingsUpdate, TIMER_DURATION_CHOICES};

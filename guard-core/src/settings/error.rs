//! Error types for settings validation.

use thiserror::Error;

/// Error type for settings operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A quiet-hours bound is not `HH:mm`.
    #[error("Invalid time (expected HH:mm): {0}")]
    InvalidTime(String),

    /// A value is out of range.
    #[error("Invalid setting: {0}")]
    InvalidValue(String),
}

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

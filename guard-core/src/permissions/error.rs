//! Error types for permission operations.

use thiserror::Error;

/// Error type for permission checks and requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The platform reported a failure.
    #[error("Platform permission error: {0}")]
    Platform(String),

    /// The permission cannot be queried on this platform.
    #[error("Permission unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for permission operations.
pub type Result<T> = std::result::Result<T, PermissionError>;

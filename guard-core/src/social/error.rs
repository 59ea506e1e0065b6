//! Error types for social connector operations.

use thiserror::Error;

use super::types::SocialPlatform;

/// Error type for connector operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// Operation needs a connected account.
    #[error("Not connected to {0}")]
    NotConnected(SocialPlatform),

    /// No connector exists for the platform name.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

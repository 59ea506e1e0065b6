//! Crate-level error type.
//!
//! Each module owns a narrow error enum; [`GuardError`] wraps them for the
//! [`PrivacyGuard`](crate::PrivacyGuard) facade.

use thiserror::Error;

use crate::composer::ComposeError;
use crate::config::ConfigError;
use crate::permissions::PermissionError;
use crate::settings::SettingsError;
use crate::social::ConnectorError;
use crate::store::StoreError;

/// Error type for facade operations.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Persisted state could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A social connector operation failed.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// The platform permission shim failed.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Settings contained an invalid value.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The composer rejected the draft.
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Export serialization failed.
    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),

    /// Post not found.
    #[error("Post not found: {0}")]
    PostNotFound(String),

    /// Nudge not found.
    #[error("Nudge not found: {0}")]
    NudgeNotFound(String),

    /// Nudge does not offer the requested action.
    #[error("Nudge {nudge_id} has no action {action_id}")]
    UnknownAction {
        /// The nudge that was acted on.
        nudge_id: String,
        /// The action id that was not offered.
        action_id: String,
    },
}

/// Result type alias for facade operations.
pub type Result<T> = std::result::Result<T, GuardError>;

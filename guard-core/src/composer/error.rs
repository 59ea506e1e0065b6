//! Error types for the composer.

use thiserror::Error;

use crate::social::SocialPlatform;

/// Error type for composer operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// Draft content is empty or whitespace.
    #[error("Please enter some content")]
    EmptyContent,

    /// No platform is selected.
    #[error("Please select at least one platform")]
    NoPlatform,

    /// The platform has no connected account.
    #[error("{0} is not connected")]
    PlatformNotConnected(SocialPlatform),

    /// The action is not valid in the current step.
    #[error("Cannot {action} while {stage}")]
    InvalidTransition {
        /// What was attempted.
        action: &'static str,
        /// The step the draft was in.
        stage: &'static str,
    },
}

/// Result type alias for composer operations.
pub type Result<T> = std::result::Result<T, ComposeError>;

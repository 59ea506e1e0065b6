//! Privacy Guard Core Library
//!
//! Core functionality for Privacy Guard - a local-only privacy companion that
//! watches app permission usage, aggregates social posts, and nudges the user
//! before regrettable disclosures.
//!
//! All state lives on the device in a single persisted JSON blob. Social
//! connectors and permission telemetry are mocks; nothing leaves the device.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod audit;
pub mod composer;
pub mod config;
mod error;
pub mod exposure;
pub mod nudge;
pub mod onboarding;
pub mod permissions;
pub mod settings;
pub mod social;
pub mod store;
pub mod summary;
pub mod util;

pub use api::{NudgeOutcome, PrivacyGuard};
pub use config::GuardConfig;
pub use error::{GuardError, Result};
pub use exposure::PrivacyRiskLevel;

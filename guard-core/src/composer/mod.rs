//! Post composition with audience and timer nudges.
//!
//! A [`Composer`] holds one draft and walks it through the nudge steps:
//!
//! ```text
//! Editing ──submit──▶ AudienceReview ──continue──▶ Countdown(n) ──tick…──▶ ReadyToPublish
//!    ▲                      │                          │                        │
//!    └──────cancel/edit─────┴──────────────────────────┘          publish ──────┘
//! ```
//!
//! Disabled nudges skip their step.

mod draft;
mod error;

pub use draft::{Composer, ComposerStage};
pub use error::{ComposeError, Result};

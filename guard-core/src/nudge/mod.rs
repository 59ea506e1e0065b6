//! Behavioural nudges.
//!
//! [`NudgeEngine`] turns permission records, drafts and stored posts into
//! [`Nudge`] records. Nudge actions are plain data: the caller dispatches on
//! [`NudgeAction::id`] (see the `ACTION_*` constants).
//!
//! # Types
//!
//! - [`Nudge`]: A prompt shown to the user
//! - [`NudgeData`]: Context attached to a nudge
//! - [`NudgeHistory`]: How the user has responded so far

mod engine;
pub mod types;

pub use engine::NudgeEngine;
pub use types::{
    Nudge, NudgeAction, NudgeActionKind, NudgeData, NudgeDeliveryStyle, NudgeHistory, NudgeStatus,
    NudgeType, NudgeUpdate, ACTION_CANCEL, ACTION_CHANGE_AUDIENCE, ACTION_CHANGE_SETTINGS,
    ACTION_CONTINUE, ACTION_DISMISS, ACTION_MAKE_PRIVATE, ACTION_REVIEW, ACTION_VIEW_DETAILS,
};

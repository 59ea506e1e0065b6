//! Draft state machine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::{ComposeError, Result};
use crate::config::RiskThresholds;
use crate::exposure::assess_post;
use crate::nudge::{Nudge, NudgeEngine};
use crate::settings::AppSettings;
use crate::social::{PostVisibility, SocialPlatform, SocialPost};
use crate::util::generate_id;

/// Where a draft is in the posting flow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ComposerStage {
    /// Being written.
    #[default]
    Editing,
    /// Waiting on the audience nudge.
    #[serde(rename_all = "camelCase")]
    AudienceReview {
        /// The audience nudge shown for this draft.
        nudge_id: String,
    },
    /// Counting down before publishing.
    Countdown {
        /// Seconds left.
        remaining: u32,
    },
    /// Cleared every nudge; [`Composer::publish`] may run.
    ReadyToPublish,
}

impl ComposerStage {
    /// Converts to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::AudienceReview { .. } => "audience_review",
            Self::Countdown { .. } => "countdown",
            Self::ReadyToPublish => "ready_to_publish",
        }
    }
}

/// One post being composed.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    content: String,
    visibility: PostVisibility,
    platforms: Vec<SocialPlatform>,
    stage: ComposerStage,
}

impl Composer {
    /// Creates an empty friends-only draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn visibility(&self) -> PostVisibility {
        self.visibility
    }

    /// Selected platforms in selection order.
    #[must_use]
    pub fn platforms(&self) -> &[SocialPlatform] {
        &self.platforms
    }

    #[must_use]
    pub const fn stage(&self) -> &ComposerStage {
        &self.stage
    }

    /// Replaces the draft text. Editing drops the draft back to
    /// [`ComposerStage::Editing`].
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.stage = ComposerStage::Editing;
    }

    /// Changes the audience. Drops the draft back to editing.
    pub fn set_visibility(&mut self, visibility: PostVisibility) {
        self.visibility = visibility;
        self.stage = ComposerStage::Editing;
    }

    /// Selects or deselects `platform`. Returns whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::PlatformNotConnected`] when selecting a
    /// platform missing from `connected`.
    pub fn toggle_platform(
        &mut self,
        platform: SocialPlatform,
        connected: &[SocialPlatform],
    ) -> Result<bool> {
        if let Some(index) = self.platforms.iter().position(|p| *p == platform) {
            self.platforms.remove(index);
            return Ok(false);
        }
        if !connected.contains(&platform) {
            return Err(ComposeError::PlatformNotConnected(platform));
        }
        self.platforms.push(platform);
        Ok(true)
    }

    fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(ComposeError::EmptyContent);
        }
        if self.platforms.is_empty() {
            return Err(ComposeError::NoPlatform);
        }
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> ComposeError {
        ComposeError::InvalidTransition {
            action,
            stage: self.stage.as_str(),
        }
    }

    /// Validates the draft and starts the nudge steps.
    ///
    /// Returns the audience nudge to store and show, or `None` when audience
    /// nudges are disabled and the draft went straight to the timer step.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty content or no platform, or
    /// [`ComposeError::InvalidTransition`] if the draft was already submitted.
    pub fn submit(
        &mut self,
        settings: &AppSettings,
        engine: &NudgeEngine,
        now: DateTime<Utc>,
    ) -> Result<Option<Nudge>> {
        if self.stage != ComposerStage::Editing {
            return Err(self.invalid("submit"));
        }
        self.validate()?;

        if settings.audience_nudge_enabled {
            let nudge = engine.create_audience_nudge(
                engine.audience_for(self.visibility),
                self.visibility,
                now,
            );
            self.stage = ComposerStage::AudienceReview {
                nudge_id: nudge.id.clone(),
            };
            Ok(Some(nudge))
        } else {
            self.start_timer(settings);
            Ok(None)
        }
    }

    /// Accepts the audience nudge and moves on to the timer step.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::InvalidTransition`] outside audience review.
    pub fn continue_posting(&mut self, settings: &AppSettings) -> Result<&ComposerStage> {
        if !matches!(self.stage, ComposerStage::AudienceReview { .. }) {
            return Err(self.invalid("continue"));
        }
        self.start_timer(settings);
        Ok(&self.stage)
    }

    fn start_timer(&mut self, settings: &AppSettings) {
        self.stage = if settings.timer_nudge_enabled && settings.timer_nudge_duration > 0 {
            ComposerStage::Countdown {
                remaining: settings.timer_nudge_duration,
            }
        } else {
            ComposerStage::ReadyToPublish
        };
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> &ComposerStage {
        if let ComposerStage::Countdown { remaining } = self.stage {
            self.stage = match remaining.saturating_sub(1) {
                0 => ComposerStage::ReadyToPublish,
                left => ComposerStage::Countdown { remaining: left },
            };
        }
        &self.stage
    }

    /// Skips the rest of the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::InvalidTransition`] unless counting down or
    /// already ready.
    pub fn post_now(&mut self) -> Result<()> {
        match self.stage {
            ComposerStage::Countdown { .. } | ComposerStage::ReadyToPublish => {
                self.stage = ComposerStage::ReadyToPublish;
                Ok(())
            }
            _ => Err(self.invalid("post now")),
        }
    }

    /// Abandons the nudge steps and returns to editing. Returns the audience
    /// nudge id when cancelled during audience review.
    pub fn cancel(&mut self) -> Option<String> {
        match std::mem::take(&mut self.stage) {
            ComposerStage::AudienceReview { nudge_id } => Some(nudge_id),
            _ => None,
        }
    }

    /// Returns true once every nudge step is cleared.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.stage == ComposerStage::ReadyToPublish
    }

    /// Builds one post per selected platform and resets the draft.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::InvalidTransition`] unless ready to publish.
    pub fn publish(
        &mut self,
        engine: &NudgeEngine,
        thresholds: &RiskThresholds,
        now: DateTime<Utc>,
    ) -> Result<Vec<SocialPost>> {
        if !self.is_ready() {
            return Err(self.invalid("publish"));
        }
        self.validate()?;

        let assessment = assess_post(&self.content, self.visibility, None, thresholds);
        let audience_size = engine.audience_for(self.visibility);

        let posts = self
            .platforms
            .iter()
            .map(|&platform| SocialPost {
                id: generate_id(),
                platform,
                content: self.content.clone(),
                media_urls: None,
                posted_at: now,
                visibility: self.visibility,
                audience_size: Some(audience_size),
                tags: None,
                location: None,
                mentions: None,
                risk_level: assessment.risk_level,
                risk_reasons: (!assessment.risk_reasons.is_empty())
                    .then(|| assessment.risk_reasons.clone()),
            })
            .collect();

        self.content.clear();
        self.platforms.clear();
        self.stage = ComposerStage::Editing;
        Ok(posts)
    }
}

//! Application facade.
//!
//! [`PrivacyGuard`] owns the store, the permission platform, the live social
//! connectors and the draft being composed, and exposes one method per
//! screen-level action.

use std::collections::HashMap;

use chrono::{DateTime, Local, TimeZone, Utc};
use log::{debug, info};
use serde::Serialize;

use crate::audit::{export_csv, export_json, filter_log, AuditFilter, AuditLogEntry, AuditStats};
use crate::composer::{Composer, ComposerStage};
use crate::config::GuardConfig;
use crate::error::{GuardError, Result};
use crate::exposure::{auto_fix, calculate_privacy_risk, scan_posts, ExposureAnalysis, PrivacyRiskLevel, ScanReport};
use crate::nudge::{
    Nudge, NudgeEngine, NudgeHistory, NudgeStatus, NudgeUpdate, ACTION_CANCEL,
    ACTION_CHANGE_AUDIENCE, ACTION_CHANGE_SETTINGS, ACTION_CONTINUE, ACTION_DISMISS,
    ACTION_MAKE_PRIVATE, ACTION_REVIEW, ACTION_VIEW_DETAILS,
};
use crate::onboarding::{complete_onboarding, OnboardingReport};
use crate::permissions::{
    check_permission, filter_by_permission, platform_permission, request_permission,
    sensitive_accesses, AppPermissionAccess, PermissionFilter, PermissionPlatform, PermissionType,
};
use crate::settings::{AppSettings, SettingsUpdate};
use crate::social::{
    connected_platforms, connector_for, filter_posts, import_posts, unconnected_platforms,
    MockConnector, PostFilter, PostUpdate, PostVisibility, SocialAccount, SocialConnector,
    SocialPlatform, SocialPost,
};
use crate::store::{AppState, AppStore};
use crate::summary::{compute_summary, recent_posts, PrivacySummary, RECENT_POST_PREVIEW};

/// What acting on a nudge led to. The UI navigates accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NudgeOutcome {
    /// The nudge was dismissed.
    Dismissed,
    /// The nudge was marked acted with nothing else to do.
    Acknowledged,
    /// Open the permissions screen.
    ShowPermissions,
    /// Open the settings screen.
    ShowSettings,
    /// Open the post for review.
    #[serde(rename_all = "camelCase")]
    ReviewPost { post_id: String },
    /// The post was made private.
    #[serde(rename_all = "camelCase")]
    PostMadePrivate { post_id: String },
    /// The draft moved to a new step.
    Composer { stage: ComposerStage },
}

/// Entry point for every screen of the app.
///
/// # Example
///
/// ```ignore
/// use guard_core::permissions::HeadlessPlatform;
/// use guard_core::{GuardConfig, PrivacyGuard};
///
/// let mut guard = PrivacyGuard::open(GuardConfig::new("/data/guard"), Box::new(HeadlessPlatform::default()))?;
/// guard.connect_account("facebook").await?;
/// let report = guard.run_exposure_scan();
/// ```
pub struct PrivacyGuard {
    config: GuardConfig,
    store: AppStore,
    platform: Box<dyn PermissionPlatform>,
    connectors: HashMap<SocialPlatform, MockConnector>,
    engine: NudgeEngine,
    composer: Composer,
    last_scan: Option<ScanReport>,
}

impl PrivacyGuard {
    /// Opens the guard over the `SQLite` store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the store cannot
    /// be opened.
    pub fn open(config: GuardConfig, platform: Box<dyn PermissionPlatform>) -> Result<Self> {
        config.validate()?;
        let store = AppStore::open(&config)?;
        info!("Privacy guard opened at {}", config.data_dir.display());
        Ok(Self::with_store(config, store, platform))
    }

    /// Creates a guard over an existing store.
    #[must_use]
    pub fn with_store(
        config: GuardConfig,
        store: AppStore,
        platform: Box<dyn PermissionPlatform>,
    ) -> Self {
        let engine = NudgeEngine::new(config.nudge.clone());
        Self {
            config,
            store,
            platform,
            connectors: HashMap::new(),
            engine,
            composer: Composer::new(),
            last_scan: None,
        }
    }

    /// Creates a guard over fresh in-memory state.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn in_memory(config: GuardConfig, platform: Box<dyn PermissionPlatform>) -> Self {
        let store = AppStore::in_memory(&config);
        Self::with_store(config, store, platform)
    }

    #[must_use]
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Full persisted state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        self.store.state()
    }

    #[must_use]
    pub const fn settings(&self) -> &AppSettings {
        self.store.settings()
    }

    // ==================== Onboarding ====================

    #[must_use]
    pub const fn has_completed_onboarding(&self) -> bool {
        self.store.has_completed_onboarding()
    }

    /// Requests basic permissions, seeds demo data and finishes onboarding.
    pub fn complete_onboarding(&mut self) -> OnboardingReport {
        complete_onboarding(
            &mut self.store,
            self.platform.as_ref(),
            &mut rand::thread_rng(),
            Utc::now(),
        )
    }

    // ==================== Dashboard ====================

    /// Recomputes and stores the dashboard figures.
    pub fn refresh_summary(&mut self) -> &PrivacySummary {
        let summary = compute_summary(
            self.store.permission_accesses(),
            self.store.social_posts(),
            self.config.nudge.top_app_count,
            &self.config.risk,
            Utc::now(),
        );
        self.store.update_privacy_summary(&summary.into());
        self.store.privacy_summary()
    }

    /// Overall risk from public posts and sensitive permission records.
    #[must_use]
    pub fn privacy_score(&self) -> PrivacyRiskLevel {
        let public_posts = self
            .store
            .social_posts()
            .iter()
            .filter(|p| p.visibility == PostVisibility::Public)
            .count();
        calculate_privacy_risk(
            public_posts,
            sensitive_accesses(self.store.permission_accesses()).len(),
            &self.config.risk,
        )
    }

    /// Newest posts for the dashboard preview.
    #[must_use]
    pub fn recent_posts(&self) -> &[SocialPost] {
        recent_posts(self.store.social_posts(), RECENT_POST_PREVIEW)
    }

    /// Returns true if the periodic summary should be shown again.
    #[must_use]
    pub fn summary_due(&self, last_shown: Option<DateTime<Utc>>) -> bool {
        NudgeEngine::should_show_daily_summary(
            last_shown,
            self.store.settings().nudge_frequency,
            Utc::now(),
        )
    }

    // ==================== Permissions ====================

    #[must_use]
    pub fn permission_accesses(&self, filter: PermissionFilter) -> Vec<&AppPermissionAccess> {
        filter_by_permission(self.store.permission_accesses(), filter)
    }

    /// Marks every record of `app_name` safe. Returns the number changed.
    pub fn mark_app_as_safe(&mut self, app_name: &str) -> usize {
        self.store.mark_app_as_safe(app_name)
    }

    /// Returns true if the OS reports `permission` as granted.
    #[must_use]
    pub fn check_permission(&self, permission: PermissionType) -> bool {
        check_permission(self.platform.as_ref(), permission)
    }

    /// Asks the OS for `permission`. Returns true if granted.
    pub fn request_permission(&self, permission: PermissionType) -> bool {
        request_permission(self.platform.as_ref(), permission)
    }

    /// OS identifier of `permission` on the host platform.
    #[must_use]
    pub fn permission_identifier(&self, permission: PermissionType) -> &'static str {
        platform_permission(permission, self.platform.os())
    }

    // ==================== Social ====================

    #[must_use]
    pub fn posts(&self, filter: PostFilter) -> Vec<&SocialPost> {
        filter_posts(self.store.social_posts(), filter)
    }

    /// Platforms with no connected account.
    #[must_use]
    pub fn unconnected_platforms(&self) -> Vec<SocialPlatform> {
        unconnected_platforms(self.store.social_accounts())
    }

    /// Links the named platform and imports its posts.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown platform name or a failed connect.
    pub async fn connect_account(&mut self, platform: &str) -> Result<SocialAccount> {
        let mut connector = connector_for(platform, &self.config)?;
        let (account, posts) = import_posts(&mut connector, self.config.fetch_limit).await?;

        info!(
            "Imported {} posts from {}",
            posts.len(),
            connector.platform()
        );
        self.store.connect_social_account(account.clone());
        self.store.add_social_posts(posts);
        self.connectors.insert(connector.platform(), connector);
        Ok(account)
    }

    /// Unlinks `platform`. Returns true if an account was stored. Imported
    /// posts are kept.
    pub async fn disconnect_account(&mut self, platform: SocialPlatform) -> bool {
        if let Some(mut connector) = self.connectors.remove(&platform) {
            connector.disconnect().await;
        }
        self.store.disconnect_social_account(platform)
    }

    fn live_connector(&mut self, platform: SocialPlatform) -> Option<&mut MockConnector> {
        self.connectors
            .get_mut(&platform)
            .filter(|c| c.is_connected())
    }

    fn post_platform(&self, post_id: &str) -> Result<SocialPlatform> {
        self.store
            .find_post(post_id)
            .map(|p| p.platform)
            .ok_or_else(|| GuardError::PostNotFound(post_id.to_string()))
    }

    /// Changes who can see a post.
    ///
    /// The change is pushed through the platform's connector when one is
    /// live this session, and always applied to the stored post.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::PostNotFound`] or a connector failure.
    pub async fn change_post_visibility(
        &mut self,
        post_id: &str,
        visibility: PostVisibility,
    ) -> Result<()> {
        let platform = self.post_platform(post_id)?;
        if let Some(connector) = self.live_connector(platform) {
            connector.update_post_visibility(post_id, visibility).await?;
        } else {
            debug!("No live {platform} connector, updating post {post_id} locally");
        }

        self.store
            .update_social_post(post_id, &PostUpdate::visibility(visibility));
        Ok(())
    }

    /// Deletes a post, remotely when a connector is live.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::PostNotFound`] or a connector failure.
    pub async fn delete_post(&mut self, post_id: &str) -> Result<SocialPost> {
        let platform = self.post_platform(post_id)?;
        if let Some(connector) = self.live_connector(platform) {
            connector.delete_post(post_id).await?;
        } else {
            debug!("No live {platform} connector, deleting post {post_id} locally");
        }

        self.store
            .delete_social_post(post_id)
            .ok_or_else(|| GuardError::PostNotFound(post_id.to_string()))
    }

    // ==================== Exposure ====================

    /// Scans every stored post. With exposure analysis disabled the report
    /// is empty.
    pub fn run_exposure_scan(&mut self) -> &ScanReport {
        let posts: &[SocialPost] = if self.store.settings().exposure_analysis_enabled {
            self.store.social_posts()
        } else {
            debug!("Exposure analysis disabled, skipping scan");
            &[]
        };
        let report = scan_posts(posts, Utc::now());
        info!(
            "Exposure scan: {} findings over {} posts",
            report.exposures.len(),
            report.posts_scanned
        );
        self.last_scan.insert(report)
    }

    /// Result of the most recent scan, if any.
    #[must_use]
    pub const fn last_scan(&self) -> Option<&ScanReport> {
        self.last_scan.as_ref()
    }

    /// Applies the automatic fix for `exposure`.
    ///
    /// Returns false when the finding cannot be fixed automatically.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::PostNotFound`] if the post is gone.
    pub fn fix_exposure(&mut self, exposure: &ExposureAnalysis) -> Result<bool> {
        let Some(update) = auto_fix(exposure) else {
            return Ok(false);
        };
        if !self.store.update_social_post(&exposure.post_id, &update) {
            return Err(GuardError::PostNotFound(exposure.post_id.clone()));
        }
        if let Some(report) = &mut self.last_scan {
            report.exposures.retain(|e| e != exposure);
        }
        Ok(true)
    }

    /// Queues exposure nudges for the stored posts. Returns how many were
    /// added.
    pub fn queue_exposure_nudges(&mut self) -> usize {
        if !self.store.settings().exposure_analysis_enabled {
            return 0;
        }
        let nudges = self
            .engine
            .analyze_posts_for_nudges(self.store.social_posts(), Utc::now());
        let count = nudges.len();
        for nudge in nudges {
            self.store.add_nudge(nudge);
        }
        count
    }

    // ==================== Nudges ====================

    /// Queues the permission access nudge for the current local time.
    pub fn queue_permission_nudge(&mut self) -> Option<String> {
        self.queue_permission_nudge_at(&Local::now())
    }

    /// Queues the permission access nudge as of `now`. Returns its id, or
    /// `None` when suppressed or there is nothing to report.
    pub fn queue_permission_nudge_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Option<String> {
        let nudge = self.engine.create_permission_nudge(
            self.store.permission_accesses(),
            self.store.settings(),
            now,
        )?;
        let id = nudge.id.clone();
        self.store.add_nudge(nudge);
        Some(id)
    }

    /// Pending nudges, most urgent first.
    #[must_use]
    pub fn prioritized_nudges(&self) -> Vec<(&Nudge, i32)> {
        let history = NudgeHistory::from_nudges(self.store.nudges());
        let mut ranked: Vec<_> = self
            .store
            .pending_nudges()
            .into_iter()
            .map(|n| (n, self.engine.calculate_nudge_priority(n, &history)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    #[must_use]
    pub fn nudges(&self) -> &[Nudge] {
        self.store.nudges()
    }

    /// # Errors
    ///
    /// Returns [`GuardError::NudgeNotFound`] for an unknown id.
    pub fn dismiss_nudge(&mut self, nudge_id: &str) -> Result<()> {
        if self.store.dismiss_nudge(nudge_id) {
            Ok(())
        } else {
            Err(GuardError::NudgeNotFound(nudge_id.to_string()))
        }
    }

    /// # Errors
    ///
    /// Returns [`GuardError::NudgeNotFound`] for an unknown id.
    pub fn snooze_nudge(&mut self, nudge_id: &str) -> Result<()> {
        if self.store.snooze_nudge(nudge_id) {
            Ok(())
        } else {
            Err(GuardError::NudgeNotFound(nudge_id.to_string()))
        }
    }

    fn mark_acted(&mut self, nudge_id: &str) {
        self.store.update_nudge(
            nudge_id,
            &NudgeUpdate::responded(NudgeStatus::Acted, Utc::now()),
        );
    }

    fn is_draft_nudge(&self, nudge_id: &str) -> bool {
        matches!(self.composer.stage(), ComposerStage::AudienceReview { nudge_id: id } if id == nudge_id)
    }

    /// Performs the nudge action `action_id` and records the response.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::NudgeNotFound`], [`GuardError::UnknownAction`]
    /// if the nudge does not offer the action, or the error of the action
    /// itself.
    pub fn act_on_nudge(&mut self, nudge_id: &str, action_id: &str) -> Result<NudgeOutcome> {
        let nudge = self
            .store
            .find_nudge(nudge_id)
            .ok_or_else(|| GuardError::NudgeNotFound(nudge_id.to_string()))?;
        if nudge.action(action_id).is_none() {
            return Err(GuardError::UnknownAction {
                nudge_id: nudge_id.to_string(),
                action_id: action_id.to_string(),
            });
        }
        let nudge_type = nudge.nudge_type;
        let post_id = nudge.post_id().map(str::to_string);
        debug!("Nudge {nudge_id} ({nudge_type:?}): {action_id}");

        match action_id {
            ACTION_DISMISS | ACTION_CANCEL => {
                if self.is_draft_nudge(nudge_id) {
                    self.composer.cancel();
                }
                self.dismiss_nudge(nudge_id)?;
                Ok(NudgeOutcome::Dismissed)
            }
            ACTION_CONTINUE => {
                if !self.is_draft_nudge(nudge_id) {
                    self.mark_acted(nudge_id);
                    return Ok(NudgeOutcome::Acknowledged);
                }
                let stage = self.composer.continue_posting(self.store.settings())?.clone();
                self.mark_acted(nudge_id);
                Ok(NudgeOutcome::Composer { stage })
            }
            ACTION_CHANGE_AUDIENCE => {
                self.mark_acted(nudge_id);
                if self.is_draft_nudge(nudge_id) {
                    self.composer.cancel();
                }
                Ok(NudgeOutcome::Composer {
                    stage: self.composer.stage().clone(),
                })
            }
            ACTION_VIEW_DETAILS => {
                self.mark_acted(nudge_id);
                Ok(NudgeOutcome::ShowPermissions)
            }
            ACTION_CHANGE_SETTINGS => {
                self.mark_acted(nudge_id);
                Ok(NudgeOutcome::ShowSettings)
            }
            ACTION_REVIEW => {
                self.mark_acted(nudge_id);
                Ok(post_id.map_or(NudgeOutcome::Acknowledged, |post_id| {
                    NudgeOutcome::ReviewPost { post_id }
                }))
            }
            ACTION_MAKE_PRIVATE => {
                let post_id = post_id.ok_or_else(|| GuardError::UnknownAction {
                    nudge_id: nudge_id.to_string(),
                    action_id: action_id.to_string(),
                })?;
                if !self
                    .store
                    .update_social_post(&post_id, &PostUpdate::visibility(PostVisibility::Private))
                {
                    return Err(GuardError::PostNotFound(post_id));
                }
                self.mark_acted(nudge_id);
                Ok(NudgeOutcome::PostMadePrivate { post_id })
            }
            _ => {
                self.mark_acted(nudge_id);
                Ok(NudgeOutcome::Acknowledged)
            }
        }
    }

    // ==================== Composer ====================

    #[must_use]
    pub const fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Replaces the draft text and audience.
    pub fn edit_draft(&mut self, content: &str, visibility: PostVisibility) {
        self.composer.set_content(content);
        self.composer.set_visibility(visibility);
    }

    /// Selects or deselects a platform for the draft.
    ///
    /// # Errors
    ///
    /// Returns an error when selecting a platform with no connected account.
    pub fn toggle_draft_platform(&mut self, platform: SocialPlatform) -> Result<bool> {
        let connected = connected_platforms(self.store.social_accounts());
        Ok(self.composer.toggle_platform(platform, &connected)?)
    }

    /// Submits the draft and stores the audience nudge when one is shown.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an incomplete draft.
    pub fn submit_draft(&mut self) -> Result<ComposerStage> {
        if let Some(nudge) =
            self.composer
                .submit(self.store.settings(), &self.engine, Utc::now())?
        {
            self.store.add_nudge(nudge);
        }
        Ok(self.composer.stage().clone())
    }

    /// Advances the countdown by a second and publishes when it runs out.
    ///
    /// # Errors
    ///
    /// Returns an error if publishing fails.
    pub fn tick_draft(&mut self) -> Result<Option<Vec<SocialPost>>> {
        let was_counting = matches!(self.composer.stage(), ComposerStage::Countdown { .. });
        if was_counting && self.composer.tick() == &ComposerStage::ReadyToPublish {
            return self.publish_draft().map(Some);
        }
        Ok(None)
    }

    /// Skips the countdown and publishes.
    ///
    /// # Errors
    ///
    /// Returns an error unless the draft is counting down or ready.
    pub fn post_draft_now(&mut self) -> Result<Vec<SocialPost>> {
        self.composer.post_now()?;
        self.publish_draft()
    }

    /// Abandons the nudge steps. A pending audience nudge is dismissed.
    pub fn cancel_draft(&mut self) {
        if let Some(nudge_id) = self.composer.cancel() {
            self.store.dismiss_nudge(&nudge_id);
        }
    }

    /// Publishes a ready draft to every selected platform and stores the
    /// posts.
    ///
    /// # Errors
    ///
    /// Returns an error unless the draft is ready to publish.
    pub fn publish_draft(&mut self) -> Result<Vec<SocialPost>> {
        let posts = self
            .composer
            .publish(&self.engine, &self.config.risk, Utc::now())?;
        info!("Published draft to {} platforms", posts.len());
        self.store.add_social_posts(posts.clone());
        Ok(posts)
    }

    // ==================== History ====================

    #[must_use]
    pub fn history(&self, filter: AuditFilter) -> Vec<&AuditLogEntry> {
        filter_log(self.store.audit_log(), filter)
    }

    #[must_use]
    pub fn audit_stats(&self) -> AuditStats {
        AuditStats::from_log(self.store.audit_log())
    }

    /// # Errors
    ///
    /// Returns [`GuardError::Export`] if serialization fails.
    pub fn export_history_json(&self) -> Result<String> {
        Ok(export_json(self.store.audit_log())?)
    }

    #[must_use]
    pub fn export_history_csv(&self) -> String {
        export_csv(self.store.audit_log())
    }

    pub fn clear_history(&mut self) {
        self.store.clear_audit_log();
    }

    // ==================== Settings ====================

    /// Validates and merges a settings change.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Settings`] for invalid values; nothing is
    /// written in that case.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> Result<()> {
        update.validate()?;
        if update.is_empty() {
            debug!("Ignoring empty settings update");
            return Ok(());
        }
        self.store.update_settings(update);
        Ok(())
    }
}

impl std::fmt::Debug for PrivacyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivacyGuard")
            .field("store", &self.store)
            .field("connectors", &self.connectors.keys().collect::<Vec<_>>())
            .field("composer", &self.composer.stage())
            .finish_non_exhaustive()
    }
}

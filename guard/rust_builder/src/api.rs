//! API bridging layer that exposes guard-core functionality.

use std::sync::Arc;

use chrono::DateTime;
use flutter_rust_bridge::frb;
use guard_core::audit::AuditFilter;
use guard_core::exposure::ExposureAnalysis;
use guard_core::permissions::{
    HostReportedPlatform, PermissionFilter, PermissionStatus, PermissionType, PlatformOs,
};
use guard_core::settings::SettingsUpdate;
use guard_core::social::{PostFilter, PostVisibility, SocialPlatform};
use guard_core::GuardConfig;
use log::{info, warn};
use serde::Serialize;

/// Privacy guard handle (wrapper around `guard_core::PrivacyGuard`).
///
/// Permission answers come from the Flutter side: the host queries the OS and
/// pushes results in with [`report_permission`](Self::report_permission).
#[frb(opaque)]
pub struct PrivacyGuard {
    inner: guard_core::PrivacyGuard,
    platform: Arc<HostReportedPlatform>,
}

impl PrivacyGuard {
    /// Opens the guard with its database under `data_dir`.
    ///
    /// `os` is `ios` or `android`.
    pub fn open(data_dir: String, os: String) -> Result<Self, String> {
        let os = PlatformOs::parse(&os).ok_or_else(|| format!("Unknown platform: {os}"))?;
        let platform = Arc::new(HostReportedPlatform::new(os));
        let config = GuardConfig::new(data_dir);
        let inner = guard_core::PrivacyGuard::open(config, Box::new(Arc::clone(&platform)))
            .map_err(|e| e.to_string())?;
        Ok(Self { inner, platform })
    }

    // ==================== Permissions ====================

    /// Records the status the OS reported for a permission.
    #[frb(sync)]
    pub fn report_permission(&self, permission: String, status: String) -> Result<(), String> {
        let permission = parse_permission(&permission)?;
        let status = PermissionStatus::parse(&status)
            .ok_or_else(|| format!("Unknown permission status: {status}"))?;
        self.platform
            .report(permission, status)
            .map_err(|e| e.to_string())
    }

    /// Permissions the core asked for, oldest first.
    #[frb(sync)]
    pub fn requested_permissions(&self) -> Result<Vec<String>, String> {
        let requested = self.platform.requested().map_err(|e| e.to_string())?;
        Ok(requested.iter().map(|p| p.as_str().to_string()).collect())
    }

    /// OS identifier the host should prompt for.
    #[frb(sync)]
    pub fn permission_identifier(&self, permission: String) -> Result<String, String> {
        let permission = parse_permission(&permission)?;
        Ok(self.inner.permission_identifier(permission).to_string())
    }

    #[frb(sync)]
    pub fn check_permission(&self, permission: String) -> Result<bool, String> {
        Ok(self.inner.check_permission(parse_permission(&permission)?))
    }

    #[frb(sync)]
    pub fn request_permission(&self, permission: String) -> Result<bool, String> {
        Ok(self.inner.request_permission(parse_permission(&permission)?))
    }

    /// Permission accesses as JSON. `filter` is `all` or a permission type.
    #[frb(sync)]
    pub fn permission_accesses(&self, filter: String) -> Result<String, String> {
        let filter = PermissionFilter::parse(&filter)
            .ok_or_else(|| format!("Unknown permission filter: {filter}"))?;
        to_json(&self.inner.permission_accesses(filter))
    }

    #[frb(sync)]
    pub fn mark_app_as_safe(&mut self, app_name: String) -> usize {
        self.inner.mark_app_as_safe(&app_name)
    }

    // ==================== State & Onboarding ====================

    /// Whole app state as JSON.
    #[frb(sync)]
    pub fn state(&self) -> Result<String, String> {
        to_json(self.inner.state())
    }

    #[frb(sync)]
    pub fn settings(&self) -> Result<String, String> {
        to_json(self.inner.settings())
    }

    #[frb(sync)]
    pub fn has_completed_onboarding(&self) -> bool {
        self.inner.has_completed_onboarding()
    }

    /// Finishes onboarding and returns the report as JSON.
    pub fn complete_onboarding(&mut self) -> Result<String, String> {
        let report = self.inner.complete_onboarding();
        to_json(&report)
    }

    // ==================== Dashboard ====================

    /// Recomputes the privacy summary and returns it as JSON.
    #[frb(sync)]
    pub fn refresh_summary(&mut self) -> Result<String, String> {
        to_json(self.inner.refresh_summary())
    }

    #[frb(sync)]
    pub fn privacy_score(&self) -> String {
        self.inner.privacy_score().as_str().to_string()
    }

    #[frb(sync)]
    pub fn recent_posts(&self) -> Result<String, String> {
        to_json(self.inner.recent_posts())
    }

    /// Whether the periodic summary should be shown again.
    ///
    /// `last_shown_ms` is milliseconds since the epoch.
    #[frb(sync)]
    pub fn summary_due(&self, last_shown_ms: Option<i64>) -> bool {
        let last_shown = last_shown_ms.and_then(DateTime::from_timestamp_millis);
        self.inner.summary_due(last_shown)
    }

    // ==================== Social ====================

    /// Posts as JSON. `filter` is `all`, `public` or `high_risk`.
    #[frb(sync)]
    pub fn posts(&self, filter: String) -> Result<String, String> {
        let filter =
            PostFilter::parse(&filter).ok_or_else(|| format!("Unknown post filter: {filter}"))?;
        to_json(&self.inner.posts(filter))
    }

    #[frb(sync)]
    pub fn unconnected_platforms(&self) -> Vec<String> {
        self.inner
            .unconnected_platforms()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    /// Connects an account and imports its posts. Returns the account as JSON.
    pub async fn connect_account(&mut self, platform: String) -> Result<String, String> {
        let account = self
            .inner
            .connect_account(&platform)
            .await
            .map_err(|e| e.to_string())?;
        info!("Connected {} from host", account.platform);
        to_json(&account)
    }

    pub async fn disconnect_account(&mut self, platform: String) -> Result<bool, String> {
        let platform = parse_platform(&platform)?;
        Ok(self.inner.disconnect_account(platform).await)
    }

    pub async fn change_post_visibility(
        &mut self,
        post_id: String,
        visibility: String,
    ) -> Result<(), String> {
        let visibility = parse_visibility(&visibility)?;
        self.inner
            .change_post_visibility(&post_id, visibility)
            .await
            .map_err(|e| e.to_string())
    }

    /// Deletes a post and returns it as JSON.
    pub async fn delete_post(&mut self, post_id: String) -> Result<String, String> {
        let post = self
            .inner
            .delete_post(&post_id)
            .await
            .map_err(|e| e.to_string())?;
        to_json(&post)
    }

    // ==================== Exposure ====================

    /// Scans every stored post and returns the report as JSON.
    pub fn run_exposure_scan(&mut self) -> Result<String, String> {
        to_json(self.inner.run_exposure_scan())
    }

    #[frb(sync)]
    pub fn last_scan(&self) -> Result<Option<String>, String> {
        self.inner.last_scan().map(to_json).transpose()
    }

    /// Applies the automatic fix for a finding given as JSON.
    #[frb(sync)]
    pub fn fix_exposure(&mut self, exposure: String) -> Result<bool, String> {
        let exposure: ExposureAnalysis =
            serde_json::from_str(&exposure).map_err(|e| e.to_string())?;
        self.inner.fix_exposure(&exposure).map_err(|e| e.to_string())
    }

    #[frb(sync)]
    pub fn queue_exposure_nudges(&mut self) -> usize {
        self.inner.queue_exposure_nudges()
    }

    /// Queues a nudge for the latest sensitive access, if one is due.
    /// Returns the new nudge id.
    #[frb(sync)]
    pub fn queue_permission_nudge(&mut self) -> Option<String> {
        self.inner.queue_permission_nudge()
    }

    // ==================== Nudges ====================

    #[frb(sync)]
    pub fn nudges(&self) -> Result<String, String> {
        to_json(self.inner.nudges())
    }

    /// Pending nudges in display order as JSON, each with its score.
    #[frb(sync)]
    pub fn prioritized_nudges(&self) -> Result<String, String> {
        let ranked: Vec<RankedNudge<'_>> = self
            .inner
            .prioritized_nudges()
            .into_iter()
            .map(|(nudge, score)| RankedNudge { nudge, score })
            .collect();
        to_json(&ranked)
    }

    #[frb(sync)]
    pub fn dismiss_nudge(&mut self, nudge_id: String) -> Result<(), String> {
        self.inner.dismiss_nudge(&nudge_id).map_err(|e| e.to_string())
    }

    #[frb(sync)]
    pub fn snooze_nudge(&mut self, nudge_id: String) -> Result<(), String> {
        self.inner.snooze_nudge(&nudge_id).map_err(|e| e.to_string())
    }

    /// Runs a nudge action and returns what the UI should do next as JSON.
    #[frb(sync)]
    pub fn act_on_nudge(&mut self, nudge_id: String, action_id: String) -> Result<String, String> {
        let outcome = self
            .inner
            .act_on_nudge(&nudge_id, &action_id)
            .map_err(|e| e.to_string())?;
        to_json(&outcome)
    }

    // ==================== Composer ====================

    #[frb(sync)]
    pub fn composer_stage(&self) -> Result<String, String> {
        to_json(self.inner.composer().stage())
    }

    #[frb(sync)]
    pub fn edit_draft(&mut self, content: String, visibility: String) -> Result<(), String> {
        let visibility = parse_visibility(&visibility)?;
        self.inner.edit_draft(&content, visibility);
        Ok(())
    }

    /// Adds or removes a target platform. Returns whether it is now selected.
    #[frb(sync)]
    pub fn toggle_draft_platform(&mut self, platform: String) -> Result<bool, String> {
        let platform = parse_platform(&platform)?;
        self.inner
            .toggle_draft_platform(platform)
            .map_err(|e| e.to_string())
    }

    /// Submits the draft and returns the resulting stage as JSON.
    #[frb(sync)]
    pub fn submit_draft(&mut self) -> Result<String, String> {
        let stage = self.inner.submit_draft().map_err(|e| e.to_string())?;
        to_json(&stage)
    }

    /// Advances the countdown by a second. Returns the published posts as
    /// JSON once the countdown runs out.
    #[frb(sync)]
    pub fn tick_draft(&mut self) -> Result<Option<String>, String> {
        let published = self.inner.tick_draft().map_err(|e| e.to_string())?;
        published.as_ref().map(to_json).transpose()
    }

    #[frb(sync)]
    pub fn post_draft_now(&mut self) -> Result<String, String> {
        let published = self.inner.post_draft_now().map_err(|e| e.to_string())?;
        to_json(&published)
    }

    #[frb(sync)]
    pub fn cancel_draft(&mut self) {
        self.inner.cancel_draft();
    }

    #[frb(sync)]
    pub fn publish_draft(&mut self) -> Result<String, String> {
        let published = self.inner.publish_draft().map_err(|e| e.to_string())?;
        to_json(&published)
    }

    // ==================== History & Settings ====================

    /// Audit entries as JSON. `filter` is `all` or an event type.
    #[frb(sync)]
    pub fn history(&self, filter: String) -> Result<String, String> {
        let filter =
            AuditFilter::parse(&filter).ok_or_else(|| format!("Unknown history filter: {filter}"))?;
        to_json(&self.inner.history(filter))
    }

    #[frb(sync)]
    pub fn audit_stats(&self) -> Result<String, String> {
        to_json(&self.inner.audit_stats())
    }

    #[frb(sync)]
    pub fn export_history_json(&self) -> Result<String, String> {
        self.inner.export_history_json().map_err(|e| e.to_string())
    }

    #[frb(sync)]
    pub fn export_history_csv(&self) -> String {
        self.inner.export_history_csv()
    }

    #[frb(sync)]
    pub fn clear_history(&mut self) {
        self.inner.clear_history();
    }

    /// Applies a partial settings update given as JSON.
    #[frb(sync)]
    pub fn update_settings(&mut self, update: String) -> Result<(), String> {
        let update: SettingsUpdate = serde_json::from_str(&update).map_err(|e| {
            warn!("Rejected settings update from host: {e}");
            e.to_string()
        })?;
        self.inner.update_settings(&update).map_err(|e| e.to_string())
    }
}

#[derive(Serialize)]
struct RankedNudge<'a> {
    nudge: &'a guard_core::nudge::Nudge,
    score: i32,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn parse_permission(s: &str) -> Result<PermissionType, String> {
    PermissionType::parse(s).ok_or_else(|| format!("Unknown permission type: {s}"))
}

fn parse_platform(s: &str) -> Result<SocialPlatform, String> {
    SocialPlatform::parse(s).ok_or_else(|| format!("Unknown social platform: {s}"))
}

fn parse_visibility(s: &str) -> Result<PostVisibility, String> {
    PostVisibility::parse(s).ok_or_else(|| format!("Unknown visibility: {s}"))
}

//! Mutations over the persisted application state.
//!
//! [`AppStore`] owns the in-memory [`AppState`] and writes the whole record
//! back to its [`KeyValueStorage`] after every mutation. Mutations that the
//! history screen shows also append an [`AuditLogEntry`].

use chrono::Utc;
use serde_json::json;

use super::error::{Result, StoreError};
use super::state::AppState;
use super::storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
use crate::audit::{push_bounded, AuditEventType, AuditLogEntry};
use crate::config::GuardConfig;
use crate::nudge::{Nudge, NudgeStatus, NudgeUpdate};
use crate::permissions::{AppPermissionAccess, PermissionAccessUpdate};
use crate::settings::{AppSettings, SettingsUpdate};
use crate::social::{PostUpdate, SocialAccount, SocialPlatform, SocialPost};
use crate::summary::{PrivacySummary, SummaryUpdate};

/// The application's single source of truth.
///
/// # Example
///
/// ```ignore
/// use guard_core::store::AppStore;
/// use guard_core::GuardConfig;
///
/// let mut store = AppStore::open(&GuardConfig::new("/data/guard"))?;
/// store.mark_app_as_safe("Spotify");
/// ```
pub struct AppStore {
    state: AppState,
    storage: Box<dyn KeyValueStorage>,
    storage_key: String,
    audit_capacity: usize,
}

impl AppStore {
    /// Creates a store over `storage` with default state. Call
    /// [`load_state`](Self::load_state) to read what was persisted.
    #[must_use]
    pub fn new(
        storage: Box<dyn KeyValueStorage>,
        storage_key: impl Into<String>,
        audit_capacity: usize,
    ) -> Self {
        Self {
            state: AppState::default(),
            storage,
            storage_key: storage_key.into(),
            audit_capacity,
        }
    }

    /// Opens the `SQLite` store described by `config` and loads its state.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or database cannot be created.
    pub fn open(config: &GuardConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::Storage(format!("Failed to create data directory: {e}")))?;

        let storage = SqliteStorage::new(&config.database_path())?;
        let mut store = Self::new(
            Box::new(storage),
            config.storage_key.clone(),
            config.audit_capacity,
        );
        store.load_state();
        Ok(store)
    }

    /// Creates a store backed by [`MemoryStorage`].
    #[must_use]
    pub fn in_memory(config: &GuardConfig) -> Self {
        Self::new(
            Box::new(MemoryStorage::new()),
            config.storage_key.clone(),
            config.audit_capacity,
        )
    }

    // ==================== Persistence ====================

    /// Replaces the in-memory state with the persisted blob.
    ///
    /// A missing blob leaves the current state untouched. Unreadable or
    /// malformed blobs are logged and ignored.
    pub fn load_state(&mut self) {
        match self.read_state() {
            Ok(Some(state)) => {
                log::debug!("Loaded state from '{}'", self.storage_key);
                self.state = state;
            }
            Ok(None) => log::debug!("No saved state under '{}'", self.storage_key),
            Err(e) => log::error!("Failed to load state: {e}"),
        }
    }

    fn read_state(&self) -> Result<Option<AppState>> {
        let Some(blob) = self.storage.get_item(&self.storage_key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&blob)?))
    }

    /// Writes the full state blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or written.
    pub fn save_state(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.state)?;
        self.storage.set_item(&self.storage_key, &blob)
    }

    fn persist(&self) {
        if let Err(e) = self.save_state() {
            log::error!("Failed to save state: {e}");
        }
    }

    fn audit(
        &mut self,
        event_type: AuditEventType,
        description: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) {
        let entry = AuditLogEntry::new(event_type, description, metadata, Utc::now());
        push_bounded(&mut self.state.audit_log, entry, self.audit_capacity);
    }

    // ==================== Accessors ====================

    /// The whole state record.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Whether onboarding has finished.
    #[must_use]
    pub const fn has_completed_onboarding(&self) -> bool {
        self.state.has_completed_onboarding
    }

    #[must_use]
    pub fn permission_accesses(&self) -> &[AppPermissionAccess] {
        &self.state.permission_accesses
    }

    #[must_use]
    pub fn social_accounts(&self) -> &[SocialAccount] {
        &self.state.social_accounts
    }

    #[must_use]
    pub fn social_posts(&self) -> &[SocialPost] {
        &self.state.social_posts
    }

    #[must_use]
    pub fn nudges(&self) -> &[Nudge] {
        &self.state.nudges
    }

    #[must_use]
    pub fn audit_log(&self) -> &[AuditLogEntry] {
        &self.state.audit_log
    }

    #[must_use]
    pub const fn settings(&self) -> &AppSettings {
        &self.state.settings
    }

    #[must_use]
    pub const fn privacy_summary(&self) -> &PrivacySummary {
        &self.state.privacy_summary
    }

    /// Looks up a post by id.
    #[must_use]
    pub fn find_post(&self, post_id: &str) -> Option<&SocialPost> {
        self.state.social_posts.iter().find(|p| p.id == post_id)
    }

    /// Looks up a nudge by id.
    #[must_use]
    pub fn find_nudge(&self, nudge_id: &str) -> Option<&Nudge> {
        self.state.nudges.iter().find(|n| n.id == nudge_id)
    }

    /// Nudges still awaiting a response, newest first.
    #[must_use]
    pub fn pending_nudges(&self) -> Vec<&Nudge> {
        self.state.nudges.iter().filter(|n| n.is_pending()).collect()
    }

    /// Returns true if `platform` has a connected account.
    #[must_use]
    pub fn is_platform_connected(&self, platform: SocialPlatform) -> bool {
        self.state
            .social_accounts
            .iter()
            .any(|a| a.platform == platform && a.connected)
    }

    // ==================== Onboarding ====================

    pub fn set_has_completed_onboarding(&mut self, completed: bool) {
        self.state.has_completed_onboarding = completed;
        self.persist();
    }

    // ==================== Permissions ====================

    /// Appends one permission record.
    pub fn add_permission_access(&mut self, access: AppPermissionAccess) {
        self.state.permission_accesses.push(access);
        self.persist();
    }

    /// Appends many permission records with a single write.
    pub fn add_permission_accesses(&mut self, accesses: impl IntoIterator<Item = AppPermissionAccess>) {
        self.state.permission_accesses.extend(accesses);
        self.persist();
    }

    /// Merges `update` into every record of `app_name`.
    ///
    /// Returns the number of records changed. Nothing is written when the app
    /// has no records.
    pub fn update_permission_access(
        &mut self,
        app_name: &str,
        update: &PermissionAccessUpdate,
    ) -> usize {
        let changed = self.apply_permission_update(app_name, update);
        if changed > 0 {
            self.persist();
        }
        changed
    }

    /// Marks every record of `app_name` safe and audits the change.
    ///
    /// Returns the number of records changed. Nothing is audited or written
    /// when the app has no records.
    pub fn mark_app_as_safe(&mut self, app_name: &str) -> usize {
        let changed = self.apply_permission_update(app_name, &PermissionAccessUpdate::mark_safe());
        if changed > 0 {
            self.audit(
                AuditEventType::PermissionChanged,
                format!("Marked {app_name} as safe"),
                Some(json!({ "appName": app_name })),
            );
            self.persist();
        }
        changed
    }

    fn apply_permission_update(&mut self, app_name: &str, update: &PermissionAccessUpdate) -> usize {
        let mut changed = 0;
        for access in self
            .state
            .permission_accesses
            .iter_mut()
            .filter(|a| a.app_name == app_name)
        {
            access.apply(update);
            changed += 1;
        }
        changed
    }

    // ==================== Social Accounts ====================

    /// Stores `account`, replacing any account for the same platform.
    pub fn connect_social_account(&mut self, account: SocialAccount) {
        self.state
            .social_accounts
            .retain(|a| a.platform != account.platform);
        self.state.social_accounts.push(account);
        self.persist();
    }

    /// Removes the account for `platform`. Returns true if one was stored.
    pub fn disconnect_social_account(&mut self, platform: SocialPlatform) -> bool {
        let before = self.state.social_accounts.len();
        self.state.social_accounts.retain(|a| a.platform != platform);
        let removed = self.state.social_accounts.len() != before;
        self.persist();
        removed
    }

    // ==================== Social Posts ====================

    /// Prepends `post`.
    pub fn add_social_post(&mut self, post: SocialPost) {
        self.state.social_posts.insert(0, post);
        self.persist();
    }

    /// Prepends a newest-first batch of posts with a single write, keeping
    /// the batch order.
    pub fn add_social_posts(&mut self, posts: Vec<SocialPost>) {
        self.state.social_posts.splice(0..0, posts);
        self.persist();
    }

    /// Merges `update` into the post with `post_id` and audits the edit.
    ///
    /// Returns false if no such post exists.
    pub fn update_social_post(&mut self, post_id: &str, update: &PostUpdate) -> bool {
        let Some(post) = self.state.social_posts.iter_mut().find(|p| p.id == post_id) else {
            log::warn!("Update for unknown post {post_id}");
            return false;
        };
        post.apply(update);

        self.audit(
            AuditEventType::PostEdited,
            format!("Updated post {post_id}"),
            Some(json!({ "postId": post_id, "updates": update })),
        );
        self.persist();
        true
    }

    /// Removes the post with `post_id` and audits the deletion.
    pub fn delete_social_post(&mut self, post_id: &str) -> Option<SocialPost> {
        let index = self.state.social_posts.iter().position(|p| p.id == post_id)?;
        let post = self.state.social_posts.remove(index);

        self.audit(
            AuditEventType::PostDeleted,
            format!("Deleted post {post_id}"),
            Some(json!({ "postId": post_id })),
        );
        self.persist();
        Some(post)
    }

    // ==================== Nudges ====================

    /// Prepends `nudge` and audits that it was shown.
    pub fn add_nudge(&mut self, nudge: Nudge) {
        self.audit(
            AuditEventType::NudgeShown,
            nudge.title.clone(),
            Some(json!({ "nudgeId": nudge.id, "type": nudge.nudge_type })),
        );
        self.state.nudges.insert(0, nudge);
        self.persist();
    }

    /// Merges `update` into the nudge with `nudge_id`.
    ///
    /// Updates that set the status to acted are audited. Returns false if no
    /// such nudge exists.
    pub fn update_nudge(&mut self, nudge_id: &str, update: &NudgeUpdate) -> bool {
        let Some(nudge) = self.state.nudges.iter_mut().find(|n| n.id == nudge_id) else {
            log::warn!("Update for unknown nudge {nudge_id}");
            return false;
        };
        nudge.apply(update);

        if update.status == Some(NudgeStatus::Acted) {
            self.audit(
                AuditEventType::NudgeActed,
                format!("Acted on nudge {nudge_id}"),
                Some(json!({ "nudgeId": nudge_id })),
            );
        }
        self.persist();
        true
    }

    /// Dismisses the nudge with `nudge_id` and audits the dismissal.
    pub fn dismiss_nudge(&mut self, nudge_id: &str) -> bool {
        let update = NudgeUpdate::responded(NudgeStatus::Dismissed, Utc::now());
        let Some(nudge) = self.state.nudges.iter_mut().find(|n| n.id == nudge_id) else {
            log::warn!("Dismissal of unknown nudge {nudge_id}");
            return false;
        };
        nudge.apply(&update);

        self.audit(
            AuditEventType::NudgeDismissed,
            format!("Dismissed nudge {nudge_id}"),
            Some(json!({ "nudgeId": nudge_id })),
        );
        self.persist();
        true
    }

    /// Snoozes the nudge with `nudge_id`.
    pub fn snooze_nudge(&mut self, nudge_id: &str) -> bool {
        let update = NudgeUpdate {
            status: Some(NudgeStatus::Snoozed),
            responded_at: None,
        };
        self.update_nudge(nudge_id, &update)
    }

    // ==================== Audit Log ====================

    /// Prepends `entry`, keeping at most the configured number of entries.
    pub fn add_audit_entry(&mut self, entry: AuditLogEntry) {
        push_bounded(&mut self.state.audit_log, entry, self.audit_capacity);
        self.persist();
    }

    /// Empties the audit log.
    pub fn clear_audit_log(&mut self) {
        self.state.audit_log.clear();
        self.persist();
    }

    // ==================== Settings & Summary ====================

    /// Merges `update` into the settings and audits the change.
    pub fn update_settings(&mut self, update: &SettingsUpdate) {
        self.state.settings.apply(update);
        self.audit(
            AuditEventType::SettingsChanged,
            "Settings updated",
            Some(json!(update)),
        );
        self.persist();
    }

    /// Merges `update` into the dashboard summary.
    pub fn update_privacy_summary(&mut self, update: &SummaryUpdate) {
        self.state.privacy_summary.apply(update);
        self.persist();
    }
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("storage_key", &self.storage_key)
            .field("audit_capacity", &self.audit_capacity)
            .field("posts", &self.state.social_posts.len())
            .field("nudges", &self.state.nudges.len())
            .finish_non_exhaustive()
    }
}

//! The persisted state record.

use serde::{Deserialize, Serialize};

use crate::audit::AuditLogEntry;
use crate::nudge::Nudge;
use crate::permissions::AppPermissionAccess;
use crate::settings::AppSettings;
use crate::social::{SocialAccount, SocialPost};
use crate::summary::PrivacySummary;

/// Everything the app remembers between launches.
///
/// Missing fields in a stored blob fall back to their defaults, so older
/// blobs keep loading as fields are added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    /// Whether onboarding has finished.
    pub has_completed_onboarding: bool,
    /// Permission access records.
    pub permission_accesses: Vec<AppPermissionAccess>,
    /// Linked social accounts.
    pub social_accounts: Vec<SocialAccount>,
    /// Aggregated posts, newest first.
    pub social_posts: Vec<SocialPost>,
    /// Nudges, newest first.
    pub nudges: Vec<Nudge>,
    /// Audit trail, newest first.
    pub audit_log: Vec<AuditLogEntry>,
    /// User preferences.
    pub settings: AppSettings,
    /// Dashboard figures.
    pub privacy_summary: PrivacySummary,
}

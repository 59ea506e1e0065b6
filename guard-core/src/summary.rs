//! Dashboard summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RiskThresholds;
use crate::exposure::PrivacyRiskLevel;
use crate::permissions::{sensitive_accesses, top_accessing_apps, AppPermissionAccess};
use crate::social::{PostVisibility, SocialPost};

/// Number of posts previewed on the dashboard.
pub const RECENT_POST_PREVIEW: usize = 5;

/// Headline figures shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacySummary {
    /// Risk from sensitive permission usage.
    pub permission_risk: PrivacyRiskLevel,
    /// Stored posts rated high risk.
    pub recent_exposures: usize,
    /// Apps with the most unsafe accesses.
    pub top_accessing_apps: Vec<String>,
    /// Stored public posts.
    pub public_posts: usize,
    /// When the summary was last computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scan_date: Option<DateTime<Utc>>,
}

impl PrivacySummary {
    /// Merges `update` into this summary.
    pub fn apply(&mut self, update: &SummaryUpdate) {
        if let Some(v) = update.permission_risk {
            self.permission_risk = v;
        }
        if let Some(v) = update.recent_exposures {
            self.recent_exposures = v;
        }
        if let Some(v) = &update.top_accessing_apps {
            self.top_accessing_apps.clone_from(v);
        }
        if let Some(v) = update.public_posts {
            self.public_posts = v;
        }
        if let Some(v) = update.last_scan_date {
            self.last_scan_date = Some(v);
        }
    }
}

/// Partial update for a [`PrivacySummary`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_risk: Option<PrivacyRiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_exposures: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_accessing_apps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_posts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scan_date: Option<DateTime<Utc>>,
}

impl From<PrivacySummary> for SummaryUpdate {
    fn from(summary: PrivacySummary) -> Self {
        Self {
            permission_risk: Some(summary.permission_risk),
            recent_exposures: Some(summary.recent_exposures),
            top_accessing_apps: Some(summary.top_accessing_apps),
            public_posts: Some(summary.public_posts),
            last_scan_date: summary.last_scan_date,
        }
    }
}

/// Risk from the number of sensitive permission records: above
/// `sensitive_high` is high, above `sensitive_medium` is medium.
#[must_use]
pub const fn permission_risk(sensitive_records: usize, thresholds: &RiskThresholds) -> PrivacyRiskLevel {
    if sensitive_records > thresholds.sensitive_high {
        PrivacyRiskLevel::High
    } else if sensitive_records > thresholds.sensitive_medium {
        PrivacyRiskLevel::Medium
    } else {
        PrivacyRiskLevel::Low
    }
}

/// Recomputes the dashboard figures.
#[must_use]
pub fn compute_summary(
    accesses: &[AppPermissionAccess],
    posts: &[SocialPost],
    top_app_count: usize,
    thresholds: &RiskThresholds,
    now: DateTime<Utc>,
) -> PrivacySummary {
    PrivacySummary {
        permission_risk: permission_risk(sensitive_accesses(accesses).len(), thresholds),
        recent_exposures: posts
            .iter()
            .filter(|p| p.risk_level == PrivacyRiskLevel::High)
            .count(),
        top_accessing_apps: top_accessing_apps(accesses, top_app_count),
        public_posts: posts
            .iter()
            .filter(|p| p.visibility == PostVisibility::Public)
            .count(),
        last_scan_date: Some(now),
    }
}

/// The first `limit` stored posts (newest first).
#[must_use]
pub fn recent_posts(posts: &[SocialPost], limit: usize) -> &[SocialPost] {
    &posts[..posts.len().min(limit)]
}

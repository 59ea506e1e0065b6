//! Shared fixtures for integration tests.
//!
//! Configs built here have zero connector latency so async flows finish
//! immediately.

#![allow(dead_code)]

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use guard_core::permissions::{AppPermissionAccess, PermissionType};
use guard_core::social::{PostVisibility, SocialPlatform, SocialPost};
use guard_core::{GuardConfig, PrivacyRiskLevel};

/// Config rooted at `dir` with no simulated latency.
pub fn instant_config(dir: &Path) -> GuardConfig {
    GuardConfig::new(dir).with_delays(0, 0)
}

/// A stored post with the given audience and location.
pub fn post(id: &str, content: &str, visibility: PostVisibility, location: Option<&str>) -> SocialPost {
    SocialPost {
        id: id.to_string(),
        platform: SocialPlatform::Facebook,
        content: content.to_string(),
        media_urls: None,
        posted_at: Utc::now(),
        visibility,
        audience_size: None,
        tags: None,
        location: location.map(str::to_string),
        mentions: None,
        risk_level: PrivacyRiskLevel::Low,
        risk_reasons: None,
    }
}

/// A permission record with one history entry per element of `days_ago`.
pub fn access(
    app: &str,
    permission_type: PermissionType,
    days_ago: &[i64],
    now: DateTime<Utc>,
) -> AppPermissionAccess {
    let history: Vec<_> = days_ago.iter().map(|d| now - Duration::days(*d)).collect();
    AppPermissionAccess {
        app_name: app.to_string(),
        app_icon: None,
        permission_type,
        last_accessed: history.first().copied().unwrap_or(now),
        access_count: u32::try_from(history.len()).unwrap_or(u32::MAX),
        access_history: history,
        marked_safe: false,
    }
}

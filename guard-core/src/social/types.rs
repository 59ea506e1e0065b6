//! Core types for social accounts and posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exposure::PrivacyRiskLevel;

/// Supported social platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    /// Facebook.
    Facebook,
    /// Instagram.
    Instagram,
    /// YouTube.
    Youtube,
}

impl SocialPlatform {
    /// Every supported platform, in display order.
    pub const ALL: [Self; 3] = [Self::Facebook, Self::Instagram, Self::Youtube];

    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Youtube => "youtube",
        }
    }

    /// Parses from string representation, ignoring ASCII case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "facebook" => Some(Self::Facebook),
            "instagram" => Some(Self::Instagram),
            "youtube" => Some(Self::Youtube),
            _ => None,
        }
    }

    /// Name for buttons and headings.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Youtube => "YouTube",
        }
    }
}

impl std::fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who can see a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostVisibility {
    /// Anyone on the internet.
    Public,
    /// Friends or followers.
    #[default]
    Friends,
    /// A hand-picked audience.
    Custom,
    /// Only the author.
    Private,
}

impl PostVisibility {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Friends => "friends",
            Self::Custom => "custom",
            Self::Private => "private",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "friends" => Some(Self::Friends),
            "custom" => Some(Self::Custom),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post on one of the user's social accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
    /// Informally-unique identifier.
    pub id: String,
    /// Platform the post lives on.
    pub platform: SocialPlatform,
    /// Post text.
    pub content: String,
    /// Attached media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_urls: Option<Vec<String>>,
    /// When the post was published.
    pub posted_at: DateTime<Utc>,
    /// Current audience.
    pub visibility: PostVisibility,
    /// Estimated number of viewers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_size: Option<u32>,
    /// Hashtags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Location tag, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Mentioned handles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<String>>,
    /// Computed risk level.
    pub risk_level: PrivacyRiskLevel,
    /// Short codes explaining `risk_level` (`public`, `location`, `pii`, `emotion`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_reasons: Option<Vec<String>>,
}

impl SocialPost {
    /// Returns true if `reason` is among the post's risk reasons.
    #[must_use]
    pub fn has_risk_reason(&self, reason: &str) -> bool {
        self.risk_reasons
            .as_ref()
            .is_some_and(|reasons| reasons.iter().any(|r| r == reason))
    }

    /// Merges `update` into this post.
    pub fn apply(&mut self, update: &PostUpdate) {
        if let Some(content) = &update.content {
            self.content.clone_from(content);
        }
        if let Some(visibility) = update.visibility {
            self.visibility = visibility;
        }
        if let Some(audience_size) = update.audience_size {
            self.audience_size = Some(audience_size);
        }
        if let Some(location) = &update.location {
            self.location.clone_from(location);
        }
        if let Some(tags) = &update.tags {
            self.tags = Some(tags.clone());
        }
        if let Some(mentions) = &update.mentions {
            self.mentions = Some(mentions.clone());
        }
        if let Some(risk_level) = update.risk_level {
            self.risk_level = risk_level;
        }
        if let Some(risk_reasons) = &update.risk_reasons {
            self.risk_reasons = Some(risk_reasons.clone());
        }
    }
}

/// Partial update for a [`SocialPost`]. `None` fields are left untouched.
///
/// `location` is doubly optional: `Some(None)` clears the tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    /// New text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<PostVisibility>,
    /// New audience estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_size: Option<u32>,
    /// New location; `Some(None)` removes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    /// New hashtags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New mentions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<String>>,
    /// New risk level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<PrivacyRiskLevel>,
    /// New risk reasons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_reasons: Option<Vec<String>>,
}

impl PostUpdate {
    /// Update that only changes visibility.
    #[must_use]
    pub fn visibility(visibility: PostVisibility) -> Self {
        Self {
            visibility: Some(visibility),
            ..Self::default()
        }
    }

    /// Update that removes the location tag.
    #[must_use]
    pub fn clear_location() -> Self {
        Self {
            location: Some(None),
            ..Self::default()
        }
    }
}

/// A connected (or previously connected) social account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    /// Platform of the account.
    pub platform: SocialPlatform,
    /// Whether the account is currently connected.
    pub connected: bool,
    /// Handle on the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Platform user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// OAuth access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Granted OAuth scopes.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// When the account was connected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for SocialAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialAccount")
            .field("platform", &self.platform)
            .field("connected", &self.connected)
            .field("username", &self.username)
            .field("user_id", &self.user_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("permissions", &self.permissions)
            .field("connected_at", &self.connected_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post() -> SocialPost {
        SocialPost {
            id: "p1".to_string(),
            platform: SocialPlatform::Facebook,
            content: "Beautiful sunset today".to_string(),
            media_urls: None,
            posted_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            visibility: PostVisibility::Public,
            audience_size: Some(1200),
            tags: Some(vec!["#beautiful".to_string()]),
            location: Some("New York, NY".to_string()),
            mentions: None,
            risk_level: PrivacyRiskLevel::High,
            risk_reasons: Some(vec!["public".to_string(), "location".to_string()]),
        }
    }

    #[test]
    fn platform_parse_is_case_insensitive() {
        assert_eq!(
            SocialPlatform::parse("YouTube"),
            Some(SocialPlatform::Youtube)
        );
        assert_eq!(
            SocialPlatform::parse("facebook"),
            Some(SocialPlatform::Facebook)
        );
        assert_eq!(SocialPlatform::parse("myspace"), None);
    }

    #[test]
    fn visibility_as_str_and_parse() {
        for vis in [
            PostVisibility::Public,
            PostVisibility::Friends,
            PostVisibility::Custom,
            PostVisibility::Private,
        ] {
            assert_eq!(PostVisibility::parse(vis.as_str()), Some(vis));
        }
        assert_eq!(PostVisibility::parse("everyone"), None);
        assert_eq!(PostVisibility::default(), PostVisibility::Friends);
    }

    #[test]
    fn apply_visibility_only_touches_visibility() {
        let mut post = sample_post();
        post.apply(&PostUpdate::visibility(PostVisibility::Private));

        assert_eq!(post.visibility, PostVisibility::Private);
        assert_eq!(post.location.as_deref(), Some("New York, NY"));
        assert_eq!(post.content, "Beautiful sunset today");
    }

    #[test]
    fn apply_clear_location_removes_tag() {
        let mut post = sample_post();
        post.apply(&PostUpdate::clear_location());
        assert!(post.location.is_none());
        assert_eq!(post.visibility, PostVisibility::Public);
    }

    #[test]
    fn has_risk_reason_checks_list() {
        let post = sample_post();
        assert!(post.has_risk_reason("location"));
        assert!(!post.has_risk_reason("pii"));

        let bare = SocialPost {
            risk_reasons: None,
            ..sample_post()
        };
        assert!(!bare.has_risk_reason("public"));
    }

    #[test]
    fn post_serializes_camel_case_and_skips_none() {
        let json = serde_json::to_value(sample_post()).unwrap();
        assert_eq!(json["postedAt"], "2026-01-02T03:04:05Z");
        assert_eq!(json["riskLevel"], "high");
        assert_eq!(json["audienceSize"], 1200);
        assert!(json.get("mentions").is_none());
    }

    #[test]
    fn clear_location_update_serializes_null() {
        let json = serde_json::to_value(PostUpdate::clear_location()).unwrap();
        assert!(json["location"].is_null());
        assert!(json.get("visibility").is_none());
    }

    #[test]
    fn account_debug_redacts_token() {
        let account = SocialAccount {
            platform: SocialPlatform::Instagram,
            connected: true,
            username: Some("demo_user_instagram".to_string()),
            user_id: Some("user_abc".to_string()),
            access_token: Some("mock_token_secret".to_string()),
            permissions: vec!["read_my_posts".to_string()],
            connected_at: None,
        };

        let debug_str = format!("{account:?}");
        assert!(debug_str.contains("<redacted>"));
        assert!(debug_str.contains("demo_user_instagram"));
        assert!(!debug_str.contains("mock_token_secret"));
    }
}

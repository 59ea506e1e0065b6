//! Views over the stored post and account lists.

use serde::{Deserialize, Serialize};

use super::types::{PostVisibility, SocialAccount, SocialPlatform, SocialPost};
use crate::exposure::PrivacyRiskLevel;

/// Filter chip on the aggregated feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostFilter {
    /// Every post.
    #[default]
    All,
    /// Public posts only.
    Public,
    /// High risk posts only.
    HighRisk,
}

impl PostFilter {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Public => "public",
            Self::HighRisk => "high_risk",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "public" => Some(Self::Public),
            "high_risk" => Some(Self::HighRisk),
            _ => None,
        }
    }

    /// Returns true if `post` passes this filter.
    #[must_use]
    pub fn matches(&self, post: &SocialPost) -> bool {
        match self {
            Self::All => true,
            Self::Public => post.visibility == PostVisibility::Public,
            Self::HighRisk => post.risk_level == PrivacyRiskLevel::High,
        }
    }
}

/// Posts passing `filter`, in stored order.
#[must_use]
pub fn filter_posts(posts: &[SocialPost], filter: PostFilter) -> Vec<&SocialPost> {
    posts.iter().filter(|p| filter.matches(p)).collect()
}

/// Platforms with a connected account, in account order.
#[must_use]
pub fn connected_platforms(accounts: &[SocialAccount]) -> Vec<SocialPlatform> {
    accounts
        .iter()
        .filter(|a| a.connected)
        .map(|a| a.platform)
        .collect()
}

/// Supported platforms without a connected account, in display order.
#[must_use]
pub fn unconnected_platforms(accounts: &[SocialAccount]) -> Vec<SocialPlatform> {
    let connected = connected_platforms(accounts);
    SocialPlatform::ALL
        .into_iter()
        .filter(|p| !connected.contains(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(id: &str, visibility: PostVisibility, risk_level: PrivacyRiskLevel) -> SocialPost {
        SocialPost {
            id: id.to_string(),
            platform: SocialPlatform::Facebook,
            content: "hello".to_string(),
            media_urls: None,
            posted_at: Utc::now(),
            visibility,
            audience_size: None,
            tags: None,
            location: None,
            mentions: None,
            risk_level,
            risk_reasons: None,
        }
    }

    fn account(platform: SocialPlatform, connected: bool) -> SocialAccount {
        SocialAccount {
            platform,
            connected,
            username: None,
            user_id: None,
            access_token: None,
            permissions: Vec::new(),
            connected_at: None,
        }
    }

    #[test]
    fn filters_select_expected_posts() {
        let posts = vec![
            post("a", PostVisibility::Public, PrivacyRiskLevel::Medium),
            post("b", PostVisibility::Friends, PrivacyRiskLevel::High),
            post("c", PostVisibility::Private, PrivacyRiskLevel::Low),
        ];

        let ids = |filter| -> Vec<String> {
            filter_posts(&posts, filter)
                .iter()
                .map(|p| p.id.clone())
                .collect()
        };

        assert_eq!(ids(PostFilter::All), vec!["a", "b", "c"]);
        assert_eq!(ids(PostFilter::Public), vec!["a"]);
        assert_eq!(ids(PostFilter::HighRisk), vec!["b"]);
    }

    #[test]
    fn filter_parse_round_trips() {
        for filter in [PostFilter::All, PostFilter::Public, PostFilter::HighRisk] {
            assert_eq!(PostFilter::parse(filter.as_str()), Some(filter));
        }
        assert_eq!(PostFilter::parse("high risk"), None);
    }

    #[test]
    fn platform_partition() {
        let accounts = vec![
            account(SocialPlatform::Youtube, true),
            account(SocialPlatform::Facebook, false),
        ];

        assert_eq!(connected_platforms(&accounts), vec![SocialPlatform::Youtube]);
        assert_eq!(
            unconnected_platforms(&accounts),
            vec![SocialPlatform::Facebook, SocialPlatform::Instagram]
        );
    }

    #[test]
    fn no_accounts_means_all_unconnected() {
        assert_eq!(unconnected_platforms(&[]), SocialPlatform::ALL.to_vec());
    }
}

//! Exposure scanning over a set of posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::detect::{detect_high_emotion, detect_pii};
use super::risk::{risk_from_reason_count, PrivacyRiskLevel};
use crate::config::RiskThresholds;
use crate::social::{PostUpdate, PostVisibility, SocialPost};

/// Kind of privacy exposure found in a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureRiskType {
    /// Visible to everyone.
    PublicPost,
    /// Carries a location tag.
    LocationTagged,
    /// Text looks like it contains an email or phone number.
    PiiDetected,
    /// Text contains strong emotional language.
    HighEmotion,
    /// User is tagged in a photo. Never produced by the text scanner.
    TaggedPhoto,
}

impl ExposureRiskType {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PublicPost => "public_post",
            Self::LocationTagged => "location_tagged",
            Self::PiiDetected => "pii_detected",
            Self::HighEmotion => "high_emotion",
            Self::TaggedPhoto => "tagged_photo",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public_post" => Some(Self::PublicPost),
            "location_tagged" => Some(Self::LocationTagged),
            "pii_detected" => Some(Self::PiiDetected),
            "high_emotion" => Some(Self::HighEmotion),
            "tagged_photo" => Some(Self::TaggedPhoto),
            _ => None,
        }
    }

    /// Upper-cased heading, e.g. `PUBLIC POST`.
    #[must_use]
    pub fn heading(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }
}

/// One finding produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureAnalysis {
    /// Post the finding belongs to.
    pub post_id: String,
    /// What was found.
    pub risk_type: ExposureRiskType,
    /// How serious it is.
    pub severity: PrivacyRiskLevel,
    /// What was found, for the user.
    pub description: String,
    /// What the user could do about it.
    pub suggestion: String,
    /// Whether [`auto_fix`] can resolve it.
    pub can_auto_fix: bool,
}

/// Result of scanning a set of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Findings in post order.
    pub exposures: Vec<ExposureAnalysis>,
    /// Number of posts looked at.
    pub posts_scanned: usize,
    /// When the scan ran.
    pub scanned_at: DateTime<Utc>,
}

impl ScanReport {
    /// Number of findings with high severity.
    #[must_use]
    pub fn high_severity_count(&self) -> usize {
        self.exposures
            .iter()
            .filter(|e| e.severity == PrivacyRiskLevel::High)
            .count()
    }

    /// True when nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.exposures.is_empty()
    }

    /// Findings for a single post.
    pub fn for_post<'a>(&'a self, post_id: &'a str) -> impl Iterator<Item = &'a ExposureAnalysis> {
        self.exposures.iter().filter(move |e| e.post_id == post_id)
    }
}

/// Checks one post. Findings come out in a fixed order: public, location,
/// personal information, emotion.
#[must_use]
pub fn analyze_post(post: &SocialPost) -> Vec<ExposureAnalysis> {
    let mut found = Vec::new();

    if post.visibility == PostVisibility::Public {
        found.push(ExposureAnalysis {
            post_id: post.id.clone(),
            risk_type: ExposureRiskType::PublicPost,
            severity: PrivacyRiskLevel::Medium,
            description: "This post is publicly visible to everyone".to_string(),
            suggestion: "Consider changing visibility to friends-only".to_string(),
            can_auto_fix: true,
        });
    }

    if let Some(location) = &post.location {
        found.push(ExposureAnalysis {
            post_id: post.id.clone(),
            risk_type: ExposureRiskType::LocationTagged,
            severity: PrivacyRiskLevel::High,
            description: format!("Location shared: {location}"),
            suggestion: "Remove location tag to protect your privacy".to_string(),
            can_auto_fix: true,
        });
    }

    if detect_pii(&post.content) {
        found.push(ExposureAnalysis {
            post_id: post.id.clone(),
            risk_type: ExposureRiskType::PiiDetected,
            severity: PrivacyRiskLevel::High,
            description: "Post may contain personal information (email/phone)".to_string(),
            suggestion: "Remove or obscure personal information".to_string(),
            can_auto_fix: false,
        });
    }

    if detect_high_emotion(&post.content) {
        found.push(ExposureAnalysis {
            post_id: post.id.clone(),
            risk_type: ExposureRiskType::HighEmotion,
            severity: PrivacyRiskLevel::Medium,
            description: "Post contains strong emotional language".to_string(),
            suggestion: "Review post to avoid potential regret".to_string(),
            can_auto_fix: false,
        });
    }

    found
}

/// Scans every post.
#[must_use]
pub fn scan_posts(posts: &[SocialPost], now: DateTime<Utc>) -> ScanReport {
    ScanReport {
        exposures: posts.iter().flat_map(analyze_post).collect(),
        posts_scanned: posts.len(),
        scanned_at: now,
    }
}

/// Returns the post update that resolves `exposure`, or `None` when the
/// finding needs the user's judgement.
#[must_use]
pub fn auto_fix(exposure: &ExposureAnalysis) -> Option<PostUpdate> {
    match exposure.risk_type {
        ExposureRiskType::PublicPost => Some(PostUpdate::visibility(PostVisibility::Friends)),
        ExposureRiskType::LocationTagged => Some(PostUpdate::clear_location()),
        ExposureRiskType::PiiDetected
        | ExposureRiskType::HighEmotion
        | ExposureRiskType::TaggedPhoto => None,
    }
}

/// Risk assessment for a draft or stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAssessment {
    /// Level derived from the number of reasons.
    pub risk_level: PrivacyRiskLevel,
    /// Reason codes: `public`, `location`, `pii`, `emotion`.
    pub risk_reasons: Vec<String>,
}

/// Assesses a post's content and audience.
#[must_use]
pub fn assess_post(
    content: &str,
    visibility: PostVisibility,
    location: Option<&str>,
    thresholds: &RiskThresholds,
) -> PostAssessment {
    let mut reasons = Vec::new();
    if visibility == PostVisibility::Public {
        reasons.push("public".to_string());
    }
    if location.is_some() {
        reasons.push("location".to_string());
    }
    if detect_pii(content) {
        reasons.push("pii".to_string());
    }
    if detect_high_emotion(content) {
        reasons.push("emotion".to_string());
    }

    PostAssessment {
        risk_level: risk_from_reason_count(reasons.len(), thresholds),
        risk_reasons: reasons,
    }
}

//! Risk levels and score thresholds.

use serde::{Deserialize, Serialize};

use crate::config::RiskThresholds;

/// Coarse privacy risk classification, ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyRiskLevel {
    /// Nothing notable.
    #[default]
    Low,
    /// Worth a look.
    Medium,
    /// Act on it.
    High,
}

impl PrivacyRiskLevel {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Human-readable badge text.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }
}

impl std::fmt::Display for PrivacyRiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combines public post count and sensitive permission accesses into a risk level.
///
/// Score is `public_posts * public_post_weight + sensitive_accesses`.
///
/// # Examples
///
/// ```
/// use guard_core::config::RiskThresholds;
/// use guard_core::exposure::calculate_privacy_risk;
/// use guard_core::PrivacyRiskLevel;
///
/// let thresholds = RiskThresholds::default();
/// assert_eq!(calculate_privacy_risk(0, 4, &thresholds), PrivacyRiskLevel::Low);
/// assert_eq!(calculate_privacy_risk(2, 1, &thresholds), PrivacyRiskLevel::Medium);
/// assert_eq!(calculate_privacy_risk(5, 0, &thresholds), PrivacyRiskLevel::High);
/// ```
#[must_use]
pub fn calculate_privacy_risk(
    public_posts: usize,
    sensitive_accesses: usize,
    thresholds: &RiskThresholds,
) -> PrivacyRiskLevel {
    let score = public_posts
        .saturating_mul(thresholds.public_post_weight)
        .saturating_add(sensitive_accesses);

    if score >= thresholds.score_high {
        PrivacyRiskLevel::High
    } else if score >= thresholds.score_medium {
        PrivacyRiskLevel::Medium
    } else {
        PrivacyRiskLevel::Low
    }
}

/// Maps the number of risk reasons on a post to a level.
#[must_use]
pub const fn risk_from_reason_count(reasons: usize, thresholds: &RiskThresholds) -> PrivacyRiskLevel {
    if reasons >= thresholds.reasons_high {
        PrivacyRiskLevel::High
    } else if reasons >= thresholds.reasons_medium {
        PrivacyRiskLevel::Medium
    } else {
        PrivacyRiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_ordering() {
        assert!(PrivacyRiskLevel::Low < PrivacyRiskLevel::Medium);
        assert!(PrivacyRiskLevel::Medium < PrivacyRiskLevel::High);
    }

    #[test]
    fn risk_level_as_str_and_parse() {
        for level in [
            PrivacyRiskLevel::Low,
            PrivacyRiskLevel::Medium,
            PrivacyRiskLevel::High,
        ] {
            assert_eq!(PrivacyRiskLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(PrivacyRiskLevel::parse("extreme"), None);
    }

    #[test]
    fn risk_level_labels() {
        assert_eq!(PrivacyRiskLevel::High.label(), "High Risk");
        assert_eq!(PrivacyRiskLevel::Low.to_string(), "low");
    }

    #[test]
    fn score_boundaries() {
        let t = RiskThresholds::default();
        assert_eq!(calculate_privacy_risk(0, 9, &t), PrivacyRiskLevel::Medium);
        assert_eq!(calculate_privacy_risk(0, 10, &t), PrivacyRiskLevel::High);
        assert_eq!(calculate_privacy_risk(2, 0, &t), PrivacyRiskLevel::Low);
        assert_eq!(calculate_privacy_risk(2, 1, &t), PrivacyRiskLevel::Medium);
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let t = RiskThresholds {
            score_high: 3,
            score_medium: 1,
            ..RiskThresholds::default()
        };
        assert_eq!(calculate_privacy_risk(0, 1, &t), PrivacyRiskLevel::Medium);
        assert_eq!(calculate_privacy_risk(1, 1, &t), PrivacyRiskLevel::High);
    }

    #[test]
    fn reason_count_mapping() {
        let t = RiskThresholds::default();
        assert_eq!(risk_from_reason_count(0, &t), PrivacyRiskLevel::Low);
        assert_eq!(risk_from_reason_count(1, &t), PrivacyRiskLevel::Medium);
        assert_eq!(risk_from_reason_count(2, &t), PrivacyRiskLevel::High);
        assert_eq!(risk_from_reason_count(3, &t), PrivacyRiskLevel::High);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&PrivacyRiskLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}

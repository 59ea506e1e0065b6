//! Exposure detection for social posts.
//!
//! An *exposure* is a condition in a post that makes it privacy-risky:
//! public visibility, a location tag, personal information such as an
//! email address or phone number, or emotionally charged language.
//!
//! # Pipeline
//!
//! ```text
//! SocialPost ──► detect (PII / emotion patterns)
//!            ──► analyzer (one ExposureAnalysis per finding)
//!            ──► auto_fix (PostUpdate for fixable findings)
//! ```
//!
//! Risk levels are derived by counting findings against the configured
//! [`RiskThresholds`](crate::config::RiskThresholds).

mod analyzer;
mod detect;
mod risk;

pub use analyzer::{
    analyze_post, assess_post, auto_fix, scan_posts, ExposureAnalysis, ExposureRiskType,
    PostAssessment, ScanReport,
};
pub use detect::{detect_high_emotion, detect_pii, EMOTIONAL_WORDS};
pub use risk::{calculate_privacy_risk, risk_from_reason_count, PrivacyRiskLevel};

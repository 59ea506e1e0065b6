//! Runtime configuration.
//!
//! Every tunable constant of the risk scoring and nudge rules lives here
//! rather than in the rule code, so hosts can adjust them without a rebuild.
//! A config can be built in code with the `with_*` builders or loaded from a
//! JSON document; missing fields fall back to the defaults.
//!
//! ```
//! use guard_core::config::GuardConfig;
//!
//! let config = GuardConfig::from_json_str(r#"{ "auditCapacity": 50 }"#).unwrap();
//! assert_eq!(config.audit_capacity, 50);
//! assert_eq!(config.storage_key, "app_state");
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key the application state blob is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "app_state";

/// Default SQLite file name inside the data directory.
pub const DEFAULT_DATABASE_FILE: &str = "privacy_guard.db";

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config document is not valid JSON for [`GuardConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Thresholds for mapping counts onto [`PrivacyRiskLevel`](crate::PrivacyRiskLevel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskThresholds {
    /// Weight of each public post in the overall privacy score.
    pub public_post_weight: usize,
    /// Overall score at or above which risk is high.
    pub score_high: usize,
    /// Overall score at or above which risk is medium.
    pub score_medium: usize,
    /// Sensitive permission records above which permission risk is high.
    pub sensitive_high: usize,
    /// Sensitive permission records above which permission risk is medium.
    pub sensitive_medium: usize,
    /// Risk reasons on a post at or above which the post is high risk.
    pub reasons_high: usize,
    /// Risk reasons on a post at or above which the post is medium risk.
    pub reasons_medium: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            public_post_weight: 2,
            score_high: 10,
            score_medium: 5,
            sensitive_high: 20,
            sensitive_medium: 10,
            reasons_high: 2,
            reasons_medium: 1,
        }
    }
}

/// Tunables for the nudge engine and composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NudgeTuning {
    /// Look-back window for the permission access nudge, in days.
    pub recent_window_days: i64,
    /// How many apps the permission nudge names.
    pub top_app_count: usize,
    /// Upper bound on exposure nudges produced by one analysis.
    pub max_exposure_nudges: usize,
    /// Starting priority for every nudge.
    pub base_priority: i32,
    /// Added for exposure nudges.
    pub exposure_bonus: i32,
    /// Subtracted when the user dismisses far more than they act.
    pub dismissal_penalty: i32,
    /// Dismissals must exceed `acted * dismissal_ratio` for the penalty.
    pub dismissal_ratio: u32,
    /// Added to permission nudges above `heavy_access_threshold`.
    pub heavy_access_bonus: i32,
    /// Access count above which a permission nudge is heavy.
    pub heavy_access_threshold: u32,
    /// Audience estimate shown for public posts.
    pub public_audience: u32,
    /// Audience estimate shown for every other visibility.
    pub limited_audience: u32,
}

impl Default for NudgeTuning {
    fn default() -> Self {
        Self {
            recent_window_days: 4,
            top_app_count: 3,
            max_exposure_nudges: 5,
            base_priority: 5,
            exposure_bonus: 3,
            dismissal_penalty: 2,
            dismissal_ratio: 2,
            heavy_access_bonus: 2,
            heavy_access_threshold: 50,
            public_audience: 2500,
            limited_audience: 150,
        }
    }
}

/// Configuration for a [`PrivacyGuard`](crate::PrivacyGuard) instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardConfig {
    /// Directory holding the SQLite database.
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`.
    pub database_file: String,
    /// Key the state blob is stored under.
    pub storage_key: String,
    /// Maximum number of audit entries kept (newest first).
    pub audit_capacity: usize,
    /// Simulated OAuth round trip, in milliseconds.
    pub oauth_delay_ms: u64,
    /// Simulated platform API latency, in milliseconds.
    pub api_delay_ms: u64,
    /// Number of posts fetched when an account is connected.
    pub fetch_limit: usize,
    /// Risk scoring thresholds.
    pub risk: RiskThresholds,
    /// Nudge engine tunables.
    pub nudge: NudgeTuning,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            audit_capacity: 1000,
            oauth_delay_ms: 1500,
            api_delay_ms: 500,
            fetch_limit: 50,
            risk: RiskThresholds::default(),
            nudge: NudgeTuning::default(),
        }
    }
}

impl GuardConfig {
    /// Creates a default configuration rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Parses a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid("storageKey must not be empty".to_string()));
        }
        if self.audit_capacity == 0 {
            return Err(ConfigError::Invalid("auditCapacity must be positive".to_string()));
        }
        if self.risk.score_medium > self.risk.score_high {
            return Err(ConfigError::Invalid(
                "risk.scoreMedium must not exceed risk.scoreHigh".to_string(),
            ));
        }
        if self.risk.sensitive_medium > self.risk.sensitive_high {
            return Err(ConfigError::Invalid(
                "risk.sensitiveMedium must not exceed risk.sensitiveHigh".to_string(),
            ));
        }
        if self.nudge.recent_window_days < 0 {
            return Err(ConfigError::Invalid(
                "nudge.recentWindowDays must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of the SQLite database.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Simulated OAuth latency.
    #[must_use]
    pub const fn oauth_delay(&self) -> Duration {
        Duration::from_millis(self.oauth_delay_ms)
    }

    /// Simulated API latency.
    #[must_use]
    pub const fn api_delay(&self) -> Duration {
        Duration::from_millis(self.api_delay_ms)
    }

    /// Sets the audit capacity.
    #[must_use]
    pub const fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit_capacity = capacity;
        self
    }

    /// Sets both simulated latencies. Tests pass zero.
    #[must_use]
    pub const fn with_delays(mut self, oauth_delay_ms: u64, api_delay_ms: u64) -> Self {
        self.oauth_delay_ms = oauth_delay_ms;
        self.api_delay_ms = api_delay_ms;
        self
    }

    /// Sets the storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Replaces the risk thresholds.
    #[must_use]
    pub fn with_risk(mut self, risk: RiskThresholds) -> Self {
        self.risk = risk;
        self
    }

    /// Replaces the nudge tunables.
    #[must_use]
    pub fn with_nudge(mut self, nudge: NudgeTuning) -> Self {
        self.nudge = nudge;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = GuardConfig::default();
        assert_eq!(config.storage_key, "app_state");
        assert_eq!(config.audit_capacity, 1000);
        assert_eq!(config.oauth_delay(), Duration::from_millis(1500));
        assert_eq!(config.api_delay(), Duration::from_millis(500));
        assert_eq!(config.fetch_limit, 50);
        assert_eq!(config.risk.score_high, 10);
        assert_eq!(config.nudge.recent_window_days, 4);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            GuardConfig::from_json_str(r#"{ "risk": { "scoreHigh": 12 }, "fetchLimit": 5 }"#)
                .unwrap();
        assert_eq!(config.risk.score_high, 12);
        assert_eq!(config.risk.score_medium, 5);
        assert_eq!(config.fetch_limit, 5);
        assert_eq!(config.audit_capacity, 1000);
    }

    #[test]
    fn zero_audit_capacity_rejected() {
        let err = GuardConfig::from_json_str(r#"{ "auditCapacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let err =
            GuardConfig::from_json_str(r#"{ "risk": { "scoreHigh": 3, "scoreMedium": 4 } }"#)
                .unwrap_err();
        assert!(err.to_string().contains("scoreMedium"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = GuardConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_file_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guard.json");
        std::fs::write(&path, r#"{ "storageKey": "custom" }"#).unwrap();

        let config = GuardConfig::from_file(&path).unwrap();
        assert_eq!(config.storage_key, "custom");
    }

    #[test]
    fn database_path_joins_data_dir() {
        let config = GuardConfig::new("/data/guard");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/data/guard/privacy_guard.db")
        );
    }

    #[test]
    fn builders_chain() {
        let config = GuardConfig::default()
            .with_audit_capacity(10)
            .with_delays(0, 0)
            .with_storage_key("k");
        assert_eq!(config.audit_capacity, 10);
        assert_eq!(config.oauth_delay(), Duration::ZERO);
        assert_eq!(config.storage_key, "k");
    }
}

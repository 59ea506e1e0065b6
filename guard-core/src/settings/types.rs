//! Settings record and partial update.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::error::{Result, SettingsError};
use super::quiet_hours::{is_in_quiet_hours, parse_hh_mm};
use crate::exposure::PrivacyRiskLevel;
use crate::nudge::NudgeDeliveryStyle;

/// Timer lengths offered by the settings screen, in seconds.
pub const TIMER_DURATION_CHOICES: [u32; 3] = [5, 10, 15];

/// How often summary nudges may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeFrequency {
    /// Once a day.
    #[default]
    Daily,
    /// Once a week.
    Weekly,
    /// Once every two weeks.
    Biweekly,
}

impl NudgeFrequency {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "biweekly" => Some(Self::Biweekly),
            _ => None,
        }
    }

    /// Whole days that must pass between two summaries.
    #[must_use]
    pub const fn min_days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Biweekly => 14,
        }
    }
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Summary cadence.
    pub nudge_frequency: NudgeFrequency,
    /// How permission nudges are presented.
    pub nudge_delivery_style: NudgeDeliveryStyle,
    /// Whether quiet hours suppress permission nudges.
    pub quiet_hours_enabled: bool,
    /// Quiet hours start, `HH:mm`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_start: Option<String>,
    /// Quiet hours end, `HH:mm`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_end: Option<String>,
    /// Countdown before a composed post is published, in seconds.
    pub timer_nudge_duration: u32,
    /// Whether the countdown step runs.
    pub timer_nudge_enabled: bool,
    /// Whether the composer shows the audience nudge.
    pub audience_nudge_enabled: bool,
    /// Whether permission access nudges are produced.
    pub permission_nudge_enabled: bool,
    /// Whether exposure nudges are produced.
    pub exposure_analysis_enabled: bool,
    /// Apps left out of permission nudges.
    pub excluded_apps: Vec<String>,
    /// Minimum risk the user wants to hear about.
    pub sensitivity_threshold: PrivacyRiskLevel,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            nudge_frequency: NudgeFrequency::Daily,
            nudge_delivery_style: NudgeDeliveryStyle::HeadsUp,
            quiet_hours_enabled: true,
            quiet_hours_start: Some("22:00".to_string()),
            quiet_hours_end: Some("08:00".to_string()),
            timer_nudge_duration: 10,
            timer_nudge_enabled: true,
            audience_nudge_enabled: true,
            permission_nudge_enabled: true,
            exposure_analysis_enabled: true,
            excluded_apps: Vec::new(),
            sensitivity_threshold: PrivacyRiskLevel::Medium,
        }
    }
}

impl AppSettings {
    /// Returns true if quiet hours are enabled, both bounds are set and
    /// `now` falls inside them.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidTime`] if a bound is malformed.
    pub fn quiet_hours_active(&self, now: NaiveTime) -> Result<bool> {
        if !self.quiet_hours_enabled {
            return Ok(false);
        }
        match (&self.quiet_hours_start, &self.quiet_hours_end) {
            (Some(start), Some(end)) => is_in_quiet_hours(start, end, now),
            _ => Ok(false),
        }
    }

    /// Returns true if `app_name` is on the exclusion list.
    #[must_use]
    pub fn is_app_excluded(&self, app_name: &str) -> bool {
        self.excluded_apps.iter().any(|a| a == app_name)
    }

    /// Merges `update` into these settings.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(v) = update.nudge_frequency {
            self.nudge_frequency = v;
        }
        if let Some(v) = update.nudge_delivery_style {
            self.nudge_delivery_style = v;
        }
        if let Some(v) = update.quiet_hours_enabled {
            self.quiet_hours_enabled = v;
        }
        if let Some(v) = &update.quiet_hours_start {
            self.quiet_hours_start = Some(v.clone());
        }
        if let Some(v) = &update.quiet_hours_end {
            self.quiet_hours_end = Some(v.clone());
        }
        if let Some(v) = update.timer_nudge_duration {
            self.timer_nudge_duration = v;
        }
        if let Some(v) = update.timer_nudge_enabled {
            self.timer_nudge_enabled = v;
        }
        if let Some(v) = update.audience_nudge_enabled {
            self.audience_nudge_enabled = v;
        }
        if let Some(v) = update.permission_nudge_enabled {
            self.permission_nudge_enabled = v;
        }
        if let Some(v) = update.exposure_analysis_enabled {
            self.exposure_analysis_enabled = v;
        }
        if let Some(v) = &update.excluded_apps {
            self.excluded_apps.clone_from(v);
        }
        if let Some(v) = update.sensitivity_threshold {
            self.sensitivity_threshold = v;
        }
    }
}

/// Partial update for [`AppSettings`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nudge_frequency: Option<NudgeFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nudge_delivery_style: Option<NudgeDeliveryStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_nudge_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_nudge_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_nudge_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_nudge_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_analysis_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_apps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity_threshold: Option<PrivacyRiskLevel>,
}

impl SettingsUpdate {
    /// Returns true if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks the values the update would write.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidTime`] for a malformed quiet-hours
    /// bound and [`SettingsError::InvalidValue`] for a zero timer.
    pub fn validate(&self) -> Result<()> {
        for bound in [&self.quiet_hours_start, &self.quiet_hours_end]
            .into_iter()
            .flatten()
        {
            parse_hh_mm(bound)?;
        }
        if self.timer_nudge_duration == Some(0) {
            return Err(SettingsError::InvalidValue(
                "timerNudgeDuration must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn defaults() {
        let s = AppSettings::default();
        assert_eq!(s.nudge_frequency, NudgeFrequency::Daily);
        assert_eq!(s.nudge_delivery_style, NudgeDeliveryStyle::HeadsUp);
        assert!(s.quiet_hours_enabled);
        assert_eq!(s.quiet_hours_start.as_deref(), Some("22:00"));
        assert_eq!(s.quiet_hours_end.as_deref(), Some("08:00"));
        assert_eq!(s.timer_nudge_duration, 10);
        assert!(s.timer_nudge_enabled && s.audience_nudge_enabled);
        assert!(s.permission_nudge_enabled && s.exposure_analysis_enabled);
        assert!(s.excluded_apps.is_empty());
        assert_eq!(s.sensitivity_threshold, PrivacyRiskLevel::Medium);
    }

    #[test]
    fn apply_merges_only_set_fields() {
        let mut s = AppSettings::default();
        s.apply(&SettingsUpdate {
            timer_nudge_duration: Some(15),
            excluded_apps: Some(vec!["Spotify".to_string()]),
            ..SettingsUpdate::default()
        });

        assert_eq!(s.timer_nudge_duration, 15);
        assert!(s.is_app_excluded("Spotify"));
        assert!(!s.is_app_excluded("TikTok"));
        assert_eq!(s.quiet_hours_start.as_deref(), Some("22:00"));
        assert!(s.permission_nudge_enabled);
    }

    #[test]
    fn quiet_hours_follow_flag_and_bounds() {
        let mut s = AppSettings::default();
        assert!(s.quiet_hours_active(at(23, 0)).unwrap());
        assert!(!s.quiet_hours_active(at(12, 0)).unwrap());

        s.quiet_hours_enabled = false;
        assert!(!s.quiet_hours_active(at(23, 0)).unwrap());

        s.quiet_hours_enabled = true;
        s.quiet_hours_end = None;
        assert!(!s.quiet_hours_active(at(23, 0)).unwrap());
    }

    #[test]
    fn validate_rejects_bad_time_and_zero_timer() {
        let bad_time = SettingsUpdate {
            quiet_hours_start: Some("7pm".to_string()),
            ..SettingsUpdate::default()
        };
        assert_eq!(
            bad_time.validate().unwrap_err(),
            SettingsError::InvalidTime("7pm".to_string())
        );

        let zero = SettingsUpdate {
            timer_nudge_duration: Some(0),
            ..SettingsUpdate::default()
        };
        assert!(matches!(
            zero.validate().unwrap_err(),
            SettingsError::InvalidValue(_)
        ));

        assert!(SettingsUpdate::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s: AppSettings = serde_json::from_str(r#"{ "timerNudgeEnabled": false }"#).unwrap();
        assert!(!s.timer_nudge_enabled);
        assert_eq!(s.timer_nudge_duration, 10);
        assert_eq!(s.quiet_hours_end.as_deref(), Some("08:00"));
    }

    #[test]
    fn update_deserializes_camel_case() {
        let u: SettingsUpdate =
            serde_json::from_str(r#"{ "nudgeFrequency": "weekly", "quietHoursEnabled": false }"#)
                .unwrap();
        assert_eq!(u.nudge_frequency, Some(NudgeFrequency::Weekly));
        assert_eq!(u.quiet_hours_enabled, Some(false));
        assert!(!u.is_empty());
        assert!(SettingsUpdate::default().is_empty());
    }

    #[test]
    fn frequency_days() {
        assert_eq!(NudgeFrequency::Daily.min_days(), 1);
        assert_eq!(NudgeFrequency::Weekly.min_days(), 7);
        assert_eq!(NudgeFrequency::Biweekly.min_days(), 14);
        assert_eq!(NudgeFrequency::parse("biweekly"), Some(NudgeFrequency::Biweekly));
    }
}

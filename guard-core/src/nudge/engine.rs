//! Nudge rules.

use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};

use super::types::{
    Nudge, NudgeAction, NudgeActionKind, NudgeData, NudgeDeliveryStyle, NudgeHistory, NudgeStatus,
    NudgeType, ACTION_CANCEL, ACTION_CHANGE_AUDIENCE, ACTION_CHANGE_SETTINGS, ACTION_CONTINUE,
    ACTION_DISMISS, ACTION_MAKE_PRIVATE, ACTION_REVIEW, ACTION_VIEW_DETAILS,
};
use crate::config::NudgeTuning;
use crate::exposure::{ExposureRiskType, PrivacyRiskLevel};
use crate::permissions::{count_recent_accesses, top_accessing_apps, AppPermissionAccess};
use crate::settings::{AppSettings, NudgeFrequency};
use crate::social::{PostVisibility, SocialPost};
use crate::util::generate_id;

/// Builds nudges from the user's data.
///
/// The engine is stateless apart from its tuning; callers pass the current
/// time so the rules stay deterministic under test.
#[derive(Debug, Clone, Default)]
pub struct NudgeEngine {
    tuning: NudgeTuning,
}

impl NudgeEngine {
    /// Creates an engine with the given tuning.
    #[must_use]
    pub const fn new(tuning: NudgeTuning) -> Self {
        Self { tuning }
    }

    /// Returns the tuning in use.
    #[must_use]
    pub const fn tuning(&self) -> &NudgeTuning {
        &self.tuning
    }

    /// Audience estimate for a draft with `visibility`.
    #[must_use]
    pub fn audience_for(&self, visibility: PostVisibility) -> u32 {
        if visibility == PostVisibility::Public {
            self.tuning.public_audience
        } else {
            self.tuning.limited_audience
        }
    }

    /// Returns false if permission nudges are disabled or `now` (wall-clock
    /// time in the user's zone) falls in quiet hours.
    ///
    /// Malformed quiet-hours bounds are logged and treated as "not quiet".
    #[must_use]
    pub fn should_show_nudge<Tz: TimeZone>(&self, settings: &AppSettings, now: &DateTime<Tz>) -> bool {
        if !settings.permission_nudge_enabled {
            return false;
        }

        match settings.quiet_hours_active(now.time()) {
            Ok(quiet) => !quiet,
            Err(e) => {
                warn!("Ignoring quiet hours: {e}");
                true
            }
        }
    }

    /// Builds the permission access nudge, or `None` when nudges are
    /// suppressed or no app outside the exclusion list has unsafe accesses.
    #[must_use]
    pub fn create_permission_nudge<Tz: TimeZone>(
        &self,
        accesses: &[AppPermissionAccess],
        settings: &AppSettings,
        now: &DateTime<Tz>,
    ) -> Option<Nudge> {
        if !self.should_show_nudge(settings, now) {
            return None;
        }

        let considered: Vec<AppPermissionAccess> = accesses
            .iter()
            .filter(|a| !settings.is_app_excluded(&a.app_name))
            .cloned()
            .collect();

        let now = now.with_timezone(&Utc);
        let window = self.tuning.recent_window_days;
        let recent = count_recent_accesses(&considered, window, now);
        let top_apps = top_accessing_apps(&considered, self.tuning.top_app_count);

        if top_apps.is_empty() {
            debug!("No unsafe app accesses, skipping permission nudge");
            return None;
        }

        Some(Nudge {
            id: generate_id(),
            nudge_type: NudgeType::PermissionAccess,
            title: "Apps Accessing Your Data".to_string(),
            message: format!(
                "In the last {window} days, {} apps accessed your sensitive data {recent} times.",
                top_apps.len()
            ),
            status: NudgeStatus::Shown,
            created_at: now,
            responded_at: None,
            delivery_style: settings.nudge_delivery_style,
            data: Some(NudgeData::PermissionAccess {
                apps: top_apps,
                access_count: recent,
            }),
            actions: vec![
                NudgeAction::new(ACTION_VIEW_DETAILS, "Show Me More", NudgeActionKind::Primary),
                NudgeAction::new(
                    ACTION_CHANGE_SETTINGS,
                    "Change Settings",
                    NudgeActionKind::Secondary,
                ),
                NudgeAction::new(ACTION_DISMISS, "Keep Sharing", NudgeActionKind::Dismiss),
            ],
        })
    }

    /// Builds the audience preview shown before a draft is published.
    #[must_use]
    pub fn create_audience_nudge(
        &self,
        audience_size: u32,
        visibility: PostVisibility,
        now: DateTime<Utc>,
    ) -> Nudge {
        Nudge {
            id: generate_id(),
            nudge_type: NudgeType::Audience,
            title: "Who Can See This?".to_string(),
            message: format!(
                "This post will be {visibility}. Approximately {audience_size} people can see it."
            ),
            status: NudgeStatus::Shown,
            created_at: now,
            responded_at: None,
            delivery_style: NudgeDeliveryStyle::HeadsUp,
            data: Some(NudgeData::Audience {
                audience_size,
                visibility,
            }),
            actions: vec![
                NudgeAction::new(ACTION_CONTINUE, "Continue Posting", NudgeActionKind::Primary),
                NudgeAction::new(
                    ACTION_CHANGE_AUDIENCE,
                    "Change Audience",
                    NudgeActionKind::Secondary,
                ),
                NudgeAction::new(ACTION_CANCEL, "Cancel", NudgeActionKind::Dismiss),
            ],
        }
    }

    /// Builds an exposure warning for `post`.
    #[must_use]
    pub fn create_exposure_nudge(
        &self,
        exposure_type: ExposureRiskType,
        post: &SocialPost,
        now: DateTime<Utc>,
    ) -> Nudge {
        let (title, message) = match exposure_type {
            ExposureRiskType::PublicPost => (
                "Public Post Detected",
                "This post is visible to everyone on the internet. Consider making it friends-only.",
            ),
            ExposureRiskType::LocationTagged => (
                "Location Shared",
                "You shared your location in this post. This could reveal your home or work.",
            ),
            ExposureRiskType::PiiDetected => (
                "Personal Information Detected",
                "This post may contain personal information like email or phone number.",
            ),
            ExposureRiskType::HighEmotion => (
                "Emotional Post",
                "This post contains strong emotional language. You may want to review before sharing.",
            ),
            ExposureRiskType::TaggedPhoto => {
                ("Privacy Alert", "This post may have privacy concerns.")
            }
        };

        Nudge {
            id: generate_id(),
            nudge_type: NudgeType::Exposure,
            title: title.to_string(),
            message: message.to_string(),
            status: NudgeStatus::Shown,
            created_at: now,
            responded_at: None,
            delivery_style: NudgeDeliveryStyle::HeadsUp,
            data: Some(NudgeData::Exposure {
                post_id: post.id.clone(),
                exposure_type,
            }),
            actions: vec![
                NudgeAction::new(ACTION_REVIEW, "Review Post", NudgeActionKind::Primary),
                NudgeAction::new(ACTION_MAKE_PRIVATE, "Make Private", NudgeActionKind::Secondary),
                NudgeAction::new(ACTION_DISMISS, "Dismiss", NudgeActionKind::Dismiss),
            ],
        }
    }

    /// Walks `posts` in order and emits exposure nudges, capped at the
    /// configured maximum.
    ///
    /// A post yields, in order: a public nudge if it is public and high risk,
    /// a location nudge if tagged, then one per `pii` and `emotion` reason.
    #[must_use]
    pub fn analyze_posts_for_nudges(&self, posts: &[SocialPost], now: DateTime<Utc>) -> Vec<Nudge> {
        posts
            .iter()
            .flat_map(|post| {
                let mut kinds = Vec::new();
                if post.visibility == PostVisibility::Public
                    && post.risk_level == PrivacyRiskLevel::High
                {
                    kinds.push(ExposureRiskType::PublicPost);
                }
                if post.location.is_some() {
                    kinds.push(ExposureRiskType::LocationTagged);
                }
                if post.has_risk_reason("pii") {
                    kinds.push(ExposureRiskType::PiiDetected);
                }
                if post.has_risk_reason("emotion") {
                    kinds.push(ExposureRiskType::HighEmotion);
                }
                kinds.into_iter().map(move |kind| (kind, post))
            })
            .take(self.tuning.max_exposure_nudges)
            .map(|(kind, post)| self.create_exposure_nudge(kind, post, now))
            .collect()
    }

    /// Scores a nudge; higher is more urgent.
    ///
    /// Exposure nudges get a bonus, heavy permission nudges get a bonus, and
    /// users who dismiss far more than they act get a penalty.
    #[must_use]
    pub fn calculate_nudge_priority(&self, nudge: &Nudge, history: &NudgeHistory) -> i32 {
        let t = &self.tuning;
        let mut priority = t.base_priority;

        if nudge.nudge_type == NudgeType::Exposure {
            priority += t.exposure_bonus;
        }

        if history.dismissed_count > history.acted_count.saturating_mul(t.dismissal_ratio) {
            priority -= t.dismissal_penalty;
        }

        if nudge.nudge_type == NudgeType::PermissionAccess
            && nudge.access_count() > t.heavy_access_threshold as usize
        {
            priority += t.heavy_access_bonus;
        }

        priority
    }

    /// Returns true if a summary is due: never shown, or at least the
    /// frequency's number of whole days have passed.
    #[must_use]
    pub fn should_show_daily_summary(
        last_shown: Option<DateTime<Utc>>,
        frequency: NudgeFrequency,
        now: DateTime<Utc>,
    ) -> bool {
        last_shown.is_none_or(|last| (now - last).num_days() >= frequency.min_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsUpdate;
    use chrono::Duration;

    fn engine() -> NudgeEngine {
        NudgeEngine::default()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, h, m, 0).unwrap()
    }

    fn access(app: &str, count: u32, days_ago: &[i64], now: DateTime<Utc>) -> AppPermissionAccess {
        AppPermissionAccess {
            app_name: app.to_string(),
            app_icon: None,
            permission_type: crate::permissions::PermissionType::Location,
            last_accessed: now,
            access_count: count,
            access_history: days_ago.iter().map(|d| now - Duration::days(*d)).collect(),
            marked_safe: false,
        }
    }

    fn post(id: &str, visibility: PostVisibility, risk: PrivacyRiskLevel) -> SocialPost {
        SocialPost {
            id: id.to_string(),
            platform: crate::social::SocialPlatform::Facebook,
            content: "hello".to_string(),
            media_urls: None,
            posted_at: at(9, 0),
            visibility,
            audience_size: None,
            tags: None,
            location: None,
            mentions: None,
            risk_level: risk,
            risk_reasons: None,
        }
    }

    #[test]
    fn suppressed_when_disabled() {
        let mut settings = AppSettings::default();
        settings.permission_nudge_enabled = false;
        assert!(!engine().should_show_nudge(&settings, &at(12, 0)));
    }

    #[test]
    fn suppressed_in_quiet_hours() {
        let settings = AppSettings::default();
        assert!(!engine().should_show_nudge(&settings, &at(23, 0)));
        assert!(!engine().should_show_nudge(&settings, &at(7, 59)));
        assert!(engine().should_show_nudge(&settings, &at(8, 0)));
        assert!(engine().should_show_nudge(&settings, &at(12, 0)));
    }

    #[test]
    fn quiet_hours_need_both_bounds() {
        let mut settings = AppSettings::default();
        settings.quiet_hours_start = None;
        assert!(engine().should_show_nudge(&settings, &at(23, 0)));
    }

    #[test]
    fn malformed_quiet_hours_do_not_suppress() {
        let mut settings = AppSettings::default();
        settings.quiet_hours_start = Some("late".to_string());
        assert!(engine().should_show_nudge(&settings, &at(23, 0)));
    }

    #[test]
    fn permission_nudge_message_and_data() {
        let now = at(12, 0);
        let accesses = vec![
            access("Maps", 30, &[0, 1, 5], now),
            access("Chat", 40, &[2, 3], now),
            access("Music", 5, &[0], now),
            access("Game", 1, &[6], now),
        ];

        let nudge = engine()
            .create_permission_nudge(&accesses, &AppSettings::default(), &now)
            .unwrap();

        assert_eq!(nudge.nudge_type, NudgeType::PermissionAccess);
        assert_eq!(nudge.title, "Apps Accessing Your Data");
        assert_eq!(
            nudge.message,
            "In the last 4 days, 3 apps accessed your sensitive data 5 times."
        );
        assert_eq!(
            nudge.data,
            Some(NudgeData::PermissionAccess {
                apps: vec!["Chat".to_string(), "Maps".to_string(), "Music".to_string()],
                access_count: 5,
            })
        );
        let ids: Vec<_> = nudge.actions.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["view_details", "change_settings", "dismiss"]);
        assert_eq!(nudge.actions[2].label, "Keep Sharing");
        assert_eq!(nudge.created_at, now);
    }

    #[test]
    fn permission_nudge_uses_delivery_style() {
        let now = at(12, 0);
        let mut settings = AppSettings::default();
        settings.apply(&SettingsUpdate {
            nudge_delivery_style: Some(NudgeDeliveryStyle::FullScreen),
            ..SettingsUpdate::default()
        });
        let nudge = engine()
            .create_permission_nudge(&[access("Maps", 3, &[0], now)], &settings, &now)
            .unwrap();
        assert_eq!(nudge.delivery_style, NudgeDeliveryStyle::FullScreen);
    }

    #[test]
    fn permission_nudge_none_when_all_safe_or_excluded() {
        let now = at(12, 0);
        let mut safe = access("Maps", 10, &[0], now);
        safe.marked_safe = true;
        assert!(engine()
            .create_permission_nudge(&[safe], &AppSettings::default(), &now)
            .is_none());

        let mut settings = AppSettings::default();
        settings.excluded_apps = vec!["Chat".to_string()];
        assert!(engine()
            .create_permission_nudge(&[access("Chat", 10, &[0], now)], &settings, &now)
            .is_none());
    }

    #[test]
    fn permission_nudge_none_in_quiet_hours() {
        let now = at(23, 30);
        assert!(engine()
            .create_permission_nudge(
                &[access("Maps", 10, &[0], now)],
                &AppSettings::default(),
                &now
            )
            .is_none());
    }

    #[test]
    fn audience_nudge_text() {
        let nudge = engine().create_audience_nudge(2500, PostVisibility::Public, at(12, 0));
        assert_eq!(nudge.title, "Who Can See This?");
        assert_eq!(
            nudge.message,
            "This post will be public. Approximately 2500 people can see it."
        );
        assert_eq!(nudge.delivery_style, NudgeDeliveryStyle::HeadsUp);
        let ids: Vec<_> = nudge.actions.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["continue", "change_audience", "cancel"]);
    }

    #[test]
    fn audience_sizes_follow_visibility() {
        assert_eq!(engine().audience_for(PostVisibility::Public), 2500);
        assert_eq!(engine().audience_for(PostVisibility::Friends), 150);
        assert_eq!(engine().audience_for(PostVisibility::Private), 150);
    }

    #[test]
    fn exposure_nudge_titles() {
        let p = post("p1", PostVisibility::Public, PrivacyRiskLevel::High);
        let cases = [
            (ExposureRiskType::PublicPost, "Public Post Detected"),
            (ExposureRiskType::LocationTagged, "Location Shared"),
            (ExposureRiskType::PiiDetected, "Personal Information Detected"),
            (ExposureRiskType::HighEmotion, "Emotional Post"),
            (ExposureRiskType::TaggedPhoto, "Privacy Alert"),
        ];
        for (kind, title) in cases {
            let nudge = engine().create_exposure_nudge(kind, &p, at(12, 0));
            assert_eq!(nudge.title, title);
            assert_eq!(nudge.post_id(), Some("p1"));
            assert_eq!(nudge.actions[1].id, "make_private");
        }
    }

    #[test]
    fn analyze_posts_order_and_rules() {
        let mut tagged = post("b", PostVisibility::Friends, PrivacyRiskLevel::Medium);
        tagged.location = Some("Home".to_string());
        tagged.risk_reasons = Some(vec!["location".to_string(), "pii".to_string()]);

        let posts = vec![
            post("a", PostVisibility::Public, PrivacyRiskLevel::High),
            post("z", PostVisibility::Public, PrivacyRiskLevel::Medium),
            tagged,
        ];

        let nudges = engine().analyze_posts_for_nudges(&posts, at(12, 0));
        let found: Vec<_> = nudges
            .iter()
            .map(|n| (n.post_id().unwrap().to_string(), n.title.clone()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("a".to_string(), "Public Post Detected".to_string()),
                ("b".to_string(), "Location Shared".to_string()),
                ("b".to_string(), "Personal Information Detected".to_string()),
            ]
        );
    }

    #[test]
    fn analyze_posts_caps_at_five() {
        let mut p = post("x", PostVisibility::Public, PrivacyRiskLevel::High);
        p.location = Some("Home".to_string());
        p.risk_reasons = Some(vec!["pii".to_string(), "emotion".to_string()]);
        let posts = vec![p.clone(), p.clone(), p];

        assert_eq!(engine().analyze_posts_for_nudges(&posts, at(12, 0)).len(), 5);
    }

    #[test]
    fn priority_rules() {
        let e = engine();
        let now = at(12, 0);
        let p = post("p", PostVisibility::Public, PrivacyRiskLevel::High);
        let exposure = e.create_exposure_nudge(ExposureRiskType::PublicPost, &p, now);
        let audience = e.create_audience_nudge(150, PostVisibility::Friends, now);
        let calm = NudgeHistory::default();
        let dismissive = NudgeHistory {
            dismissed_count: 5,
            acted_count: 2,
        };

        assert_eq!(e.calculate_nudge_priority(&audience, &calm), 5);
        assert_eq!(e.calculate_nudge_priority(&exposure, &calm), 8);
        assert_eq!(e.calculate_nudge_priority(&exposure, &dismissive), 6);

        let balanced = NudgeHistory {
            dismissed_count: 4,
            acted_count: 2,
        };
        assert_eq!(e.calculate_nudge_priority(&audience, &balanced), 5);
    }

    #[test]
    fn heavy_permission_nudge_gets_bonus() {
        let e = engine();
        let now = at(12, 0);
        let history: Vec<i64> = vec![0; 51];
        let heavy = e
            .create_permission_nudge(
                &[access("Maps", 60, &history, now)],
                &AppSettings::default(),
                &now,
            )
            .unwrap();
        let light = e
            .create_permission_nudge(
                &[access("Maps", 60, &[0], now)],
                &AppSettings::default(),
                &now,
            )
            .unwrap();

        assert_eq!(heavy.access_count(), 51);
        assert_eq!(e.calculate_nudge_priority(&heavy, &NudgeHistory::default()), 7);
        assert_eq!(e.calculate_nudge_priority(&light, &NudgeHistory::default()), 5);
    }

    #[test]
    fn daily_summary_due() {
        let now = at(12, 0);
        assert!(NudgeEngine::should_show_daily_summary(
            None,
            NudgeFrequency::Weekly,
            now
        ));
        assert!(!NudgeEngine::should_show_daily_summary(
            Some(now - Duration::hours(23)),
            NudgeFrequency::Daily,
            now
        ));
        assert!(NudgeEngine::should_show_daily_summary(
            Some(now - Duration::hours(24)),
            NudgeFrequency::Daily,
            now
        ));
        assert!(!NudgeEngine::should_show_daily_summary(
            Some(now - Duration::days(6)),
            NudgeFrequency::Weekly,
            now
        ));
        assert!(NudgeEngine::should_show_daily_summary(
            Some(now - Duration::days(14)),
            NudgeFrequency::Biweekly,
            now
        ));
        assert!(!NudgeEngine::should_show_daily_summary(
            Some(now - Duration::days(13)),
            NudgeFrequency::Biweekly,
            now
        ));
    }
}

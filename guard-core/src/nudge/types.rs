//! Nudge records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exposure::ExposureRiskType;
use crate::social::PostVisibility;

/// Open the permission details.
pub const ACTION_VIEW_DETAILS: &str = "view_details";
/// Open the settings screen.
pub const ACTION_CHANGE_SETTINGS: &str = "change_settings";
/// Close the nudge without acting.
pub const ACTION_DISMISS: &str = "dismiss";
/// Go on publishing the draft.
pub const ACTION_CONTINUE: &str = "continue";
/// Return to the draft to pick another audience.
pub const ACTION_CHANGE_AUDIENCE: &str = "change_audience";
/// Abandon publishing.
pub const ACTION_CANCEL: &str = "cancel";
/// Open the flagged post.
pub const ACTION_REVIEW: &str = "review";
/// Restrict the flagged post.
pub const ACTION_MAKE_PRIVATE: &str = "make_private";

/// What a nudge is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeType {
    /// Apps used sensitive permissions.
    PermissionAccess,
    /// A draft is about to reach an audience.
    Audience,
    /// A draft is counting down to publication.
    Timer,
    /// A stored post exposes something.
    Exposure,
}

impl NudgeType {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionAccess => "permission_access",
            Self::Audience => "audience",
            Self::Timer => "timer",
            Self::Exposure => "exposure",
        }
    }
}

/// Where a nudge stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeStatus {
    /// Waiting for a response.
    #[default]
    Shown,
    /// The user took the suggested action.
    Acted,
    /// The user closed it.
    Dismissed,
    /// The user put it off.
    Snoozed,
}

impl NudgeStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shown => "shown",
            Self::Acted => "acted",
            Self::Dismissed => "dismissed",
            Self::Snoozed => "snoozed",
        }
    }
}

/// How a nudge is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeDeliveryStyle {
    /// Banner over the current screen.
    #[default]
    HeadsUp,
    /// Takes over the screen.
    FullScreen,
    /// System notification.
    Notification,
}

impl NudgeDeliveryStyle {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HeadsUp => "heads_up",
            Self::FullScreen => "full_screen",
            Self::Notification => "notification",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "heads_up" => Some(Self::HeadsUp),
            "full_screen" => Some(Self::FullScreen),
            "notification" => Some(Self::Notification),
            _ => None,
        }
    }
}

/// Visual weight of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeActionKind {
    /// The suggested action.
    Primary,
    /// An alternative.
    Secondary,
    /// Closes the nudge.
    Dismiss,
}

/// A button on a nudge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NudgeAction {
    /// Identifier the caller dispatches on.
    pub id: String,
    /// Button text.
    pub label: String,
    /// Button weight.
    #[serde(rename = "type")]
    pub kind: NudgeActionKind,
}

impl NudgeAction {
    /// Creates an action.
    #[must_use]
    pub fn new(id: &str, label: &str, kind: NudgeActionKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

/// Context attached to a nudge. Serialized without a tag, matching the
/// stored shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NudgeData {
    /// Apps behind a permission nudge.
    #[serde(rename_all = "camelCase")]
    PermissionAccess {
        /// Top apps, most accesses first.
        apps: Vec<String>,
        /// Accesses in the look-back window.
        access_count: usize,
    },
    /// Audience of a draft.
    #[serde(rename_all = "camelCase")]
    Audience {
        /// Estimated viewers.
        audience_size: u32,
        /// Chosen visibility.
        visibility: PostVisibility,
    },
    /// Post behind an exposure nudge.
    #[serde(rename_all = "camelCase")]
    Exposure {
        /// Flagged post.
        post_id: String,
        /// What was found.
        exposure_type: ExposureRiskType,
    },
}

/// A prompt shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nudge {
    /// Informally-unique identifier.
    pub id: String,
    /// What the nudge is about.
    #[serde(rename = "type")]
    pub nudge_type: NudgeType,
    /// Heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Response state.
    pub status: NudgeStatus,
    /// When it was created.
    pub created_at: DateTime<Utc>,
    /// When the user responded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
    /// Presentation.
    pub delivery_style: NudgeDeliveryStyle,
    /// Context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NudgeData>,
    /// Buttons, primary first.
    #[serde(default)]
    pub actions: Vec<NudgeAction>,
}

impl Nudge {
    /// Finds an action by id.
    #[must_use]
    pub fn action(&self, id: &str) -> Option<&NudgeAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Returns true while the nudge awaits a response.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == NudgeStatus::Shown
    }

    /// Access count of a permission nudge, zero for other kinds.
    #[must_use]
    pub const fn access_count(&self) -> usize {
        match &self.data {
            Some(NudgeData::PermissionAccess { access_count, .. }) => *access_count,
            _ => 0,
        }
    }

    /// Post id of an exposure nudge.
    #[must_use]
    pub fn post_id(&self) -> Option<&str> {
        match &self.data {
            Some(NudgeData::Exposure { post_id, .. }) => Some(post_id),
            _ => None,
        }
    }

    /// Merges `update` into this nudge.
    pub fn apply(&mut self, update: &NudgeUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(responded_at) = update.responded_at {
            self.responded_at = Some(responded_at);
        }
    }
}

/// Partial update for a [`Nudge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NudgeUpdate {
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NudgeStatus>,
    /// Response time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

impl NudgeUpdate {
    /// Update recording a response with `status` at `at`.
    #[must_use]
    pub const fn responded(status: NudgeStatus, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            responded_at: Some(at),
        }
    }
}

/// How the user has responded to past nudges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeHistory {
    /// Nudges dismissed.
    pub dismissed_count: u32,
    /// Nudges acted on.
    pub acted_count: u32,
}

impl NudgeHistory {
    /// Counts responses over `nudges`.
    #[must_use]
    pub fn from_nudges(nudges: &[Nudge]) -> Self {
        nudges.iter().fold(Self::default(), |mut history, nudge| {
            match nudge.status {
                NudgeStatus::Dismissed => history.dismissed_count += 1,
                NudgeStatus::Acted => history.acted_count += 1,
                NudgeStatus::Shown | NudgeStatus::Snoozed => {}
            }
            history
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nudge(status: NudgeStatus, data: Option<NudgeData>) -> Nudge {
        Nudge {
            id: "n1".to_string(),
            nudge_type: NudgeType::Exposure,
            title: "t".to_string(),
            message: "m".to_string(),
            status,
            created_at: Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap(),
            responded_at: None,
            delivery_style: NudgeDeliveryStyle::HeadsUp,
            data,
            actions: vec![
                NudgeAction::new(ACTION_REVIEW, "Review Post", NudgeActionKind::Primary),
                NudgeAction::new(ACTION_DISMISS, "Dismiss", NudgeActionKind::Dismiss),
            ],
        }
    }

    #[test]
    fn serializes_type_fields() {
        let json = serde_json::to_value(nudge(NudgeStatus::Shown, None)).unwrap();
        assert_eq!(json["type"], "exposure");
        assert_eq!(json["deliveryStyle"], "heads_up");
        assert_eq!(json["actions"][0]["type"], "primary");
        assert_eq!(json["actions"][0]["id"], "review");
        assert!(json.get("respondedAt").is_none());
    }

    #[test]
    fn data_round_trips_untagged() {
        for data in [
            NudgeData::PermissionAccess {
                apps: vec!["Maps".to_string()],
                access_count: 12,
            },
            NudgeData::Audience {
                audience_size: 150,
                visibility: PostVisibility::Friends,
            },
            NudgeData::Exposure {
                post_id: "p1".to_string(),
                exposure_type: ExposureRiskType::LocationTagged,
            },
        ] {
            let json = serde_json::to_string(&data).unwrap();
            let back: NudgeData = serde_json::from_str(&json).unwrap();
            assert_eq!(back, data);
        }
    }

    #[test]
    fn data_uses_camel_case_keys() {
        let json = serde_json::to_value(NudgeData::Exposure {
            post_id: "p1".to_string(),
            exposure_type: ExposureRiskType::PiiDetected,
        })
        .unwrap();
        assert_eq!(json["postId"], "p1");
        assert_eq!(json["exposureType"], "pii_detected");
    }

    #[test]
    fn accessors() {
        let n = nudge(
            NudgeStatus::Shown,
            Some(NudgeData::Exposure {
                post_id: "p9".to_string(),
                exposure_type: ExposureRiskType::PublicPost,
            }),
        );
        assert_eq!(n.post_id(), Some("p9"));
        assert_eq!(n.access_count(), 0);
        assert!(n.is_pending());
        assert!(n.action("review").is_some());
        assert!(n.action("make_private").is_none());
    }

    #[test]
    fn apply_records_response() {
        let mut n = nudge(NudgeStatus::Shown, None);
        let at = Utc.with_ymd_and_hms(2026, 3, 11, 9, 0, 0).unwrap();
        n.apply(&NudgeUpdate::responded(NudgeStatus::Acted, at));
        assert_eq!(n.status, NudgeStatus::Acted);
        assert_eq!(n.responded_at, Some(at));
        assert!(!n.is_pending());
    }

    #[test]
    fn history_counts_responses() {
        let nudges = vec![
            nudge(NudgeStatus::Dismissed, None),
            nudge(NudgeStatus::Dismissed, None),
            nudge(NudgeStatus::Acted, None),
            nudge(NudgeStatus::Shown, None),
            nudge(NudgeStatus::Snoozed, None),
        ];
        assert_eq!(
            NudgeHistory::from_nudges(&nudges),
            NudgeHistory {
                dismissed_count: 2,
                acted_count: 1
            }
        );
    }
}

//! Audit entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::generate_id;

/// Kind of audited event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// A nudge was queued.
    NudgeShown,
    /// The user acted on a nudge.
    NudgeActed,
    /// The user dismissed a nudge.
    NudgeDismissed,
    /// A permission record changed.
    PermissionChanged,
    /// A post was edited.
    PostEdited,
    /// A post was deleted.
    PostDeleted,
    /// Settings changed.
    SettingsChanged,
}

impl AuditEventType {
    /// Every event type.
    pub const ALL: [Self; 7] = [
        Self::NudgeShown,
        Self::NudgeActed,
        Self::NudgeDismissed,
        Self::PermissionChanged,
        Self::PostEdited,
        Self::PostDeleted,
        Self::SettingsChanged,
    ];

    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NudgeShown => "nudge_shown",
            Self::NudgeActed => "nudge_acted",
            Self::NudgeDismissed => "nudge_dismissed",
            Self::PermissionChanged => "permission_changed",
            Self::PostEdited => "post_edited",
            Self::PostDeleted => "post_deleted",
            Self::SettingsChanged => "settings_changed",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Returns true for the three nudge events.
    #[must_use]
    pub const fn is_nudge_event(&self) -> bool {
        matches!(
            self,
            Self::NudgeShown | Self::NudgeActed | Self::NudgeDismissed
        )
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audited event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Informally-unique identifier.
    pub id: String,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub event_type: AuditEventType,
    /// Human-readable summary.
    pub description: String,
    /// Structured details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl AuditLogEntry {
    /// Creates an entry with a fresh id.
    #[must_use]
    pub fn new(
        event_type: AuditEventType,
        description: impl Into<String>,
        metadata: Option<serde_json::Value>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id(),
            timestamp,
            event_type,
            description: description.into(),
            metadata,
        }
    }
}

//! Permission types and access records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A permission the guard reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    /// Device location.
    Location,
    /// Address book.
    Contacts,
    /// Camera.
    Camera,
    /// Microphone.
    Microphone,
    /// Files and media.
    Storage,
    /// Notifications (tracking transparency on iOS).
    Notifications,
}

impl PermissionType {
    /// Every permission type.
    pub const ALL: [Self; 6] = [
        Self::Location,
        Self::Contacts,
        Self::Camera,
        Self::Microphone,
        Self::Storage,
        Self::Notifications,
    ];

    /// Types counted as sensitive by the risk score and summary.
    pub const SENSITIVE: [Self; 4] = [
        Self::Location,
        Self::Contacts,
        Self::Camera,
        Self::Microphone,
    ];

    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Contacts => "contacts",
            Self::Camera => "camera",
            Self::Microphone => "microphone",
            Self::Storage => "storage",
            Self::Notifications => "notifications",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "location" => Some(Self::Location),
            "contacts" => Some(Self::Contacts),
            "camera" => Some(Self::Camera),
            "microphone" => Some(Self::Microphone),
            "storage" => Some(Self::Storage),
            "notifications" => Some(Self::Notifications),
            _ => None,
        }
    }

    /// Returns true for location, contacts, camera and microphone.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        matches!(
            self,
            Self::Location | Self::Contacts | Self::Camera | Self::Microphone
        )
    }

    /// What an app holding this permission can do.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Location => "Apps can track where you go",
            Self::Contacts => "Apps can read your contact list",
            Self::Camera => "Apps can take photos and videos",
            Self::Microphone => "Apps can record audio",
            Self::Storage => "Apps can read/write files",
            Self::Notifications => "Apps can send you notifications",
        }
    }
}

impl std::fmt::Display for PermissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often one app used one permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPermissionAccess {
    /// Name of the app.
    pub app_name: String,
    /// Optional icon reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_icon: Option<String>,
    /// Permission used.
    pub permission_type: PermissionType,
    /// Most recent access.
    pub last_accessed: DateTime<Utc>,
    /// Total number of accesses.
    pub access_count: u32,
    /// Individual access times, newest first.
    #[serde(default)]
    pub access_history: Vec<DateTime<Utc>>,
    /// User has accepted this app's access.
    #[serde(default)]
    pub marked_safe: bool,
}

impl AppPermissionAccess {
    /// Merges `update` into this record.
    pub fn apply(&mut self, update: &PermissionAccessUpdate) {
        if let Some(app_icon) = &update.app_icon {
            self.app_icon = Some(app_icon.clone());
        }
        if let Some(last_accessed) = update.last_accessed {
            self.last_accessed = last_accessed;
        }
        if let Some(access_count) = update.access_count {
            self.access_count = access_count;
        }
        if let Some(history) = &update.access_history {
            self.access_history.clone_from(history);
        }
        if let Some(marked_safe) = update.marked_safe {
            self.marked_safe = marked_safe;
        }
    }
}

/// Partial update for an [`AppPermissionAccess`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionAccessUpdate {
    /// New icon reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_icon: Option<String>,
    /// New last access time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
    /// New access count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_count: Option<u32>,
    /// Replacement access history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_history: Option<Vec<DateTime<Utc>>>,
    /// New safe flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked_safe: Option<bool>,
}

impl PermissionAccessUpdate {
    /// Update that marks records safe.
    #[must_use]
    pub fn mark_safe() -> Self {
        Self {
            marked_safe: Some(true),
            ..Self::default()
        }
    }
}

/// Filter chip on the permissions viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionFilter {
    /// Every record.
    #[default]
    All,
    /// Records of one permission type.
    Only(PermissionType),
}

impl PermissionFilter {
    /// Parses `all` or a permission type name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s == "all" {
            Some(Self::All)
        } else {
            PermissionType::parse(s).map(Self::Only)
        }
    }

    /// Returns true if `access` passes this filter.
    #[must_use]
    pub fn matches(&self, access: &AppPermissionAccess) -> bool {
        match self {
            Self::All => true,
            Self::Only(permission) => access.permission_type == *permission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn access() -> AppPermissionAccess {
        AppPermissionAccess {
            app_name: "Spotify".to_string(),
            app_icon: None,
            permission_type: PermissionType::Microphone,
            last_accessed: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
            access_count: 12,
            access_history: Vec::new(),
            marked_safe: false,
        }
    }

    #[test]
    fn sensitive_set_matches_predicate() {
        for permission in PermissionType::ALL {
            assert_eq!(
                permission.is_sensitive(),
                PermissionType::SENSITIVE.contains(&permission)
            );
        }
        assert!(!PermissionType::Storage.is_sensitive());
    }

    #[test]
    fn permission_parse_round_trips() {
        for permission in PermissionType::ALL {
            assert_eq!(PermissionType::parse(permission.as_str()), Some(permission));
        }
        assert_eq!(PermissionType::parse("bluetooth"), None);
    }

    #[test]
    fn mark_safe_update_only_touches_flag() {
        let mut record = access();
        record.apply(&PermissionAccessUpdate::mark_safe());
        assert!(record.marked_safe);
        assert_eq!(record.access_count, 12);
    }

    #[test]
    fn update_replaces_count_and_history() {
        let mut record = access();
        let when = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        record.apply(&PermissionAccessUpdate {
            access_count: Some(3),
            access_history: Some(vec![when]),
            last_accessed: Some(when),
            ..PermissionAccessUpdate::default()
        });
        assert_eq!(record.access_count, 3);
        assert_eq!(record.access_history, vec![when]);
        assert_eq!(record.last_accessed, when);
    }

    #[test]
    fn filter_parse_and_match() {
        assert_eq!(PermissionFilter::parse("all"), Some(PermissionFilter::All));
        let camera = PermissionFilter::parse("camera").unwrap();
        assert!(!camera.matches(&access()));
        assert!(PermissionFilter::Only(PermissionType::Microphone).matches(&access()));
        assert_eq!(PermissionFilter::parse("everything"), None);
    }

    #[test]
    fn access_serializes_camel_case() {
        let json = serde_json::to_value(access()).unwrap();
        assert_eq!(json["appName"], "Spotify");
        assert_eq!(json["permissionType"], "microphone");
        assert_eq!(json["markedSafe"], false);
        assert!(json.get("appIcon").is_none());
    }
}

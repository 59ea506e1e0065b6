//! OS permission shim.
//!
//! The core never talks to the OS itself. The host implements
//! [`PermissionPlatform`] (or reports statuses into a
//! [`HostReportedPlatform`]) and the helpers here reduce answers to booleans.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use log::error;
use serde::{Deserialize, Serialize};

use super::error::{PermissionError, Result};
use super::types::PermissionType;

/// Mobile OS family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformOs {
    /// iOS.
    Ios,
    /// Android.
    Android,
}

impl PlatformOs {
    /// Parses `ios` or `android`, ignoring ASCII case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ios") {
            Some(Self::Ios)
        } else if s.eq_ignore_ascii_case("android") {
            Some(Self::Android)
        } else {
            None
        }
    }
}

/// Answer to a permission check or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// The app holds the permission.
    Granted,
    /// Not granted, the app may ask again.
    Denied,
    /// Not granted, the user must change it in system settings.
    Blocked,
    /// Granted with restrictions.
    Limited,
    /// Not available on this device.
    Unavailable,
}

impl PermissionStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Blocked => "blocked",
            Self::Limited => "limited",
            Self::Unavailable => "unavailable",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "granted" => Some(Self::Granted),
            "denied" => Some(Self::Denied),
            "blocked" => Some(Self::Blocked),
            "limited" => Some(Self::Limited),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

/// OS permission identifier for `permission` on `os`.
#[must_use]
pub const fn platform_permission(permission: PermissionType, os: PlatformOs) -> &'static str {
    match (permission, os) {
        (PermissionType::Location, PlatformOs::Ios) => "ios.permission.LOCATION_WHEN_IN_USE",
        (PermissionType::Location, PlatformOs::Android) => {
            "android.permission.ACCESS_FINE_LOCATION"
        }
        (PermissionType::Camera, PlatformOs::Ios) => "ios.permission.CAMERA",
        (PermissionType::Camera, PlatformOs::Android) => "android.permission.CAMERA",
        (PermissionType::Microphone, PlatformOs::Ios) => "ios.permission.MICROPHONE",
        (PermissionType::Microphone, PlatformOs::Android) => "android.permission.RECORD_AUDIO",
        (PermissionType::Contacts, PlatformOs::Ios) => "ios.permission.CONTACTS",
        (PermissionType::Contacts, PlatformOs::Android) => "android.permission.READ_CONTACTS",
        (PermissionType::Storage, PlatformOs::Ios) => "ios.permission.MEDIA_LIBRARY",
        (PermissionType::Storage, PlatformOs::Android) => {
            "android.permission.READ_EXTERNAL_STORAGE"
        }
        (PermissionType::Notifications, PlatformOs::Ios) => {
            "ios.permission.APP_TRACKING_TRANSPARENCY"
        }
        (PermissionType::Notifications, PlatformOs::Android) => {
            "android.permission.POST_NOTIFICATIONS"
        }
    }
}

/// Host hook for checking and requesting OS permissions.
///
/// Implementations must be `Send + Sync`; the guard may be shared across
/// threads by the host.
pub trait PermissionPlatform: Send + Sync {
    /// OS family, used to pick permission identifiers.
    fn os(&self) -> PlatformOs;

    /// Reports the current status without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot answer.
    fn check(&self, permission: PermissionType) -> Result<PermissionStatus>;

    /// Prompts the user if needed and reports the resulting status.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot answer.
    fn request(&self, permission: PermissionType) -> Result<PermissionStatus>;
}

impl<P: PermissionPlatform + ?Sized> PermissionPlatform for Arc<P> {
    fn os(&self) -> PlatformOs {
        (**self).os()
    }

    fn check(&self, permission: PermissionType) -> Result<PermissionStatus> {
        (**self).check(permission)
    }

    fn request(&self, permission: PermissionType) -> Result<PermissionStatus> {
        (**self).request(permission)
    }
}

/// Returns true only if the permission is granted. Failures are logged and
/// reported as not granted.
pub fn check_permission(platform: &dyn PermissionPlatform, permission: PermissionType) -> bool {
    match platform.check(permission) {
        Ok(status) => status == PermissionStatus::Granted,
        Err(e) => {
            error!("Error checking {permission} permission: {e}");
            false
        }
    }
}

/// Requests a permission; true only if granted. Failures are logged and
/// reported as not granted.
pub fn request_permission(platform: &dyn PermissionPlatform, permission: PermissionType) -> bool {
    match platform.request(permission) {
        Ok(status) => status == PermissionStatus::Granted,
        Err(e) => {
            error!("Error requesting {permission} permission: {e}");
            false
        }
    }
}

/// Requests each permission in turn.
pub fn request_multiple_permissions(
    platform: &dyn PermissionPlatform,
    permissions: &[PermissionType],
) -> BTreeMap<PermissionType, bool> {
    permissions
        .iter()
        .map(|&permission| (permission, request_permission(platform, permission)))
        .collect()
}

/// Platform without an OS behind it. Every permission is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessPlatform {
    os: PlatformOs,
}

impl HeadlessPlatform {
    /// Creates a headless platform posing as `os`.
    #[must_use]
    pub const fn new(os: PlatformOs) -> Self {
        Self { os }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(PlatformOs::Android)
    }
}

impl PermissionPlatform for HeadlessPlatform {
    fn os(&self) -> PlatformOs {
        self.os
    }

    fn check(&self, _permission: PermissionType) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Unavailable)
    }

    fn request(&self, _permission: PermissionType) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Unavailable)
    }
}

/// Platform whose statuses are pushed in by the host.
///
/// The host queries the OS on its own side and calls [`report`](Self::report)
/// with the answers. Checks and requests return the last reported status,
/// or [`PermissionError::Unavailable`] if nothing was reported. Each
/// requested permission is recorded once so the host can replay the prompts
/// it owes the user.
#[derive(Debug)]
pub struct HostReportedPlatform {
    os: PlatformOs,
    statuses: RwLock<HashMap<PermissionType, PermissionStatus>>,
    requested: RwLock<Vec<PermissionType>>,
}

impl HostReportedPlatform {
    /// Creates a platform with no reported statuses.
    #[must_use]
    pub fn new(os: PlatformOs) -> Self {
        Self {
            os,
            statuses: RwLock::new(HashMap::new()),
            requested: RwLock::new(Vec::new()),
        }
    }

    /// Records the status the OS reported for `permission`.
    ///
    /// # Errors
    ///
    /// Returns an error if the status table lock is poisoned.
    pub fn report(&self, permission: PermissionType, status: PermissionStatus) -> Result<()> {
        let mut statuses = self
            .statuses
            .write()
            .map_err(|e| PermissionError::Platform(e.to_string()))?;
        statuses.insert(permission, status);
        Ok(())
    }

    /// Distinct permissions requested so far, in first-request order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request log lock is poisoned.
    pub fn requested(&self) -> Result<Vec<PermissionType>> {
        let requested = self
            .requested
            .read()
            .map_err(|e| PermissionError::Platform(e.to_string()))?;
        Ok(requested.clone())
    }

    fn status_of(&self, permission: PermissionType) -> Result<PermissionStatus> {
        let statuses = self
            .statuses
            .read()
            .map_err(|e| PermissionError::Platform(e.to_string()))?;
        statuses
            .get(&permission)
            .copied()
            .ok_or_else(|| PermissionError::Unavailable(permission.to_string()))
    }
}

impl PermissionPlatform for HostReportedPlatform {
    fn os(&self) -> PlatformOs {
        self.os
    }

    fn check(&self, permission: PermissionType) -> Result<PermissionStatus> {
        self.status_of(permission)
    }

    fn request(&self, permission: PermissionType) -> Result<PermissionStatus> {
        {
            let mut requested = self
                .requested
                .write()
                .map_err(|e| PermissionError::Platform(e.to_string()))?;
            if !requested.contains(&permission) {
                requested.push(permission);
            }
        }
        self.status_of(permission)
    }
}

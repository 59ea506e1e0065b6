//! Permission viewer and platform shim.
//!
//! The OS is reached only through [`PermissionPlatform`]. Access records
//! ([`AppPermissionAccess`]) are mock data: modern mobile OSes do not expose
//! per-app access telemetry, so [`generate_mock_permission_data`] seeds a
//! plausible history for the dashboard and nudges.
//!
//! # Types
//!
//! - [`PermissionType`]: A permission the guard reports on
//! - [`AppPermissionAccess`]: How often one app used one permission
//! - [`PermissionStatus`]: What the OS answered for a check or request

mod error;
mod platform;
mod service;
pub mod types;

pub use error::{PermissionError, Result};
pub use platform::{
    check_permission, platform_permission, request_multiple_permissions, request_permission,
    HeadlessPlatform, HostReportedPlatform, PermissionPlatform, PermissionStatus, PlatformOs,
};
pub use service::{
    count_recent_accesses, filter_by_permission, generate_mock_permission_data,
    sensitive_accesses, top_accessing_apps, MOCK_APPS,
};
pub use types::{AppPermissionAccess, PermissionAccessUpdate, PermissionFilter, PermissionType};

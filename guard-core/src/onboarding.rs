//! First-run flow.
//!
//! Four informational screens, then a completion step that asks for the
//! basic device permissions and seeds demo permission data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use serde::Serialize;

use crate::permissions::{
    generate_mock_permission_data, request_multiple_permissions, PermissionPlatform,
    PermissionType,
};
use crate::store::AppStore;

/// Permissions requested when onboarding completes.
pub const ONBOARDING_PERMISSIONS: [PermissionType; 3] = [
    PermissionType::Location,
    PermissionType::Camera,
    PermissionType::Microphone,
];

/// One onboarding screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Welcome,
    LocalData,
    SmartNudges,
    Permissions,
}

impl OnboardingStep {
    /// Screens in display order.
    pub const ALL: [Self; 4] = [
        Self::Welcome,
        Self::LocalData,
        Self::SmartNudges,
        Self::Permissions,
    ];

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome to Privacy Guard",
            Self::LocalData => "Your Privacy, Your Data",
            Self::SmartNudges => "Smart Privacy Nudges",
            Self::Permissions => "App Permissions",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Welcome => {
                "Take control of your digital privacy. Manage app permissions, monitor social \
                 media posts, and get intelligent nudges to prevent regrettable disclosures."
            }
            Self::LocalData => {
                "All data is processed locally on your device. We never send your information \
                 to external servers without your explicit consent."
            }
            Self::SmartNudges => {
                "Get personalized alerts when apps access sensitive data or when you're about \
                 to post something publicly."
            }
            Self::Permissions => {
                "We'll need permission to monitor app usage and access your device features. \
                 You can customize these later in Settings."
            }
        }
    }
}

/// Where the flow is after advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingProgress {
    /// Show this screen next.
    Step(OnboardingStep),
    /// The last screen was confirmed; run [`complete_onboarding`].
    Complete,
}

/// Cursor over the onboarding screens.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnboardingFlow {
    index: usize,
}

impl OnboardingFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// The screen currently shown.
    #[must_use]
    pub const fn current(&self) -> OnboardingStep {
        OnboardingStep::ALL[self.index]
    }

    /// Zero-based position and total screen count.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        (self.index, OnboardingStep::ALL.len())
    }

    /// Advances past the current screen.
    pub fn next(&mut self) -> OnboardingProgress {
        if self.index + 1 < OnboardingStep::ALL.len() {
            self.index += 1;
            OnboardingProgress::Step(self.current())
        } else {
            OnboardingProgress::Complete
        }
    }
}

/// What onboarding completion did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingReport {
    /// Grant result per requested permission.
    pub permissions: BTreeMap<PermissionType, bool>,
    /// Number of demo permission records stored.
    pub seeded_records: usize,
}

/// Requests the basic permissions, seeds demo permission data and marks
/// onboarding complete.
///
/// Denied or failed permission requests do not stop completion.
pub fn complete_onboarding<R: Rng + ?Sized>(
    store: &mut AppStore,
    platform: &dyn PermissionPlatform,
    rng: &mut R,
    now: DateTime<Utc>,
) -> OnboardingReport {
    let permissions = request_multiple_permissions(platform, &ONBOARDING_PERMISSIONS);

    let records = generate_mock_permission_data(rng, now);
    let seeded_records = records.len();
    store.add_permission_accesses(records);

    store.set_has_completed_onboarding(true);
    info!(
        "Onboarding complete: {seeded_records} permission records seeded, {} of {} permissions granted",
        permissions.values().filter(|granted| **granted).count(),
        permissions.len()
    );

    OnboardingReport {
        permissions,
        seeded_records,
    }
}

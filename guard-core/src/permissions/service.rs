//! Queries over permission access records and mock data generation.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{AppPermissionAccess, PermissionFilter, PermissionType};

/// Apps that appear in mock permission data.
pub const MOCK_APPS: [&str; 8] = [
    "Instagram",
    "Facebook",
    "Google Maps",
    "WhatsApp",
    "Snapchat",
    "TikTok",
    "Twitter",
    "Spotify",
];

const MOCK_PERMISSIONS: [PermissionType; 5] = [
    PermissionType::Location,
    PermissionType::Contacts,
    PermissionType::Camera,
    PermissionType::Microphone,
    PermissionType::Storage,
];

/// Generates a week of plausible access records for [`MOCK_APPS`].
///
/// Each app gets one to three distinct permissions. Each record gets an
/// access count of 1..=50 and `min(count, 10)` history entries spread over the
/// last 0..=6 days, newest first. Records come back newest first.
pub fn generate_mock_permission_data<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<AppPermissionAccess> {
    let mut records = Vec::new();

    for app in MOCK_APPS {
        let permission_count = rng.gen_range(1..=3);
        let chosen: Vec<PermissionType> = MOCK_PERMISSIONS
            .choose_multiple(rng, permission_count)
            .copied()
            .collect();

        for permission_type in chosen {
            let access_count: u32 = rng.gen_range(1..=50);
            let mut access_history: Vec<DateTime<Utc>> = (0..access_count.min(10))
                .map(|_| now - Duration::days(rng.gen_range(0..7)))
                .collect();
            access_history.sort_by(|a, b| b.cmp(a));

            records.push(AppPermissionAccess {
                app_name: app.to_string(),
                app_icon: None,
                permission_type,
                last_accessed: access_history.first().copied().unwrap_or(now),
                access_count,
                access_history,
                marked_safe: false,
            });
        }
    }

    records.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
    records
}

/// Apps with the most accesses, highest first.
///
/// Counts are summed per app over records not marked safe. Apps with equal
/// totals keep the order in which they first appear.
#[must_use]
pub fn top_accessing_apps(accesses: &[AppPermissionAccess], limit: usize) -> Vec<String> {
    let mut totals: Vec<(&str, u64)> = Vec::new();

    for access in accesses.iter().filter(|a| !a.marked_safe) {
        match totals.iter_mut().find(|(name, _)| *name == access.app_name) {
            Some((_, total)) => *total += u64::from(access.access_count),
            None => totals.push((access.app_name.as_str(), u64::from(access.access_count))),
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
        .into_iter()
        .take(limit)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Records for location, contacts, camera and microphone.
#[must_use]
pub fn sensitive_accesses(accesses: &[AppPermissionAccess]) -> Vec<&AppPermissionAccess> {
    accesses
        .iter()
        .filter(|a| a.permission_type.is_sensitive())
        .collect()
}

/// Number of history entries at or after `now - days`.
#[must_use]
pub fn count_recent_accesses(
    accesses: &[AppPermissionAccess],
    days: i64,
    now: DateTime<Utc>,
) -> usize {
    let cutoff = now - Duration::days(days);
    accesses
        .iter()
        .map(|a| a.access_history.iter().filter(|t| **t >= cutoff).count())
        .sum()
}

/// Records passing `filter`, in stored order.
#[must_use]
pub fn filter_by_permission(
    accesses: &[AppPermissionAccess],
    filter: PermissionFilter,
) -> Vec<&AppPermissionAccess> {
    accesses.iter().filter(|a| filter.matches(a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn record(app: &str, permission_type: PermissionType, count: u32) -> AppPermissionAccess {
        AppPermissionAccess {
            app_name: app.to_string(),
            app_icon: None,
            permission_type,
            last_accessed: now(),
            access_count: count,
            access_history: Vec::new(),
            marked_safe: false,
        }
    }

    #[test]
    fn top_apps_sum_per_app() {
        let accesses = vec![
            record("Maps", PermissionType::Location, 10),
            record("Chat", PermissionType::Camera, 15),
            record("Maps", PermissionType::Contacts, 10),
            record("Music", PermissionType::Microphone, 1),
        ];
        assert_eq!(top_accessing_apps(&accesses, 2), vec!["Maps", "Chat"]);
    }

    #[test]
    fn top_apps_skip_safe_records() {
        let mut safe = record("Maps", PermissionType::Location, 100);
        safe.marked_safe = true;
        let accesses = vec![safe, record("Chat", PermissionType::Camera, 1)];
        assert_eq!(top_accessing_apps(&accesses, 3), vec!["Chat"]);
    }

    #[test]
    fn top_apps_ties_keep_first_appearance() {
        let accesses = vec![
            record("B", PermissionType::Camera, 5),
            record("A", PermissionType::Camera, 5),
            record("C", PermissionType::Camera, 5),
        ];
        assert_eq!(top_accessing_apps(&accesses, 3), vec!["B", "A", "C"]);
    }

    #[test]
    fn top_apps_empty_input() {
        assert!(top_accessing_apps(&[], 3).is_empty());
    }

    #[test]
    fn sensitive_excludes_storage_and_notifications() {
        let accesses = vec![
            record("A", PermissionType::Storage, 1),
            record("B", PermissionType::Location, 1),
            record("C", PermissionType::Notifications, 1),
            record("D", PermissionType::Microphone, 1),
        ];
        let names: Vec<_> = sensitive_accesses(&accesses)
            .iter()
            .map(|a| a.app_name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "D"]);
    }

    #[test]
    fn recent_count_includes_cutoff_boundary() {
        let mut a = record("A", PermissionType::Camera, 3);
        a.access_history = vec![
            now() - Duration::days(1),
            now() - Duration::days(7),
            now() - Duration::days(8),
        ];
        assert_eq!(count_recent_accesses(&[a.clone()], 7, now()), 2);
        assert_eq!(count_recent_accesses(&[a], 0, now()), 0);
    }

    #[test]
    fn filter_by_permission_selects_type() {
        let accesses = vec![
            record("A", PermissionType::Camera, 1),
            record("B", PermissionType::Location, 1),
        ];
        assert_eq!(filter_by_permission(&accesses, PermissionFilter::All).len(), 2);
        let cams = filter_by_permission(&accesses, PermissionFilter::Only(PermissionType::Camera));
        assert_eq!(cams.len(), 1);
        assert_eq!(cams[0].app_name, "A");
    }

    #[test]
    fn mock_data_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let records = generate_mock_permission_data(&mut rng, now());

        for app in MOCK_APPS {
            let perms: Vec<_> = records
                .iter()
                .filter(|r| r.app_name == app)
                .map(|r| r.permission_type)
                .collect();
            assert!((1..=3).contains(&perms.len()), "{app} has {}", perms.len());
            let mut distinct = perms.clone();
            distinct.sort();
            distinct.dedup();
            assert_eq!(distinct.len(), perms.len());
        }

        for r in &records {
            assert!((1..=50).contains(&r.access_count));
            assert_eq!(r.access_history.len(), r.access_count.min(10) as usize);
            assert_eq!(r.last_accessed, r.access_history[0]);
            assert!(!r.marked_safe);
            assert!(r.permission_type != PermissionType::Notifications);
            for pair in r.access_history.windows(2) {
                assert!(pair[0] >= pair[1]);
            }
            for t in &r.access_history {
                assert!(*t <= now() && *t >= now() - Duration::days(6));
            }
        }

        for pair in records.windows(2) {
            assert!(pair[0].last_accessed >= pair[1].last_accessed);
        }
    }
}

//! Queries and exports over the audit log.

use serde::Serialize;

use super::types::{AuditEventType, AuditLogEntry};

/// Filter chip on the history screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditFilter {
    /// Every entry.
    #[default]
    All,
    /// Entries of one event type.
    Only(AuditEventType),
}

impl AuditFilter {
    /// Parses `all` or an event type name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s == "all" {
            Some(Self::All)
        } else {
            AuditEventType::parse(s).map(Self::Only)
        }
    }

    /// Returns true if `entry` passes this filter.
    #[must_use]
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Only(event_type) => entry.event_type == *event_type,
        }
    }
}

/// Entries passing `filter`, newest first.
#[must_use]
pub fn filter_log(log: &[AuditLogEntry], filter: AuditFilter) -> Vec<&AuditLogEntry> {
    log.iter().filter(|e| filter.matches(e)).collect()
}

/// Prepends `entry` and drops the oldest entries beyond `capacity`.
pub fn push_bounded(log: &mut Vec<AuditLogEntry>, entry: AuditLogEntry, capacity: usize) {
    log.insert(0, entry);
    log.truncate(capacity);
}

/// Headline counts for the history screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    /// All entries.
    pub total: usize,
    /// Nudge shown/acted/dismissed entries.
    pub nudges: usize,
    /// Permission change entries.
    pub permission_changes: usize,
}

impl AuditStats {
    /// Counts over `log`.
    #[must_use]
    pub fn from_log(log: &[AuditLogEntry]) -> Self {
        Self {
            total: log.len(),
            nudges: log.iter().filter(|e| e.event_type.is_nudge_event()).count(),
            permission_changes: log
                .iter()
                .filter(|e| e.event_type == AuditEventType::PermissionChanged)
                .count(),
        }
    }
}

/// Pretty-printed JSON array of `log`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_json(log: &[AuditLogEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(log)
}

/// CSV with columns `id,timestamp,eventType,description,metadata`.
///
/// Timestamps are RFC 3339 and metadata is compact JSON. Fields containing
/// commas, quotes or line breaks are quoted.
#[must_use]
pub fn export_csv(log: &[AuditLogEntry]) -> String {
    let mut out = String::from("id,timestamp,eventType,description,metadata\n");
    for entry in log {
        let metadata = entry
            .metadata
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let row = [
            csv_field(&entry.id),
            csv_field(&entry.timestamp.to_rfc3339()),
            csv_field(entry.event_type.as_str()),
            csv_field(&entry.description),
            csv_field(&metadata),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn entry(id: &str, event_type: AuditEventType, description: &str) -> AuditLogEntry {
        AuditLogEntry {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap(),
            event_type,
            description: description.to_string(),
            metadata: None,
        }
    }

    #[test]
    fn push_bounded_prepends_and_caps() {
        let mut log = Vec::new();
        for i in 0..5 {
            push_bounded(
                &mut log,
                entry(&i.to_string(), AuditEventType::PostEdited, "x"),
                3,
            );
        }
        let ids: Vec<_> = log.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3", "2"]);
    }

    #[test]
    fn filter_by_type() {
        let log = vec![
            entry("a", AuditEventType::NudgeShown, "x"),
            entry("b", AuditEventType::PostDeleted, "x"),
            entry("c", AuditEventType::NudgeShown, "x"),
        ];
        assert_eq!(filter_log(&log, AuditFilter::All).len(), 3);
        let shown = filter_log(&log, AuditFilter::parse("nudge_shown").unwrap());
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].id, "c");
        assert_eq!(AuditFilter::parse("bogus"), None);
    }

    #[test]
    fn stats_count_nudges_and_permissions() {
        let log = vec![
            entry("a", AuditEventType::NudgeShown, "x"),
            entry("b", AuditEventType::NudgeDismissed, "x"),
            entry("c", AuditEventType::PermissionChanged, "x"),
            entry("d", AuditEventType::SettingsChanged, "x"),
        ];
        assert_eq!(
            AuditStats::from_log(&log),
            AuditStats {
                total: 4,
                nudges: 2,
                permission_changes: 1
            }
        );
    }

    #[test]
    fn json_export_parses_back() {
        let log = vec![entry("a", AuditEventType::PostEdited, "Updated post p1")];
        let json = export_json(&log).unwrap();
        let back: Vec<AuditLogEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn csv_export_quotes_when_needed() {
        let mut e = entry("a", AuditEventType::SettingsChanged, "Settings updated, again");
        e.metadata = Some(json!({ "timerNudgeDuration": 5 }));
        let csv = export_csv(&[e, entry("b", AuditEventType::PostDeleted, "plain")]);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "id,timestamp,eventType,description,metadata");
        assert_eq!(
            lines[1],
            "a,2026-03-10T12:00:00+00:00,settings_changed,\"Settings updated, again\",\"{\"\"timerNudgeDuration\"\":5}\""
        );
        assert_eq!(lines[2], "b,2026-03-10T12:00:00+00:00,post_deleted,plain,");
    }

    #[test]
    fn csv_export_empty_log_has_header_only() {
        assert_eq!(export_csv(&[]), "id,timestamp,eventType,description,metadata\n");
    }
}

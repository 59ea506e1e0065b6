//! Audit trail of privacy-relevant events.
//!
//! Entries are kept newest first and bounded; see [`push_bounded`].

mod history;
pub mod types;

pub use history::{export_csv, export_json, filter_log, push_bounded, AuditFilter, AuditStats};
pub use types::{AuditEventType, AuditLogEntry};

//! Small helpers shared across modules.

use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix in generated identifiers.
const ID_SUFFIX_LEN: usize = 7;

/// Returns `len` random lowercase base-36 characters.
pub fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}

/// Generates an informally-unique identifier: `{unix_millis}_{7 base36 chars}`.
///
/// # Examples
///
/// ```
/// use guard_core::util::generate_id;
///
/// let id = generate_id();
/// let (millis, suffix) = id.split_once('_').unwrap();
/// assert!(millis.parse::<i64>().is_ok());
/// assert_eq!(suffix.len(), 7);
/// ```
#[must_use]
pub fn generate_id() -> String {
    generate_id_with(&mut rand::thread_rng(), Utc::now())
}

/// Generates an identifier from an explicit RNG and timestamp.
pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}",
        now.timestamp_millis(),
        random_base36(rng, ID_SUFFIX_LEN)
    )
}

/// Truncates `text` to `max_chars` characters, appending `...` when cut.
///
/// Counts characters, not bytes, so multi-byte text is never split.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Describes `then` relative to `now`, e.g. "3 days ago" or "in 2 hours".
#[must_use]
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let future = delta.num_seconds() < 0;
    let delta = if future { -delta } else { delta };

    let (amount, unit) = if delta.num_days() >= 365 {
        (delta.num_days() / 365, "year")
    } else if delta.num_days() >= 30 {
        (delta.num_days() / 30, "month")
    } else if delta.num_days() >= 1 {
        (delta.num_days(), "day")
    } else if delta.num_hours() >= 1 {
        (delta.num_hours(), "hour")
    } else if delta.num_minutes() >= 1 {
        (delta.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };

    let plural = if amount == 1 { "" } else { "s" };
    if future {
        format!("in {amount} {unit}{plural}")
    } else {
        format!("{amount} {unit}{plural} ago")
    }
}

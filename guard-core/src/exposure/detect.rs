//! Pattern detectors for personal information and emotional language.
//!
//! Both detectors flag likely problems for the user to review. A match does
//! not prove anything about the text.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}(?-u:\b)")
        .expect("email pattern is a valid regex")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}(?-u:\b)")
        .expect("phone pattern is a valid regex")
});

/// Words that mark a post as emotionally charged. Matched case-insensitively
/// as substrings, so "hateful" counts.
pub const EMOTIONAL_WORDS: &[&str] = &[
    "hate",
    "angry",
    "furious",
    "terrible",
    "awful",
    "worst",
    "horrible",
    "disgusting",
];

/// Returns true if `text` contains something shaped like an email address or
/// a ten-digit phone number.
///
/// # Examples
///
/// ```
/// use guard_core::exposure::detect_pii;
///
/// assert!(detect_pii("reach me at jane.doe@example.com"));
/// assert!(detect_pii("call 555-123-4567 tonight"));
/// assert!(!detect_pii("see you at 5"));
/// ```
#[must_use]
pub fn detect_pii(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text) || PHONE_PATTERN.is_match(text)
}

/// Returns true if `text` contains any of [`EMOTIONAL_WORDS`].
#[must_use]
pub fn detect_high_emotion(text: &str) -> bool {
    let lower = text.to_lowercase();
    EMOTIONAL_WORDS.iter().any(|word| lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_plain_email() {
        assert!(detect_pii("email me: someone@example.org"));
    }

    #[test]
    fn detects_email_with_plus_and_subdomain() {
        assert!(detect_pii("a.b+tag@mail.example.co.uk"));
    }

    #[test]
    fn rejects_handle_without_domain() {
        assert!(!detect_pii("ping @friend1 later"));
        assert!(!detect_pii("user@localhost"));
    }

    #[test]
    fn detects_phone_formats() {
        assert!(detect_pii("5551234567"));
        assert!(detect_pii("555.123.4567"));
        assert!(detect_pii("my number is 555-123-4567!"));
    }

    #[test]
    fn rejects_short_numbers() {
        assert!(!detect_pii("room 101, floor 3"));
        assert!(!detect_pii("12345"));
    }

    #[test]
    fn rejects_number_embedded_in_longer_digits() {
        assert!(!detect_pii("order 123456789012345"));
    }

    #[test]
    fn only_ascii_digits_make_a_phone_number() {
        assert!(!detect_pii("\u{665}\u{665}\u{665}\u{661}\u{662}\u{663}\u{664}\u{665}\u{666}\u{667}"));
        assert!(!detect_pii("\u{ff15}\u{ff15}\u{ff15}-\u{ff11}\u{ff12}\u{ff13}-\u{ff14}\u{ff15}\u{ff16}\u{ff17}"));
    }

    #[test]
    fn word_boundaries_are_ascii() {
        assert!(detect_pii("tel\u{e9}5551234567"));
        assert!(detect_pii("caf\u{e9}someone@example.org"));
    }

    #[test]
    fn detects_emotion_case_insensitive() {
        assert!(detect_high_emotion("I HATE mondays"));
        assert!(detect_high_emotion("Worst. Day. Ever."));
    }

    #[test]
    fn detects_emotion_as_substring() {
        assert!(detect_high_emotion("that was hateful"));
    }

    #[test]
    fn calm_text_is_not_emotional() {
        assert!(!detect_high_emotion("Beautiful sunset today"));
        assert!(!detect_high_emotion(""));
    }
}

//! Property-based tests for the detectors and risk scoring.
//!
//! These tests verify:
//! - PII detection finds phone numbers and emails wherever they sit in a post
//! - Emotion detection is case-insensitive
//! - Risk levels never decrease as their inputs grow
//! - Quiet-hours checks never fail for well-formed times

use chrono::NaiveTime;
use guard_core::config::RiskThresholds;
use guard_core::exposure::{
    assess_post, calculate_privacy_risk, detect_high_emotion, detect_pii, risk_from_reason_count,
    EMOTIONAL_WORDS,
};
use guard_core::settings::is_in_quiet_hours;
use guard_core::social::PostVisibility;
use proptest::prelude::*;

/// Letters and spaces only, so no accidental digits or '@'.
fn filler() -> impl Strategy<Value = String> {
    "[a-z ]{0,40}"
}

fn hh_mm() -> impl Strategy<Value = String> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| format!("{h:02}:{m:02}"))
}

proptest! {
    #[test]
    fn phone_numbers_are_pii(
        before in filler(),
        after in filler(),
        a in 100u32..1000,
        b in 100u32..1000,
        c in 1000u32..10000,
        sep in prop_oneof![Just(""), Just("-"), Just(".")],
    ) {
        let text = format!("{before} {a}{sep}{b}{sep}{c} {after}");
        prop_assert!(detect_pii(&text), "missed phone in {text:?}");
    }

    #[test]
    fn emails_are_pii(
        user in "[a-z][a-z0-9._]{0,10}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,4}",
        before in filler(),
    ) {
        let text = format!("{before} {user}@{domain}.{tld} thanks");
        prop_assert!(detect_pii(&text), "missed email in {text:?}");
    }

    #[test]
    fn letters_alone_are_never_pii(text in "[a-zA-Z ,!?]{0,80}") {
        prop_assert!(!detect_pii(&text));
    }

    #[test]
    fn emotional_words_match_in_any_case(
        index in 0..EMOTIONAL_WORDS.len(),
        upper in any::<bool>(),
        before in filler(),
    ) {
        let word = EMOTIONAL_WORDS[index];
        let word = if upper { word.to_uppercase() } else { word.to_string() };
        let text = format!("{before} {word}");
        prop_assert!(detect_high_emotion(&text));
    }

    #[test]
    fn privacy_risk_is_monotonic(public in 0usize..50, sensitive in 0usize..50) {
        let t = RiskThresholds::default();
        let base = calculate_privacy_risk(public, sensitive, &t);
        prop_assert!(calculate_privacy_risk(public + 1, sensitive, &t) >= base);
        prop_assert!(calculate_privacy_risk(public, sensitive + 1, &t) >= base);
    }

    #[test]
    fn reason_count_risk_is_monotonic(count in 0usize..10) {
        let t = RiskThresholds::default();
        prop_assert!(risk_from_reason_count(count + 1, &t) >= risk_from_reason_count(count, &t));
    }

    #[test]
    fn private_posts_carry_no_audience_reasons(text in "[a-z ]{0,60}") {
        let assessment = assess_post(&text, PostVisibility::Private, None, &RiskThresholds::default());
        prop_assert!(assessment.risk_reasons.iter().all(|r| r != "public" && r != "location"));
    }

    #[test]
    fn well_formed_quiet_hours_never_error(
        start in hh_mm(),
        end in hh_mm(),
        h in 0u32..24,
        m in 0u32..60,
    ) {
        let now = NaiveTime::from_hms_opt(h, m, 0).unwrap();
        let quiet = is_in_quiet_hours(&start, &end, now);
        prop_assert!(quiet.is_ok());
        if start == end {
            prop_assert!(quiet.unwrap());
        }
    }
}

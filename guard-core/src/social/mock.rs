//! Mock post generation for demo accounts.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{PostVisibility, SocialPlatform, SocialPost};
use crate::config::RiskThresholds;
use crate::exposure::risk_from_reason_count;
use crate::util::generate_id_with;

/// Canned post texts.
pub const SAMPLE_CONTENTS: &[&str] = &[
    "Just had an amazing dinner at the new restaurant downtown!",
    "Beautiful sunset today",
    "Working on an exciting new project",
    "Can't believe how fast this year has gone by",
    "Anyone else love rainy days?",
    "Best vacation ever! #travel",
    "Coffee is life ☕",
    "New blog post is up! Check it out",
    "Feeling grateful for amazing friends",
    "This book is incredible, highly recommend",
];

/// Location attached to mock posts that carry one.
pub const MOCK_LOCATION: &str = "New York, NY";

const VISIBILITIES: [PostVisibility; 4] = [
    PostVisibility::Public,
    PostVisibility::Friends,
    PostVisibility::Private,
    PostVisibility::Custom,
];

/// Generates `count` random posts for `platform`, newest first.
///
/// Posts are dated up to 89 days before `now`. Public posts get an audience
/// of 100..5100, others 0..500. A mock post's risk reasons are `public`,
/// `location`, and `emotion` (any `!` in the text).
pub fn generate_mock_posts<R: Rng + ?Sized>(
    platform: SocialPlatform,
    count: usize,
    rng: &mut R,
    now: DateTime<Utc>,
    thresholds: &RiskThresholds,
) -> Vec<SocialPost> {
    let mut posts: Vec<SocialPost> = (0..count)
        .map(|_| {
            let days_ago = rng.gen_range(0..90);
            let visibility = *VISIBILITIES.choose(rng).unwrap_or(&PostVisibility::Friends);
            let content = *SAMPLE_CONTENTS.choose(rng).unwrap_or(&SAMPLE_CONTENTS[0]);
            let has_location = rng.gen_bool(0.3);
            let has_mentions = rng.gen_bool(0.4);

            let mut reasons = Vec::new();
            if visibility == PostVisibility::Public {
                reasons.push("public".to_string());
            }
            if has_location {
                reasons.push("location".to_string());
            }
            if content.contains('!') {
                reasons.push("emotion".to_string());
            }

            let audience_size = if visibility == PostVisibility::Public {
                rng.gen_range(100..5100)
            } else {
                rng.gen_range(0..500)
            };

            let first_word = content.split_whitespace().next().unwrap_or_default();

            SocialPost {
                id: generate_id_with(rng, now),
                platform,
                content: content.to_string(),
                media_urls: None,
                posted_at: now - Duration::days(days_ago),
                visibility,
                audience_size: Some(audience_size),
                tags: Some(vec![format!("#{}", first_word.to_lowercase())]),
                location: has_location.then(|| MOCK_LOCATION.to_string()),
                mentions: has_mentions
                    .then(|| vec!["@friend1".to_string(), "@friend2".to_string()]),
                risk_level: risk_from_reason_count(reasons.len(), thresholds),
                risk_reasons: Some(reasons),
            }
        })
        .collect();

    posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
    posts
}

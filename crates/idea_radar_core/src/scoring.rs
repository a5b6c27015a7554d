//! Recency and keyword based trend scoring.

use chrono::{DateTime, Utc};

const BASE_SCORE: i64 = 50;

/// Each word adds its bonus once, however often it appears.
pub const HYPE_WORDS: [&str; 8] = [
    "breakthrough",
    "revolutionary",
    "funding",
    "raises",
    "launches",
    "announces",
    "billion",
    "million",
];

const HYPE_BONUS: i64 = 5;

/// Scores how "trendy" an article is, always within 0..=100.
pub fn trend_score(
    title: &str,
    description: &str,
    published_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> u8 {
    let text = format!("{} {}", title, description).to_lowercase();
    let hours_ago = (now - published_at).num_seconds() as f64 / 3600.0;

    let mut score = BASE_SCORE + recency_bonus(hours_ago);
    score += HYPE_WORDS.iter().filter(|w| text.contains(*w)).count() as i64 * HYPE_BONUS;

    score.clamp(0, 100) as u8
}

fn recency_bonus(hours_ago: f64) -> i64 {
    if hours_ago < 6.0 {
        30
    } else if hours_ago < 24.0 {
        20
    } else if hours_ago < 48.0 {
        10
    } else {
        0
    }
}

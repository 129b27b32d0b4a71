//! Importance ranking for the summary view
//!
//! Scores each feedback row by adding three ordinal signals and sorts the rows
//! by that score, highest first:
//! - Urgency: high 3, medium 2, low 1, missing 0
//! - Sentiment: negative 3, neutral 2, positive 1, missing 0
//! - Theme frequency: 1-3 relative to the most frequent theme, 0 without a theme
//!
//! The result ranges from 0 (nothing classified) to 9 (urgent, negative and
//! part of the most common theme). The function is pure; it is recomputed for
//! every summary request.
//!
//! A row without a theme gets no theme points at all, not the 1-point floor,
//! so a row the classifier could not judge ranks at 0.

use crate::types::{FeedbackItem, RankedFeedback, Sentiment, ThemeCount, Urgency};
use std::collections::HashMap;

/// Theme tallies keyed by theme label
pub type ThemeCounts = HashMap<String, u64>;

/// Build the lookup map from a counter snapshot
pub fn theme_count_map(snapshot: &[ThemeCount]) -> ThemeCounts {
    snapshot
        .iter()
        .map(|tc| (tc.theme.clone(), tc.count))
        .collect()
}

pub fn urgency_score(urgency: Option<Urgency>) -> u8 {
    match urgency {
        Some(Urgency::High) => 3,
        Some(Urgency::Medium) => 2,
        Some(Urgency::Low) => 1,
        None => 0,
    }
}

pub fn sentiment_score(sentiment: Option<Sentiment>) -> u8 {
    match sentiment {
        Some(Sentiment::Negative) => 3,
        Some(Sentiment::Neutral) => 2,
        Some(Sentiment::Positive) => 1,
        None => 0,
    }
}

/// Largest tally, floored at 1 so the ratio below is always defined
pub fn max_theme_count(counts: &ThemeCounts) -> u64 {
    counts.values().copied().max().unwrap_or(0).max(1)
}

/// Map a theme's relative frequency onto 1..=3
///
/// `round(frequency / max_count * 2) + 1`, rounding halves up. A theme the
/// counter has not caught up with yet (frequency 0) still scores 1.
pub fn theme_score(frequency: u64, max_count: u64) -> u8 {
    if max_count == 0 {
        return 0;
    }
    let ratio = (frequency.min(max_count) as f64) / (max_count as f64);
    // f64::round rounds half away from zero, which is half-up for ratio >= 0
    (ratio * 2.0).round() as u8 + 1
}

/// Importance of a single row given the theme tallies
pub fn importance(item: &FeedbackItem, counts: &ThemeCounts, max_count: u64) -> u8 {
    let theme = match item.theme.as_deref() {
        Some(theme) => theme_score(counts.get(theme).copied().unwrap_or(0), max_count),
        None => 0,
    };
    urgency_score(item.urgency) + sentiment_score(item.sentiment) + theme
}

/// Annotate rows with their importance and sort them, highest first
///
/// The sort is stable: rows with equal importance keep their input order.
pub fn rank(items: Vec<FeedbackItem>, counts: &ThemeCounts) -> Vec<RankedFeedback> {
    let max_count = max_theme_count(counts);

    let mut ranked: Vec<RankedFeedback> = items
        .into_iter()
        .map(|item| {
            let importance = importance(&item, counts, max_count);
            RankedFeedback { item, importance }
        })
        .collect();

    ranked.sort_by(|a, b| b.importance.cmp(&a.importance));
    ranked
}

use chrono::NaiveDate;

use crate::db::{MoodStore, StoreResult};
use crate::models::mood::{DayRange, MoodEntry, MoodScale};
use crate::models::trend::{MoodDistribution, TimeRange, TrendAnalysis};
use crate::services::window::{mean_score, trailing_window};

pub const EMPTY_SUMMARY: &str = "No mood data logged for this period.";

/// Fetches the user's entries for the trailing window ending `today` and
/// summarizes them. Read-only; store failures are returned, not retried.
pub async fn analyze_mood_trends(
    store: &dyn MoodStore,
    user_id: &str,
    range: TimeRange,
    today: NaiveDate,
) -> StoreResult<TrendAnalysis> {
    let window = trailing_window(today, range.days());
    tracing::debug!(
        user_id = %user_id,
        range = ?range,
        start = %window.start,
        end = %window.end,
        "Analyzing mood trends"
    );

    let entries = store.query(user_id, window).await?;
    let analysis = summarize(&entries, range, window);

    tracing::debug!(
        user_id = %user_id,
        entries = entries.len(),
        average = ?analysis.average_score,
        "Mood trend analysis complete"
    );
    Ok(analysis)
}

/// Zero-filled count per label.
pub fn distribution<'a, I>(entries: I) -> MoodDistribution
where
    I: IntoIterator<Item = &'a MoodEntry>,
{
    let mut counts: MoodDistribution = MoodScale::ALL.iter().map(|m| (*m, 0)).collect();
    for entry in entries {
        *counts.entry(entry.mood).or_insert(0) += 1;
    }
    counts
}

/// Labels with at least one entry, most frequent first. The sort is stable
/// over the awful → great map order, so on equal counts the label defined
/// first wins.
pub fn rank_moods(distribution: &MoodDistribution) -> Vec<(MoodScale, u32)> {
    let mut ranked: Vec<(MoodScale, u32)> = distribution
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(mood, count)| (*mood, *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

pub fn summarize(entries: &[MoodEntry], range: TimeRange, window: DayRange) -> TrendAnalysis {
    let Some(average) = mean_score(entries) else {
        return TrendAnalysis {
            average_score: None,
            distribution: None,
            summary: EMPTY_SUMMARY.to_string(),
            is_empty: true,
            period_start: window.start,
            period_end: window.end,
        };
    };

    let counts = distribution(entries);
    let ranked = rank_moods(&counts);

    let mut summary = format!(
        "Over the {} (from {} to {}), your average mood score was {:.1} out of 5.",
        range.describe(),
        window.start.format("%b %-d"),
        window.end.format("%b %-d"),
        average,
    );
    match ranked.as_slice() {
        [] => summary.push_str(" No specific mood was dominant."),
        [(top, top_count), rest @ ..] => {
            summary.push_str(&format!(
                " You most frequently logged feeling {} ({} times).",
                top.label(),
                top_count
            ));
            if let Some((second, second_count)) = rest.first() {
                summary.push_str(&format!(
                    " Other moods included {} ({} times).",
                    second.label(),
                    second_count
                ));
            }
        }
    }

    TrendAnalysis {
        average_score: Some(average),
        distribution: Some(counts),
        summary,
        is_empty: false,
        period_start: window.start,
        period_end: window.end,
    }
}

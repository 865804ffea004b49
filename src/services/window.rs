//! Date-window and day-grouping helpers shared by trend analysis and charts.
//! All day arithmetic is in UTC, matching how entries are stored.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::models::mood::{DayRange, MoodEntry};

/// `days` calendar days ending on (and including) `today`.
pub fn trailing_window(today: NaiveDate, days: u32) -> DayRange {
    let span = i64::from(days.max(1)) - 1;
    DayRange::new(today - Duration::days(span), today)
}

/// Buckets entries by their UTC calendar day. The map is keyed by the real
/// date, so iteration is chronological regardless of how days are labelled.
pub fn group_by_day<'a, I>(entries: I) -> BTreeMap<NaiveDate, Vec<&'a MoodEntry>>
where
    I: IntoIterator<Item = &'a MoodEntry>,
{
    let mut days: BTreeMap<NaiveDate, Vec<&'a MoodEntry>> = BTreeMap::new();
    for entry in entries {
        days.entry(entry.day()).or_default().push(entry);
    }
    days
}

/// Mean score rounded to two decimals; `None` when there are no entries.
pub fn mean_score<'a, I>(entries: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a MoodEntry>,
{
    let (total, count) = entries
        .into_iter()
        .fold((0u32, 0u32), |(total, count), e| {
            (total + u32::from(e.mood.score()), count + 1)
        });
    (count > 0).then(|| round2(f64::from(total) / f64::from(count)))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

use crate::models::chart::{AveragePoint, ChartMode, ChartRange, ChartSeries, DistributionPoint};
use crate::models::mood::MoodEntry;
use crate::services::trends::distribution;
use crate::services::window::{group_by_day, mean_score};

/// Projects already-fetched entries into a per-day chart series. Only days
/// with at least one entry appear; order follows the calendar.
pub fn project(entries: &[MoodEntry], range: ChartRange, mode: ChartMode) -> ChartSeries {
    let days = group_by_day(entries);
    let fmt = range.label_format();

    match mode {
        ChartMode::Distribution => ChartSeries::Distribution(
            days.into_iter()
                .map(|(date, day_entries)| DistributionPoint {
                    date,
                    day_label: date.format(fmt).to_string(),
                    counts: distribution(day_entries),
                })
                .collect(),
        ),
        ChartMode::Average => ChartSeries::Average(
            days.into_iter()
                .filter_map(|(date, day_entries)| {
                    mean_score(day_entries).map(|average_score| AveragePoint {
                        date,
                        day_label: date.format(fmt).to_string(),
                        average_score,
                    })
                })
                .collect(),
        ),
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trend::MoodDistribution;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartRange {
    #[default]
    Weekly,
    Monthly,
}

impl ChartRange {
    pub fn days(self) -> u32 {
        match self {
            ChartRange::Weekly => 7,
            ChartRange::Monthly => 30,
        }
    }

    /// strftime pattern for the x-axis label.
    pub fn label_format(self) -> &'static str {
        match self {
            ChartRange::Weekly => "%a",
            ChartRange::Monthly => "%b %-d",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Distribution,
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPoint {
    pub date: NaiveDate,
    pub day_label: String,
    #[serde(flatten)]
    pub counts: MoodDistribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragePoint {
    pub date: NaiveDate,
    pub day_label: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "points", rename_all = "lowercase")]
pub enum ChartSeries {
    Distribution(Vec<DistributionPoint>),
    Average(Vec<AveragePoint>),
}

impl ChartSeries {
    /// Calendar days present in the series, in series order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        match self {
            ChartSeries::Distribution(points) => points.iter().map(|p| p.date).collect(),
            ChartSeries::Average(points) => points.iter().map(|p| p.date).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ChartSeries::Distribution(points) => points.len(),
            ChartSeries::Average(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub range: Option<ChartRange>,
    pub mode: Option<ChartMode>,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub range: ChartRange,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(flatten)]
    pub series: ChartSeries,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::mood::MoodScale;

/// Trailing windows offered by the trend analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Last7Days,
    Last30Days,
}

impl TimeRange {
    pub fn days(self) -> u32 {
        match self {
            TimeRange::Last7Days => 7,
            TimeRange::Last30Days => 30,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            TimeRange::Last7Days => "last 7 days",
            TimeRange::Last30Days => "last 30 days",
        }
    }
}

/// Counts per label; always holds all five labels.
pub type MoodDistribution = BTreeMap<MoodScale, u32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<MoodDistribution>,
    pub summary: String,
    pub is_empty: bool,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub range: Option<TimeRange>,
}

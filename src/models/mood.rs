use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The five mood labels, declared in score order. `Ord` follows declaration
/// order, so any map keyed by `MoodScale` iterates awful → great.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodScale {
    Awful,
    Bad,
    Neutral,
    Good,
    Great,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MoodDefinition {
    pub value: MoodScale,
    pub label: &'static str,
    pub score: u8,
}

pub const MOOD_DEFINITIONS: [MoodDefinition; 5] = [
    MoodDefinition { value: MoodScale::Awful, label: "Awful", score: 1 },
    MoodDefinition { value: MoodScale::Bad, label: "Bad", score: 2 },
    MoodDefinition { value: MoodScale::Neutral, label: "Neutral", score: 3 },
    MoodDefinition { value: MoodScale::Good, label: "Good", score: 4 },
    MoodDefinition { value: MoodScale::Great, label: "Great", score: 5 },
];

impl MoodScale {
    pub const ALL: [MoodScale; 5] = [
        MoodScale::Awful,
        MoodScale::Bad,
        MoodScale::Neutral,
        MoodScale::Good,
        MoodScale::Great,
    ];

    pub fn definition(self) -> &'static MoodDefinition {
        &MOOD_DEFINITIONS[self as usize]
    }

    pub fn score(self) -> u8 {
        self.definition().score
    }

    pub fn label(self) -> &'static str {
        self.definition().label
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoodScale::Awful => "awful",
            MoodScale::Bad => "bad",
            MoodScale::Neutral => "neutral",
            MoodScale::Good => "good",
            MoodScale::Great => "great",
        }
    }
}

impl fmt::Display for MoodScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mood '{0}'; expected one of awful, bad, neutral, good, great")]
pub struct UnknownMood(pub String);

impl FromStr for MoodScale {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "awful" => Ok(MoodScale::Awful),
            "bad" => Ok(MoodScale::Bad),
            "neutral" => Ok(MoodScale::Neutral),
            "good" => Ok(MoodScale::Good),
            "great" => Ok(MoodScale::Great),
            _ => Err(UnknownMood(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: String,
    pub mood: MoodScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The calendar day this mood describes, pinned to 12:00 UTC.
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(user_id: impl Into<String>, mood: MoodScale, day: NaiveDate, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            mood,
            notes,
            timestamp: canonical_timestamp(day),
            created_at: Utc::now(),
        }
    }

    /// The UTC calendar day the entry belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Every logged day is stored at noon UTC so that "today" and back-dated
/// entries land in the same bucket regardless of when they were written.
pub fn canonical_timestamp(day: NaiveDate) -> DateTime<Utc> {
    (day.and_time(NaiveTime::MIN) + Duration::hours(12)).and_utc()
}

/// Raw row shape; the mood column is text and is parsed on the way out.
#[derive(Debug, Clone, FromRow)]
pub struct MoodEntryRow {
    pub id: Uuid,
    pub user_id: String,
    pub mood: String,
    pub notes: Option<String>,
    pub mood_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MoodEntryRow> for MoodEntry {
    type Error = UnknownMood;

    fn try_from(row: MoodEntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            mood: row.mood.parse()?,
            notes: row.notes,
            timestamp: row.mood_at,
            created_at: row.created_at,
        })
    }
}

/// Inclusive range of UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Half-open instant bounds `[start 00:00, (end + 1) 00:00)`.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start.and_time(NaiveTime::MIN).and_utc();
        let end = (self.end.and_time(NaiveTime::MIN) + Duration::days(1)).and_utc();
        (start, end)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds();
        ts >= start && ts < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_follow_declaration_order() {
        let scores: Vec<u8> = MoodScale::ALL.iter().map(|m| m.score()).collect();
        assert_eq!(scores, vec![1, 2, 3, 4, 5]);
        assert!(MoodScale::Bad < MoodScale::Good);
    }

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("Great".parse::<MoodScale>().unwrap(), MoodScale::Great);
        assert_eq!(" neutral ".parse::<MoodScale>().unwrap(), MoodScale::Neutral);
        assert!("ecstatic".parse::<MoodScale>().is_err());
    }

    #[test]
    fn canonical_timestamp_is_noon_utc() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let ts = canonical_timestamp(day);
        assert_eq!(ts.to_rfc3339(), "2024-06-05T12:00:00+00:00");
        assert_eq!(ts.date_naive(), day);
    }

    #[test]
    fn day_range_is_inclusive_of_both_days() {
        let range = DayRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        );
        let first = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap().and_time(NaiveTime::MIN).and_utc();
        let last = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap().and_hms_opt(23, 59, 59).unwrap().and_utc();
        let after = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap().and_time(NaiveTime::MIN).and_utc();
        assert!(range.contains(first));
        assert!(range.contains(last));
        assert!(!range.contains(after));
    }

    #[test]
    fn rows_with_unknown_moods_are_rejected() {
        let row = MoodEntryRow {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            mood: "meh".into(),
            notes: None,
            mood_at: Utc::now(),
            created_at: Utc::now(),
        };
        assert!(MoodEntry::try_from(row).is_err());
    }
}

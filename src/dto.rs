//! Request/response shapes for the HTTP API.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Length limits are expressed via `validator` derive macros; field
//!   presence and format checks live in the `parse` helpers so the client
//!   gets the same messages regardless of which field is missing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::chat::ConversationMessage;
use crate::models::mood::{MoodEntry, MoodScale};

// ============================================================================
// Common
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
    pub message: String,
}

// ============================================================================
// Moods
// ============================================================================

/// POST /api/moods
#[derive(Debug, Deserialize, Validate)]
pub struct LogMoodRequest {
    pub mood: Option<String>,

    /// Calendar day, `yyyy-MM-dd`.
    pub date: Option<String>,

    #[validate(length(max = 5000, message = "Notes must be under 5000 characters"))]
    pub notes: Option<String>,
}

/// Fields of a mood log after validation.
#[derive(Debug)]
pub struct ValidMoodLog {
    pub mood: MoodScale,
    pub day: NaiveDate,
    pub notes: Option<String>,
}

impl LogMoodRequest {
    pub fn parse(self) -> Result<ValidMoodLog, AppError> {
        self.validate()?;

        let mood = self
            .mood
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::Validation("Mood is required.".into()))?
            .parse::<MoodScale>()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let raw_date = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppError::Validation("Date is required.".into()))?;
        let day = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date format.".into()))?;

        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(ValidMoodLog { mood, day, notes })
    }
}

#[derive(Debug, Serialize)]
pub struct LogMoodResponse {
    pub message: String,
    pub entry: MoodEntry,
}

/// GET /api/moods
#[derive(Debug, Deserialize)]
pub struct MoodHistoryQuery {
    /// Default 10, max 100.
    pub limit: Option<u32>,
}

impl MoodHistoryQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

// ============================================================================
// Chat
// ============================================================================

/// POST /api/chat
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message: String,

    /// Prior turns of this session; the stored transcript is used when absent.
    pub history: Option<Vec<ConversationMessage>>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub greeting: String,
}

/// GET /api/chat/history
#[derive(Debug, Deserialize)]
pub struct ChatHistoryQuery {
    pub limit: Option<u32>,
}

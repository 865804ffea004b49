use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::Identity;
use crate::dto::{
    BulkDeleteResponse, DeleteResponse, LogMoodRequest, LogMoodResponse, MoodHistoryQuery,
};
use crate::error::AppResult;
use crate::handlers::ws::notify_moods_changed;
use crate::models::mood::MoodEntry;
use crate::models::mood_style::{definition_views, MoodDefinitionView};
use crate::AppState;

pub async fn list_definitions() -> Json<Vec<MoodDefinitionView>> {
    Json(definition_views())
}

pub async fn log_mood(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<LogMoodRequest>,
) -> AppResult<Json<LogMoodResponse>> {
    let log = body.parse()?;
    let entry = MoodEntry::new(identity.user_id.clone(), log.mood, log.day, log.notes);

    state.moods.insert(entry.clone()).await?;
    tracing::info!(
        user_id = %identity.user_id,
        entry_id = %entry.id,
        mood = %entry.mood,
        day = %log.day,
        "Mood logged"
    );

    notify_moods_changed(&state, &identity.user_id);
    Ok(Json(LogMoodResponse {
        message: "Mood logged successfully!".into(),
        entry,
    }))
}

pub async fn list_moods(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<MoodHistoryQuery>,
) -> AppResult<Json<Vec<MoodEntry>>> {
    let entries = state.moods.recent(&identity.user_id, query.limit()).await?;
    Ok(Json(entries))
}

/// Idempotent: deleting a missing entry still reports success.
pub async fn delete_mood(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let removed = state.moods.delete_by_id(&identity.user_id, entry_id).await?;
    if removed {
        tracing::info!(user_id = %identity.user_id, entry_id = %entry_id, "Mood entry deleted");
        notify_moods_changed(&state, &identity.user_id);
    } else {
        tracing::debug!(user_id = %identity.user_id, entry_id = %entry_id, "Mood entry already absent");
    }

    Ok(Json(DeleteResponse { deleted: true, id: entry_id }))
}

pub async fn delete_all_moods(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<BulkDeleteResponse>> {
    let deleted = state.moods.delete_all(&identity.user_id).await?;
    tracing::info!(user_id = %identity.user_id, deleted, "All mood data deleted");

    let message = if deleted == 0 {
        "No mood data found to delete.".to_string()
    } else {
        notify_moods_changed(&state, &identity.user_id);
        "All mood data deleted successfully.".to_string()
    };
    Ok(Json(BulkDeleteResponse { deleted, message }))
}

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::Identity;
use crate::dto::{
    BulkDeleteResponse, ChatHistoryQuery, ChatRequest, ChatResponse, GreetingResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::chat::{ChatMessageEntry, ConversationMessage};
use crate::services::chat::{self, Speaker};
use crate::AppState;
use validator::Validate;

fn speaker(identity: &Identity) -> Speaker<'_> {
    Speaker {
        user_id: &identity.user_id,
        user_name: identity.display_name.as_deref(),
    }
}

pub async fn post_chat(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    body.validate()?;
    let llm = state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Chat is not configured".into()))?;

    let history: Vec<ConversationMessage> = match body.history {
        Some(history) => history,
        None => state
            .chats
            .recent(&identity.user_id, state.config.chat_history_limit)
            .await?
            .iter()
            .map(ConversationMessage::from)
            .collect(),
    };

    let reply = chat::respond(
        llm,
        state.moods.as_ref(),
        speaker(&identity),
        &history,
        &body.message,
        Utc::now().date_naive(),
    )
    .await?;

    // Transcript persistence is best-effort; the reply is still returned.
    for message in [
        ConversationMessage::user(body.message),
        ConversationMessage::assistant(reply.clone()),
    ] {
        if let Err(e) = state.chats.append(&identity.user_id, message).await {
            tracing::warn!(user_id = %identity.user_id, error = %e, "Failed to save chat message");
        }
    }

    Ok(Json(ChatResponse { response: reply }))
}

pub async fn get_greeting(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<GreetingResponse> {
    let greeting = chat::greeting(state.llm.as_ref(), state.chats.as_ref(), speaker(&identity)).await;
    Json(GreetingResponse { greeting })
}

pub async fn get_history(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ChatHistoryQuery>,
) -> AppResult<Json<Vec<ChatMessageEntry>>> {
    let limit = query
        .limit
        .unwrap_or(state.config.chat_history_limit)
        .clamp(1, 200);
    let messages = state.chats.recent(&identity.user_id, limit).await?;
    Ok(Json(messages))
}

pub async fn delete_history(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<BulkDeleteResponse>> {
    let deleted = state.chats.clear(&identity.user_id).await?;
    tracing::info!(user_id = %identity.user_id, deleted, "Chat history deleted");

    let message = if deleted == 0 {
        "No chat history found to delete."
    } else {
        "All chat history deleted successfully."
    };
    Ok(Json(BulkDeleteResponse {
        deleted,
        message: message.into(),
    }))
}

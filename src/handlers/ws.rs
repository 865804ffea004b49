use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    user_id: Option<String>,
}

/// Tells a user's open dashboards that their mood data changed.
pub fn notify_moods_changed(state: &AppState, user_id: &str) {
    let msg = json!({
        "type": "moods_changed",
        "user_id": user_id,
    });
    // No subscribers is not an error.
    let _ = state.ws_tx.send(msg.to_string());
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> Response {
    let Some(user_id) = query.user_id.filter(|id| !id.trim().is_empty()) else {
        tracing::warn!("WebSocket connection without user_id");
        return (StatusCode::UNPROCESSABLE_ENTITY, "User ID is required.").into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

fn is_for_user(raw: &str, user_id: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| v.get("user_id").and_then(|u| u.as_str()).map(|u| u == user_id))
        .unwrap_or(false)
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: String) {
    let (mut sender, mut receiver) = socket.split();
    tracing::debug!(user_id = %user_id, "WebSocket connection established");

    let mut rx = state.ws_tx.subscribe();

    let uid = user_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            if !is_for_user(&msg, &uid) {
                continue;
            }
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    let uid = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    tracing::debug!(user_id = %uid, message = %text, "WebSocket message received");
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!(user_id = %user_id, "WebSocket connection closed");
}

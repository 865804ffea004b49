use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{require_identity, USER_ID_HEADER, USER_NAME_HEADER};
use crate::auth::rate_limit::rate_limit_chat;
use crate::handlers;
use crate::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&state.config.frontend_url)
        .chain(state.config.cors_extra_origins.iter())
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_NAME_HEADER),
        ])
        .allow_credentials(true)
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/ws", get(handlers::ws::ws_handler));

    let chat_routes = Router::new()
        .route("/api/chat", post(handlers::chat::post_chat))
        .route("/api/chat/greeting", get(handlers::chat::get_greeting))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_chat));

    let api_routes = Router::new()
        .route("/api/moods/definitions", get(handlers::moods::list_definitions))
        .route(
            "/api/moods",
            post(handlers::moods::log_mood)
                .get(handlers::moods::list_moods)
                .delete(handlers::moods::delete_all_moods),
        )
        .route("/api/moods/:id", delete(handlers::moods::delete_mood))
        .route("/api/trends", get(handlers::trends::get_trends))
        .route("/api/charts", get(handlers::trends::get_chart))
        .route(
            "/api/chat/history",
            get(handlers::chat::get_history).delete(handlers::chat::delete_history),
        )
        .merge(chat_routes)
        .layer(middleware::from_fn(require_identity));

    let cors = cors_layer(&state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

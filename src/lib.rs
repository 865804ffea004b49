use std::sync::Arc;
use tokio::sync::broadcast;

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use db::memory::{MemoryChatStore, MemoryMoodStore};
use db::{ChatStore, MoodStore};
use services::llm::ClaudeClient;

pub use app::router;

#[derive(Clone)]
pub struct AppState {
    pub moods: Arc<dyn MoodStore>,
    pub chats: Arc<dyn ChatStore>,
    pub config: Arc<Config>,
    /// `None` when no model API key is configured.
    pub llm: Option<ClaudeClient>,
    pub ws_tx: broadcast::Sender<String>,
    pub rate_limiter: RateLimitState,
}

impl AppState {
    pub fn new(
        config: Config,
        moods: Arc<dyn MoodStore>,
        chats: Arc<dyn ChatStore>,
    ) -> anyhow::Result<Self> {
        let llm = if config.chat_enabled() {
            Some(ClaudeClient::new(
                config.claude_api_url.clone(),
                config.claude_api_key.clone(),
                config.claude_model.clone(),
            )?)
        } else {
            tracing::warn!("CLAUDE_API_KEY not set; chat replies are disabled and greetings fall back");
            None
        };

        let (ws_tx, _) = broadcast::channel::<String>(256);
        let rate_limiter = RateLimitState::new(config.chat_rate_limit_per_minute);

        Ok(Self {
            moods,
            chats,
            config: Arc::new(config),
            llm,
            ws_tx,
            rate_limiter,
        })
    }

    pub fn in_memory(config: Config) -> anyhow::Result<Self> {
        Self::new(
            config,
            Arc::new(MemoryMoodStore::new()),
            Arc::new(MemoryChatStore::new()),
        )
    }
}

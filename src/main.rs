use anyhow::Context;
use std::sync::Arc;

use mindful_api::config::Config;
use mindful_api::db::{self, memory, postgres};
use mindful_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindful_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::pool::create_pool(url)
                .await
                .context("Failed to create database pool")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            AppState::new(
                config.clone(),
                Arc::new(postgres::PgMoodStore::new(pool.clone())),
                Arc::new(postgres::PgChatStore::new(pool)),
            )?
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data will not persist");
            AppState::new(
                config.clone(),
                Arc::new(memory::MemoryMoodStore::new()),
                Arc::new(memory::MemoryChatStore::new()),
            )?
        }
    };

    state.rate_limiter.spawn_cleanup();

    let app = mindful_api::router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::auth::middleware::Identity;
use crate::error::AppError;
use crate::AppState;

/// Per-user chat budget over a fixed window. State is process-local.
#[derive(Clone)]
pub struct RateLimitState {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_requests: u32,
    window: Duration,
}

struct Window {
    used: u32,
    opened: Instant,
}

impl RateLimitState {
    pub fn new(max_requests: u32) -> Self {
        Self::with_window(max_requests, Duration::from_secs(60))
    }

    pub fn with_window(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Ok(remaining) or Err(retry_after).
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let slot = windows
            .entry(key.to_string())
            .or_insert(Window { used: 0, opened: now });

        let elapsed = now.duration_since(slot.opened);
        if elapsed > self.window {
            *slot = Window { used: 0, opened: now };
        } else if slot.used >= self.max_requests {
            return Err(self.window.saturating_sub(elapsed));
        }

        slot.used += 1;
        Ok(self.max_requests - slot.used)
    }

    /// Forgets windows that closed at least one full window ago.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let horizon = self.window * 2;
        self.windows
            .lock()
            .await
            .retain(|_, w| now.duration_since(w.opened) < horizon);
    }

    pub fn spawn_cleanup(&self) {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window * 5);
            loop {
                ticker.tick().await;
                limiter.cleanup().await;
            }
        });
    }
}

/// Limits chat endpoints, which each cost a model call.
pub async fn rate_limit_chat(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = format!("chat:{}", identity.user_id);

    match state.rate_limiter.check(&key).await {
        Ok(remaining) => {
            tracing::debug!(user_id = %identity.user_id, remaining, "Chat rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                user_id = %identity.user_id,
                retry_after_secs = retry_after.as_secs(),
                "Chat rate limit exceeded"
            );
            Err(AppError::RateLimited)
        }
    }
}

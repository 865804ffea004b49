#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use mindful_api::config::Config;
use mindful_api::db::memory::MemoryChatStore;
use mindful_api::db::{MoodStore, StoreResult};
use mindful_api::models::mood::{DayRange, MoodEntry};
use mindful_api::AppState;

/// Mood store that fails every call, as a database outage would.
pub struct DownMoodStore;

fn outage<T>() -> StoreResult<T> {
    Err(sqlx::Error::PoolTimedOut.into())
}

#[async_trait]
impl MoodStore for DownMoodStore {
    async fn query(&self, _: &str, _: DayRange) -> StoreResult<Vec<MoodEntry>> {
        outage()
    }
    async fn recent(&self, _: &str, _: u32) -> StoreResult<Vec<MoodEntry>> {
        outage()
    }
    async fn insert(&self, _: MoodEntry) -> StoreResult<Uuid> {
        outage()
    }
    async fn delete_by_id(&self, _: &str, _: Uuid) -> StoreResult<bool> {
        outage()
    }
    async fn delete_all(&self, _: &str) -> StoreResult<u64> {
        outage()
    }
    async fn ping(&self) -> StoreResult<()> {
        outage()
    }
}

pub fn app_with_broken_store() -> Router {
    let state = AppState::new(
        Config::default(),
        Arc::new(DownMoodStore),
        Arc::new(MemoryChatStore::new()),
    )
    .expect("state");
    mindful_api::router(state)
}

pub fn app_with(config: Config) -> Router {
    let state = AppState::in_memory(config).expect("state");
    mindful_api::router(state)
}

pub fn app() -> Router {
    app_with(Config::default())
}

pub fn get(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-user-id", user)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, user: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-user-id", user)
        .header("x-user-name", "Sam")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

//! Storage seams. Handlers and services only see the traits below; the
//! PostgreSQL and in-memory backends live in their own modules.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::chat::{ChatMessageEntry, ConversationMessage};
use crate::models::mood::{DayRange, MoodEntry, UnknownMood};

pub mod memory;
pub mod pool;
pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(#[from] UnknownMood),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait MoodStore: Send + Sync {
    /// Entries whose day falls inside `range`, ascending by timestamp.
    async fn query(&self, user_id: &str, range: DayRange) -> StoreResult<Vec<MoodEntry>>;

    /// Most recent entries first.
    async fn recent(&self, user_id: &str, limit: u32) -> StoreResult<Vec<MoodEntry>>;

    async fn insert(&self, entry: MoodEntry) -> StoreResult<Uuid>;

    /// Returns whether an entry owned by `user_id` was removed.
    async fn delete_by_id(&self, user_id: &str, id: Uuid) -> StoreResult<bool>;

    /// Removes every entry of the user in one atomic step; returns the count.
    async fn delete_all(&self, user_id: &str) -> StoreResult<u64>;

    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    /// The last `limit` messages, oldest first.
    async fn recent(&self, user_id: &str, limit: u32) -> StoreResult<Vec<ChatMessageEntry>>;

    async fn append(&self, user_id: &str, message: ConversationMessage) -> StoreResult<Uuid>;

    async fn clear(&self, user_id: &str) -> StoreResult<u64>;
}

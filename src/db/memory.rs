//! In-process store used when no `DATABASE_URL` is configured, and by tests.
//! State lives behind one mutex per collection, so bulk deletes are atomic.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ChatStore, MoodStore, StoreResult};
use crate::models::chat::{ChatMessageEntry, ConversationMessage};
use crate::models::mood::{DayRange, MoodEntry};

#[derive(Clone, Default)]
pub struct MemoryMoodStore {
    entries: Arc<Mutex<Vec<MoodEntry>>>,
}

impl MemoryMoodStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MoodStore for MemoryMoodStore {
    async fn query(&self, user_id: &str, range: DayRange) -> StoreResult<Vec<MoodEntry>> {
        let entries = self.entries.lock().await;
        let mut found: Vec<MoodEntry> = entries
            .iter()
            .filter(|e| e.user_id == user_id && range.contains(e.timestamp))
            .cloned()
            .collect();
        found.sort_by_key(|e| e.timestamp);
        Ok(found)
    }

    async fn recent(&self, user_id: &str, limit: u32) -> StoreResult<Vec<MoodEntry>> {
        let entries = self.entries.lock().await;
        let mut found: Vec<MoodEntry> = entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn insert(&self, entry: MoodEntry) -> StoreResult<Uuid> {
        let id = entry.id;
        self.entries.lock().await.push(entry);
        Ok(id)
    }

    async fn delete_by_id(&self, user_id: &str, id: Uuid) -> StoreResult<bool> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(entries.len() < before)
    }

    async fn delete_all(&self, user_id: &str) -> StoreResult<u64> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| e.user_id != user_id);
        Ok((before - entries.len()) as u64)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryChatStore {
    messages: Arc<Mutex<HashMap<String, Vec<ChatMessageEntry>>>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn recent(&self, user_id: &str, limit: u32) -> StoreResult<Vec<ChatMessageEntry>> {
        let messages = self.messages.lock().await;
        let Some(history) = messages.get(user_id) else {
            return Ok(Vec::new());
        };
        let skip = history.len().saturating_sub(limit as usize);
        Ok(history[skip..].to_vec())
    }

    async fn append(&self, user_id: &str, message: ConversationMessage) -> StoreResult<Uuid> {
        let entry = ChatMessageEntry {
            id: Uuid::new_v4(),
            role: message.role,
            content: message.content,
            timestamp: Utc::now(),
        };
        let id = entry.id;
        self.messages
            .lock()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(entry);
        Ok(id)
    }

    async fn clear(&self, user_id: &str) -> StoreResult<u64> {
        let removed = self.messages.lock().await.remove(user_id);
        Ok(removed.map(|h| h.len() as u64).unwrap_or(0))
    }
}

/// Mood store whose every call fails as if the pool were exhausted.
#[cfg(test)]
pub(crate) struct UnavailableMoodStore;

#[cfg(test)]
fn pool_timeout<T>() -> StoreResult<T> {
    Err(sqlx::Error::PoolTimedOut.into())
}

#[cfg(test)]
#[async_trait]
impl MoodStore for UnavailableMoodStore {
    async fn query(&self, _: &str, _: DayRange) -> StoreResult<Vec<MoodEntry>> {
        pool_timeout()
    }

    async fn recent(&self, _: &str, _: u32) -> StoreResult<Vec<MoodEntry>> {
        pool_timeout()
    }

    async fn insert(&self, _: MoodEntry) -> StoreResult<Uuid> {
        pool_timeout()
    }

    async fn delete_by_id(&self, _: &str, _: Uuid) -> StoreResult<bool> {
        pool_timeout()
    }

    async fn delete_all(&self, _: &str) -> StoreResult<u64> {
        pool_timeout()
    }

    async fn ping(&self) -> StoreResult<()> {
        pool_timeout()
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ChatStore, MoodStore, StoreResult};
use crate::models::chat::{ChatMessageEntry, ChatMessageRow, ConversationMessage};
use crate::models::mood::{DayRange, MoodEntry, MoodEntryRow};

#[derive(Clone)]
pub struct PgMoodStore {
    db: PgPool,
}

impl PgMoodStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_entries(rows: Vec<MoodEntryRow>) -> StoreResult<Vec<MoodEntry>> {
    rows.into_iter()
        .map(|row| MoodEntry::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl MoodStore for PgMoodStore {
    async fn query(&self, user_id: &str, range: DayRange) -> StoreResult<Vec<MoodEntry>> {
        let (start, end) = range.bounds();
        let rows = sqlx::query_as::<_, MoodEntryRow>(
            r#"
            SELECT id, user_id, mood, notes, mood_at, created_at FROM mood_entries
            WHERE user_id = $1 AND mood_at >= $2 AND mood_at < $3
            ORDER BY mood_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        into_entries(rows)
    }

    async fn recent(&self, user_id: &str, limit: u32) -> StoreResult<Vec<MoodEntry>> {
        let rows = sqlx::query_as::<_, MoodEntryRow>(
            r#"
            SELECT id, user_id, mood, notes, mood_at, created_at FROM mood_entries
            WHERE user_id = $1
            ORDER BY mood_at DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.db)
        .await?;

        into_entries(rows)
    }

    async fn insert(&self, entry: MoodEntry) -> StoreResult<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO mood_entries (id, user_id, mood, notes, mood_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(entry.id)
        .bind(&entry.user_id)
        .bind(entry.mood.as_str())
        .bind(&entry.notes)
        .bind(entry.timestamp)
        .bind(entry.created_at)
        .fetch_one(&self.db)
        .await?;

        Ok(id)
    }

    async fn delete_by_id(&self, user_id: &str, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM mood_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, user_id: &str) -> StoreResult<u64> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query("DELETE FROM mood_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgChatStore {
    db: PgPool,
}

impl PgChatStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn recent(&self, user_id: &str, limit: u32) -> StoreResult<Vec<ChatMessageEntry>> {
        let rows = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT id, role, content, created_at FROM (
                SELECT id, role, content, created_at, seq FROM chat_messages
                WHERE user_id = $1
                ORDER BY seq DESC
                LIMIT $2
            ) latest
            ORDER BY seq ASC
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.db)
        .await?;

        let entries = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                let entry = row.into_entry();
                if entry.is_none() {
                    tracing::warn!(message_id = %id, "Skipping chat message with unknown role");
                }
                entry
            })
            .collect();
        Ok(entries)
    }

    async fn append(&self, user_id: &str, message: ConversationMessage) -> StoreResult<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO chat_messages (id, user_id, role, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .fetch_one(&self.db)
        .await?;

        Ok(id)
    }

    async fn clear(&self, user_id: &str) -> StoreResult<u64> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query("DELETE FROM chat_messages WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }
}

//! Message store.
//!
//! Durable append-only log of chat messages, partitioned by room.

use chrono::{DateTime, Utc};

use super::message::{Message, NewMessage, Role, RoomKey};
use crate::db::{self, DbPool};
use crate::{Result, RevdashError};

/// Database row type for Message.
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    owner: String,
    repo: String,
    pr: i64,
    author: String,
    role: String,
    content: String,
    created_at: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = RevdashError;

    fn try_from(row: MessageRow) -> Result<Self> {
        let role: Role = row.role.parse().map_err(|_| {
            RevdashError::Database(format!("message {} has unknown role {:?}", row.id, row.role))
        })?;

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                RevdashError::Database(format!("message {} has bad created_at: {}", row.id, e))
            })?;

        Ok(Self {
            id: row.id,
            owner: row.owner,
            repo: row.repo,
            pr: row.pr,
            author: row.author,
            role,
            content: row.content,
            created_at,
        })
    }
}

/// Store for chat messages.
///
/// Cheap to clone; clones share the underlying pool.
#[derive(Clone)]
pub struct MessageStore {
    pool: DbPool,
}

impl MessageStore {
    /// Create a store over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Ensure the message table exists. Safe to call any number of times.
    pub async fn initialize(&self) -> Result<()> {
        db::migrate(&self.pool).await
    }

    /// Persist one message and return its id.
    ///
    /// Content is stored as given; callers trim beforehand if they need to.
    pub async fn append(&self, key: &RoomKey, message: &NewMessage) -> Result<i64> {
        let created_at = Utc::now().to_rfc3339();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO messages (owner, repo, pr, author, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&key.owner)
        .bind(&key.repo)
        .bind(key.pr)
        .bind(&message.author)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(&created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// List up to `limit` messages for a room.
    ///
    /// Returns the most recent messages in chronological (ascending id) order.
    pub async fn list(&self, key: &RoomKey, limit: u32) -> Result<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, owner, repo, pr, author, role, content, created_at
            FROM messages
            WHERE owner = $1 AND repo = $2 AND pr = $3
            ORDER BY id DESC
            LIMIT $4
            "#,
        )
        .bind(&key.owner)
        .bind(&key.repo)
        .bind(key.pr)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().rev().map(Message::try_from).collect()
    }

    /// Delete every message in a room. Returns the number of deleted rows.
    pub async fn clear(&self, key: &RoomKey) -> Result<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE owner = $1 AND repo = $2 AND pr = $3")
            .bind(&key.owner)
            .bind(&key.repo)
            .bind(key.pr)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count messages in a room.
    pub async fn count(&self, key: &RoomKey) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE owner = $1 AND repo = $2 AND pr = $3",
        )
        .bind(&key.owner)
        .bind(&key.repo)
        .bind(key.pr)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

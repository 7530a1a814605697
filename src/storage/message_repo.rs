use crate::domain::message::{Message, NewMessage};
use crate::error::{AppError, Result};
use crate::storage::records::Message as MessageRecord;
use crate::storage::{DbPool, MessageRepository};
use async_trait::async_trait;
use uuid::Uuid;

const UNIQUE_TITLE: &str = "Title must be unique per organization";

#[derive(Clone, Debug)]
pub struct PgMessageRepository {
    pool: DbPool,
}

impl PgMessageRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// The `(organization_id, title)` index is the last line of defence when two
/// writers race past the logic-level check.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(UNIQUE_TITLE.to_string()),
        other => AppError::Database(other),
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn list_by_organization(&self, organization_id: Uuid) -> Result<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r"
            SELECT id, organization_id, title, content, is_active, updated_at
            FROM messages
            WHERE organization_id = $1
            ",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, organization_id: Uuid, id: Uuid) -> Result<Option<Message>> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            SELECT id, organization_id, title, content, is_active, updated_at
            FROM messages
            WHERE organization_id = $1 AND id = $2
            ",
        )
        .bind(organization_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn find_by_title(&self, organization_id: Uuid, title: &str) -> Result<Option<Message>> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            SELECT id, organization_id, title, content, is_active, updated_at
            FROM messages
            WHERE organization_id = $1 AND title = $2
            ",
        )
        .bind(organization_id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn create(&self, message: NewMessage) -> Result<Message> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            INSERT INTO messages (organization_id, title, content, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organization_id, title, content, is_active, updated_at
            ",
        )
        .bind(message.organization_id)
        .bind(&message.title)
        .bind(&message.content)
        .bind(message.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(record.into())
    }

    async fn update(&self, message: &Message) -> Result<()> {
        sqlx::query(
            r"
            UPDATE messages
            SET title = $3, content = $4, is_active = $5, updated_at = $6
            WHERE organization_id = $1 AND id = $2
            ",
        )
        .bind(message.organization_id)
        .bind(message.id)
        .bind(&message.title)
        .bind(&message.content)
        .bind(message.is_active)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn delete(&self, organization_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE organization_id = $1 AND id = $2")
            .bind(organization_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

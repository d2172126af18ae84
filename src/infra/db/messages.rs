use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{MessagesRepo, RepoError};
use crate::domain::entities::MessageRecord;
use crate::domain::messages::NewMessage;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    username: String,
    content: String,
    created_at: OffsetDateTime,
}

impl From<MessageRow> for MessageRecord {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl MessagesRepo for PostgresRepositories {
    async fn insert_message(&self, message: &NewMessage) -> Result<MessageRecord, RepoError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (username, content)
            VALUES ($1, $2)
            RETURNING id, username, content, created_at
            "#,
        )
        .bind(message.username())
        .bind(message.content())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn count_messages(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn list_messages(&self, skip: u64, limit: u32) -> Result<Vec<MessageRecord>, RepoError> {
        // Postgres offsets are signed; anything larger is past the end anyway.
        let Ok(offset) = i64::try_from(skip) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, username, content, created_at
            FROM messages
            ORDER BY seq DESC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(MessageRecord::from).collect())
    }

    async fn delete_all_messages(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM messages")
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        PostgresRepositories::health_check(self)
            .await
            .map_err(map_sqlx_error)
    }

    async fn close(&self) {
        self.pool().close().await;
    }
}

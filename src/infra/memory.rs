//! In-process message store.
//!
//! Holds messages in insertion order behind a tokio mutex. Used by tests and
//! by `serve` when no database URL is configured; contents do not survive a
//! restart.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::repos::{MessagesRepo, RepoError};
use crate::domain::entities::MessageRecord;
use crate::domain::messages::NewMessage;

#[derive(Default)]
pub struct InMemoryMessages {
    // Oldest first; readers walk it backwards.
    messages: Mutex<Vec<MessageRecord>>,
}

impl InMemoryMessages {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagesRepo for InMemoryMessages {
    async fn insert_message(&self, message: &NewMessage) -> Result<MessageRecord, RepoError> {
        let record = MessageRecord {
            id: Uuid::new_v4(),
            username: message.username().to_string(),
            content: message.content().to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.messages.lock().await.push(record.clone());
        Ok(record)
    }

    async fn count_messages(&self) -> Result<u64, RepoError> {
        let len = self.messages.lock().await.len();
        u64::try_from(len).map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    async fn list_messages(&self, skip: u64, limit: u32) -> Result<Vec<MessageRecord>, RepoError> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let messages = self.messages.lock().await;
        Ok(messages.iter().rev().skip(skip).take(limit).cloned().collect())
    }

    async fn delete_all_messages(&self) -> Result<u64, RepoError> {
        let mut messages = self.messages.lock().await;
        let removed = messages.len();
        messages.clear();
        u64::try_from(removed)
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }
}

//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::MessageRecord;
use crate::domain::messages::NewMessage;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Durable, insertion-ordered message storage.
#[async_trait]
pub trait MessagesRepo: Send + Sync {
    /// Persist a message; the store assigns its id and timestamp.
    async fn insert_message(&self, message: &NewMessage) -> Result<MessageRecord, RepoError>;

    async fn count_messages(&self) -> Result<u64, RepoError>;

    /// Up to `limit` messages, newest first, after skipping the `skip` newest.
    /// Returns an empty list when `skip` is past the end.
    async fn list_messages(&self, skip: u64, limit: u32) -> Result<Vec<MessageRecord>, RepoError>;

    /// Remove every message and report how many were removed.
    async fn delete_all_messages(&self) -> Result<u64, RepoError>;

    async fn health_check(&self) -> Result<(), RepoError> {
        Ok(())
    }

    /// Release backend resources. Calls after `close` may fail.
    async fn close(&self) {}
}

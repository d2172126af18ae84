use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::application::repos::MessagesRepo;
use crate::cache::PageCache;
use crate::domain::entities::MessageRecord;
use crate::domain::messages::NewMessage;

use super::types::{BoardError, PostMessageCommand};

const SOURCE: &str = "application::board::BoardWriter";

/// Writes to the store, then flushes the whole page cache.
///
/// The store write always completes before the flush starts. A reader that
/// read the store before the flush cannot cache what it read: the flush
/// advances the cache generation and the reader's conditional set is refused.
/// Stale pages are only served between the insert and the flush.
#[derive(Clone)]
pub struct BoardWriter {
    messages: Arc<dyn MessagesRepo>,
    cache: Option<Arc<dyn PageCache>>,
}

impl BoardWriter {
    pub fn new(messages: Arc<dyn MessagesRepo>) -> Self {
        Self {
            messages,
            cache: None,
        }
    }

    pub fn with_cache(self, cache: Arc<dyn PageCache>) -> Self {
        self.with_cache_opt(Some(cache))
    }

    pub fn with_cache_opt(mut self, cache: Option<Arc<dyn PageCache>>) -> Self {
        self.cache = cache;
        self
    }

    /// Validate and store a message. Invalid input never reaches the store.
    #[instrument(skip_all, fields(board.op = "post_message"))]
    pub async fn post_message(
        &self,
        command: PostMessageCommand,
    ) -> Result<MessageRecord, BoardError> {
        let message = NewMessage::new(command.username, command.content)?;

        let record = self
            .messages
            .insert_message(&message)
            .await
            .map_err(|err| BoardError::store("insert_message", err))?;

        self.invalidate("post_message").await?;

        info!(
            target = SOURCE,
            message_id = %record.id,
            username = %record.username,
            "message posted"
        );
        Ok(record)
    }

    /// Delete every message. Safe to repeat; a second call removes nothing.
    #[instrument(skip_all, fields(board.op = "clear_all"))]
    pub async fn clear_all(&self) -> Result<u64, BoardError> {
        let deleted = self
            .messages
            .delete_all_messages()
            .await
            .map_err(|err| BoardError::store("delete_all_messages", err))?;

        self.invalidate("clear_all").await?;

        info!(target = SOURCE, deleted, "messages cleared");
        Ok(deleted)
    }

    async fn invalidate(&self, operation: &'static str) -> Result<(), BoardError> {
        let Some(cache) = self.cache.as_ref() else {
            return Ok(());
        };

        cache.flush().await.map_err(|err| {
            error!(
                target = SOURCE,
                operation,
                error = %err,
                "page cache flush failed after store write; cached pages may be stale"
            );
            BoardError::cache("flush", err)
        })
    }
}

use thiserror::Error;

use crate::application::pagination::OffsetPage;
use crate::application::repos::RepoError;
use crate::cache::CacheError;
use crate::domain::entities::MessageRecord;
use crate::domain::error::DomainError;

/// A page of messages, newest first.
pub type MessagePage = OffsetPage<MessageRecord>;

/// Errors surfaced to callers of the board services.
///
/// Callers see one `BackendUnavailable` condition whether the store or the
/// cache failed; the source chain keeps the distinction for logs.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("service unavailable: {operation} failed")]
    BackendUnavailable {
        operation: &'static str,
        #[source]
        source: BackendFailure,
    },
}

#[derive(Debug, Error)]
pub enum BackendFailure {
    #[error(transparent)]
    Store(#[from] RepoError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl BoardError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn store(operation: &'static str, err: RepoError) -> Self {
        Self::BackendUnavailable {
            operation,
            source: BackendFailure::Store(err),
        }
    }

    pub(crate) fn cache(operation: &'static str, err: CacheError) -> Self {
        Self::BackendUnavailable {
            operation,
            source: BackendFailure::Cache(err),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<DomainError> for BoardError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Validation { message } => Self::InvalidInput(message),
        }
    }
}

/// Input of `BoardWriter::post_message`, already normalized from whichever
/// wire format carried it.
#[derive(Debug, Clone, Default)]
pub struct PostMessageCommand {
    pub username: Option<String>,
    pub content: Option<String>,
}

impl PostMessageCommand {
    pub fn new(username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            content: Some(content.into()),
        }
    }
}

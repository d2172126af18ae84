//! Validated input for new messages.

use super::error::DomainError;

/// A message that passed validation and may be handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    username: String,
    content: String,
}

impl NewMessage {
    /// Both fields must be present and contain something other than whitespace.
    pub fn new(username: Option<String>, content: Option<String>) -> Result<Self, DomainError> {
        let username = require_text("username", username)?;
        let content = require_text("content", content)?;
        Ok(Self { username, content })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

fn require_text(field: &'static str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(DomainError::validation(format!("{field} must not be empty"))),
        None => Err(DomainError::validation(format!("{field} is required"))),
    }
}

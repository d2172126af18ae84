//! Wire types for the noticeboard HTTP API.
//!
//! The server and any client (the chat bot, scripts) share these so that the
//! JSON contract lives in one place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default page number when the query omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the query omits `per_page`.
pub const DEFAULT_PER_PAGE: u32 = 5;

/// A single message as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: Uuid,
    pub username: String,
    pub content: String,
}

/// Query string of the page listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of messages, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePageResponse {
    pub messages: Vec<MessageView>,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

/// Body accepted by the create endpoint, either form-encoded or JSON.
///
/// Both fields are optional on the wire so that a missing field reaches the
/// service as a validation failure instead of a decoder rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedMessageResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearMessagesResponse {
    pub message: String,
    pub deleted: u64,
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

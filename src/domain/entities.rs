//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored message. The store assigns `id` and `created_at` at insert time;
/// nothing mutates a record afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: OffsetDateTime,
}

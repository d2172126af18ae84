//! Serialized page snapshots stored as cache values.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::entities::MessageRecord;

use super::store::CacheError;

/// What a cache entry holds: the page's messages and the store size observed
/// when they were read, so a hit can report the page count of that moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub messages: Vec<MessageRecord>,
    pub total_count: u64,
}

impl PageSnapshot {
    pub fn encode(&self) -> Result<Bytes, CacheError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|err| CacheError::Codec(err.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CacheError> {
        serde_json::from_slice(bytes).map_err(|err| CacheError::Codec(err.to_string()))
    }
}

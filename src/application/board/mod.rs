//! Read and write services for the message feed.
//!
//! [`BoardReader`] serves pages through the read-through cache and
//! [`BoardWriter`] writes to the store and then flushes the cache. Neither
//! depends on a transport; the HTTP adapter and the CLI call them directly.

mod commands;
mod queries;
pub mod types;

pub use commands::BoardWriter;
pub use queries::{BoardReader, DEFAULT_MAX_PER_PAGE};
pub use types::{BackendFailure, BoardError, MessagePage, PostMessageCommand};

//! Page cache for the message feed.
//!
//! Pages are cached whole, keyed by `(page, per_page)`, and the cache is
//! flushed wholesale after every write: one insert shifts every page window
//! by one position, so no cached page survives a write.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enable_page_cache = true
//! page_limit = 256
//! ```

mod config;
mod keys;
mod lock;
mod snapshot;
mod store;

pub use config::CacheConfig;
pub use keys::PageKey;
pub use snapshot::PageSnapshot;
pub use store::{CacheError, LruPageCache, PageCache};


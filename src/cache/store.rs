//! Page cache port and its in-process LRU implementation.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use metrics::counter;
use thiserror::Error;

use super::config::CacheConfig;
use super::keys::PageKey;
use super::lock::{rw_read, rw_write};

pub(crate) const METRIC_CACHE_HIT: &str = "noticeboard_cache_page_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "noticeboard_cache_page_miss_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "noticeboard_cache_page_evict_total";
pub(crate) const METRIC_CACHE_FLUSH: &str = "noticeboard_cache_flush_total";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache entry could not be encoded or decoded: {0}")]
    Codec(String),
}

/// Key-value store for serialized pages.
///
/// Entries never expire on their own; they live until `flush` removes every
/// entry at once. Every flush advances the cache's generation, which lets a
/// reader populate a page only if no flush happened since it started reading
/// the store.
#[async_trait]
pub trait PageCache: Send + Sync {
    async fn get(&self, key: &PageKey) -> Result<Option<Bytes>, CacheError>;

    /// Store or overwrite the entry for `key`.
    async fn set(&self, key: PageKey, value: Bytes) -> Result<(), CacheError>;

    /// Current flush generation.
    async fn generation(&self) -> Result<u64, CacheError>;

    /// Store the entry only while the cache is still at `generation`.
    ///
    /// Returns `false`, storing nothing, when a flush has happened since
    /// `generation` was read. The check and the store are atomic with
    /// respect to `flush`.
    async fn set_if_current(
        &self,
        key: PageKey,
        value: Bytes,
        generation: u64,
    ) -> Result<bool, CacheError>;

    /// Remove every entry for every key and advance the generation.
    async fn flush(&self) -> Result<(), CacheError>;

    async fn close(&self) {}
}

/// In-process page cache bounded by LRU eviction.
pub struct LruPageCache {
    pages: RwLock<LruCache<PageKey, Bytes>>,
    // Only advanced while the `pages` write lock is held.
    generation: AtomicU64,
}

impl LruPageCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            pages: RwLock::new(LruCache::new(config.page_limit_non_zero())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.pages, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PageCache for LruPageCache {
    async fn get(&self, key: &PageKey) -> Result<Option<Bytes>, CacheError> {
        // LRU lookups reorder entries, hence the write lock.
        let value = rw_write(&self.pages, "get").get(key).cloned();
        match value {
            Some(_) => counter!(METRIC_CACHE_HIT).increment(1),
            None => counter!(METRIC_CACHE_MISS).increment(1),
        }
        Ok(value)
    }

    async fn set(&self, key: PageKey, value: Bytes) -> Result<(), CacheError> {
        push_page(&mut rw_write(&self.pages, "set"), key, value);
        Ok(())
    }

    async fn generation(&self) -> Result<u64, CacheError> {
        Ok(self.generation.load(Ordering::Acquire))
    }

    async fn set_if_current(
        &self,
        key: PageKey,
        value: Bytes,
        generation: u64,
    ) -> Result<bool, CacheError> {
        let mut pages = rw_write(&self.pages, "set_if_current");
        if self.generation.load(Ordering::Acquire) != generation {
            return Ok(false);
        }
        push_page(&mut pages, key, value);
        Ok(true)
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut pages = rw_write(&self.pages, "flush");
        pages.clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
        drop(pages);
        counter!(METRIC_CACHE_FLUSH).increment(1);
        Ok(())
    }

    async fn close(&self) {
        rw_write(&self.pages, "close").clear();
    }
}

fn push_page(pages: &mut LruCache<PageKey, Bytes>, key: PageKey, value: Bytes) {
    if let Some((evicted, _)) = pages.push(key, value)
        && evicted != key
    {
        counter!(METRIC_CACHE_EVICT).increment(1);
    }
}

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, instrument, warn};

use crate::application::pagination::{OffsetPage, paginate, total_pages};
use crate::application::repos::MessagesRepo;
use crate::cache::{PageCache, PageKey, PageSnapshot};

use super::types::{BoardError, MessagePage};

pub(crate) const METRIC_CACHE_FALLBACK: &str = "noticeboard_cache_fallback_total";
pub(crate) const METRIC_STORE_PAGE_MS: &str = "noticeboard_store_page_ms";

/// Upper bound applied to `per_page` unless configured otherwise.
pub const DEFAULT_MAX_PER_PAGE: u32 = 100;

const SOURCE: &str = "application::board::BoardReader";

/// Serves message pages through the read-through page cache.
#[derive(Clone)]
pub struct BoardReader {
    messages: Arc<dyn MessagesRepo>,
    cache: Option<Arc<dyn PageCache>>,
    max_per_page: u32,
}

impl BoardReader {
    pub fn new(messages: Arc<dyn MessagesRepo>) -> Self {
        Self {
            messages,
            cache: None,
            max_per_page: DEFAULT_MAX_PER_PAGE,
        }
    }

    pub fn with_cache(self, cache: Arc<dyn PageCache>) -> Self {
        self.with_cache_opt(Some(cache))
    }

    pub fn with_cache_opt(mut self, cache: Option<Arc<dyn PageCache>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_max_per_page(mut self, max_per_page: u32) -> Self {
        self.max_per_page = max_per_page.max(1);
        self
    }

    /// Load `page` (1-based) of `per_page` messages, newest first.
    ///
    /// `per_page` above the configured maximum is clamped. A page past the
    /// end is an empty page, not an error.
    #[instrument(skip(self), fields(board.op = "page"))]
    pub async fn page(&self, page: u32, per_page: u32) -> Result<MessagePage, BoardError> {
        if page == 0 {
            return Err(BoardError::invalid("page must be at least 1"));
        }
        if per_page == 0 {
            return Err(BoardError::invalid("per_page must be at least 1"));
        }
        let per_page = per_page.min(self.max_per_page);
        let key = PageKey::new(page, per_page);

        if let Some(snapshot) = self.cached(&key).await {
            debug!(target = SOURCE, page, per_page, "page served from cache");
            return Ok(OffsetPage {
                items: snapshot.messages,
                page,
                per_page,
                total_pages: total_pages(snapshot.total_count, per_page),
            });
        }

        // Read before the store so a flush that lands mid-read is noticed.
        let generation = self.generation().await;

        let started_at = Instant::now();
        let total_count = self
            .messages
            .count_messages()
            .await
            .map_err(|err| BoardError::store("count_messages", err))?;
        let window = paginate(page, per_page, total_count);
        let items = self
            .messages
            .list_messages(window.skip, window.limit)
            .await
            .map_err(|err| BoardError::store("list_messages", err))?;
        histogram!(METRIC_STORE_PAGE_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);

        let snapshot = PageSnapshot {
            messages: items,
            total_count,
        };
        self.remember(key, &snapshot, generation).await;
        debug!(
            target = SOURCE,
            page,
            per_page,
            total_count,
            "page loaded from store"
        );

        Ok(OffsetPage {
            items: snapshot.messages,
            page,
            per_page,
            total_pages: window.total_pages,
        })
    }

    /// Cached snapshot for `key`. Cache failures and unreadable entries count
    /// as misses.
    async fn cached(&self, key: &PageKey) -> Option<PageSnapshot> {
        let cache = self.cache.as_ref()?;
        let bytes = match cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                counter!(METRIC_CACHE_FALLBACK, "op" => "get").increment(1);
                warn!(
                    target = SOURCE,
                    key = %key,
                    error = %err,
                    "page cache read failed; falling back to store"
                );
                return None;
            }
        };

        match PageSnapshot::decode(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                counter!(METRIC_CACHE_FALLBACK, "op" => "decode").increment(1);
                warn!(
                    target = SOURCE,
                    key = %key,
                    error = %err,
                    "discarding unreadable page cache entry"
                );
                None
            }
        }
    }

    async fn generation(&self) -> Option<u64> {
        let cache = self.cache.as_ref()?;
        match cache.generation().await {
            Ok(generation) => Some(generation),
            Err(err) => {
                counter!(METRIC_CACHE_FALLBACK, "op" => "generation").increment(1);
                warn!(
                    target = SOURCE,
                    error = %err,
                    "page cache generation unavailable; page will not be cached"
                );
                None
            }
        }
    }

    /// Cache `snapshot` unless the cache was flushed after `generation` was
    /// read. Without a generation nothing is cached.
    async fn remember(&self, key: PageKey, snapshot: &PageSnapshot, generation: Option<u64>) {
        let (Some(cache), Some(generation)) = (self.cache.as_ref(), generation) else {
            return;
        };

        let result = match snapshot.encode() {
            Ok(bytes) => cache.set_if_current(key, bytes, generation).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(true) => {}
            Ok(false) => {
                debug!(
                    target = SOURCE,
                    key = %key,
                    "page cache flushed during store read; snapshot dropped"
                );
            }
            Err(err) => {
                counter!(METRIC_CACHE_FALLBACK, "op" => "set").increment(1);
                warn!(
                    target = SOURCE,
                    key = %key,
                    error = %err,
                    "failed to populate page cache"
                );
            }
        }
    }
}

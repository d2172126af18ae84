//! Cache configuration.
//!
//! Controls the page cache via the `[cache]` table of `noticeboard.toml`.

use std::num::NonZeroUsize;

use serde::Deserialize;

const DEFAULT_PAGE_LIMIT: usize = 256;

/// Page cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the read-through page cache.
    pub enable_page_cache: bool,
    /// Maximum number of cached pages before LRU eviction.
    pub page_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable_page_cache: true,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enable_page_cache: settings.enable_page_cache,
            page_limit: settings.page_limit.get(),
        }
    }
}

impl CacheConfig {
    pub fn is_enabled(&self) -> bool {
        self.enable_page_cache
    }

    /// Returns the page limit as NonZeroUsize, clamping to 1 if zero.
    pub fn page_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_limit).unwrap_or(NonZeroUsize::MIN)
    }
}

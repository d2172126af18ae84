//! Offset pagination over the newest-first message ordering.

use serde::Serialize;

/// Skip/limit window for one page plus the page count it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: u32,
    pub total_pages: u64,
}

/// Compute the window for `page` (1-based) of size `per_page`.
///
/// `page` is not clamped to `total_pages`: a page past the end produces a
/// `skip` at or beyond `total_count`, and the store answers with an empty
/// range.
pub fn paginate(page: u32, per_page: u32, total_count: u64) -> PageWindow {
    debug_assert!(page >= 1, "page numbers start at 1");
    debug_assert!(per_page >= 1, "per_page must be positive");

    let skip = u64::from(page.saturating_sub(1)) * u64::from(per_page);
    PageWindow {
        skip,
        limit: per_page,
        total_pages: total_pages(total_count, per_page),
    }
}

/// `ceil(total_count / per_page)`, zero for an empty collection.
pub fn total_pages(total_count: u64, per_page: u32) -> u64 {
    let per_page = u64::from(per_page.max(1));
    total_count.div_ceil(per_page)
}

/// One page of items, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

//! Cache key definitions.

use std::fmt;

/// Identifies one cached page.
///
/// `per_page` is part of the key: the same page number at two page sizes
/// covers different messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub page: u32,
    pub per_page: u32,
}

impl PageKey {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

/// Flat string form, for backends that key on strings.
impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "messages_page_{}_per_{}", self.page, self.per_page)
    }
}

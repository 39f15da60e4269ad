//! Pagination state

use serde::Deserialize;
use serde::Serialize;

/// Zero-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based index of the current page.
    pub page_index: usize,
    /// Number of rows per page. Always at least 1.
    pub page_size: usize,
}

impl Pagination {
    /// Default page size when none is configured.
    pub const DEFAULT_PAGE_SIZE: usize = 25;

    /// Creates pagination at the first page with the given size.
    pub fn with_size(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    /// Row offset of the first row on the current page.
    pub fn offset(&self) -> usize {
        self.page_index * self.page_size
    }

    /// Number of pages needed for `total` rows.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::with_size(Self::DEFAULT_PAGE_SIZE)
    }
}

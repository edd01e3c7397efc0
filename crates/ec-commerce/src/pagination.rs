//! Page-based pagination over repository queries.

use serde::{Deserialize, Serialize};

/// Page size limits for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    /// Page size used when the caller gives none.
    pub default_page_size: usize,
    /// Upper bound on any requested page size.
    pub max_page_size: usize,
}

impl PageSettings {
    /// Resolve an optional 1-based page and limit into concrete values.
    ///
    /// Page numbers below 1 become 1; limits are clamped to
    /// `[1, max_page_size]`.
    pub fn resolve(&self, page: Option<usize>, limit: Option<usize>) -> (usize, usize) {
        let max = self.max_page_size.max(1);
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(self.default_page_size).clamp(1, max);
        (page, limit)
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Pagination info returned with a page of results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub limit: usize,
    /// Total number of matching items.
    pub total: usize,
    /// Total number of pages.
    pub total_pages: usize,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let total_pages = if total == 0 { 1 } else { total.div_ceil(limit) };

        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// Number of items before this page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1)).saturating_mul(self.limit)
    }

    /// Check if there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

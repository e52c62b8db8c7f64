//! Pagination types for the post feed
//!
//! Pages are 0-indexed: page `n` skips `n * per_page` posts.

use serde::{Deserialize, Serialize};

/// Maximum items per page
const MAX_PER_PAGE: u32 = 100;

/// Default items per page
const DEFAULT_PER_PAGE: u32 = 20;

/// Pagination parameters
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Page number (0-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub per_page: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// Per page is clamped to 1..=100.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.per_page)
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl<T> Paginated<T> {
    /// Transform the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }

    /// Number of pages holding at least one item.
    pub fn total_pages(&self) -> u32 {
        if self.total <= 0 {
            0
        } else {
            let per_page = i64::from(self.per_page.max(1));
            u32::try_from((self.total + per_page - 1) / per_page).unwrap_or(u32::MAX)
        }
    }

    /// Check if there's a next page.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < u64::from(self.total_pages())
    }

    /// Check if there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }
}

/// Query parameters for pagination.
///
/// `size` and `perPage` are accepted as aliases for `per_page`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    #[serde(alias = "size", alias = "perPage")]
    pub per_page: Option<u32>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(
            params.page.unwrap_or(0),
            params.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

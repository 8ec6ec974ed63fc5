//! Skip/limit pagination

use serde::{Deserialize, Serialize};

/// Maximum items per page
pub const MAX_LIMIT: u32 = 100;

/// Default items per page
pub const DEFAULT_LIMIT: u32 = 20;

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of records to skip
    pub skip: u64,
    /// Maximum records to return (1..=100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination, clamping `limit` to 1..=100.
    pub fn new(skip: u64, limit: u32) -> Self {
        Self {
            skip,
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        i64::try_from(self.skip).unwrap_or(i64::MAX)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Apply the window to an already ordered in-memory sequence.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.skip).unwrap_or(usize::MAX);
        items
            .iter()
            .skip(start)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items for the current window
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    pub skip: u64,
    pub limit: u32,
    /// Whether records exist beyond this window
    pub has_more: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: Pagination) -> Self {
        let seen = page.skip.saturating_add(items.len() as u64);
        Self {
            has_more: i64::try_from(seen).map_or(false, |seen| seen < total),
            items,
            total,
            skip: page.skip,
            limit: page.limit,
        }
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub skip: Option<u64>,
    pub limit: Option<u32>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

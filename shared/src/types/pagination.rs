//! Pagination related types for list endpoints

use serde::{Deserialize, Serialize};

// Constants
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Pagination parameters for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: u32,

    /// Number of items per page
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Create a new pagination, sanitizing out-of-range values
    ///
    /// A page below 1 becomes 1. A limit outside `1..=100` falls back to the
    /// default of 10 rather than being clamped.
    pub fn new(page: i64, limit: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { page.min(u32::MAX as i64) as u32 };
        let limit = if limit < 1 || limit > MAX_LIMIT as i64 {
            DEFAULT_LIMIT
        } else {
            limit as u32
        };
        Self { page, limit }
    }

    /// Parse raw query-string values; anything unparsable counts as absent
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE as i64);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT as i64);
        Self::new(page, limit)
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// Get the limit for database queries
    pub fn limit_i64(&self) -> i64 {
        self.limit as i64
    }

    /// Build response metadata once the total row count is known
    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: calculate_total_pages(total, self.limit),
        }
    }
}

/// Pagination block returned next to list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

/// Paginated list payload: `{ items, pagination }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// The actual data items
    pub items: Vec<T>,

    /// Page metadata
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response
    pub fn new(items: Vec<T>, pagination: Pagination, total: i64) -> Self {
        Self {
            items,
            pagination: pagination.meta(total),
        }
    }

    /// Transform the items using a function
    pub fn map<U, F>(self, f: F) -> PaginatedResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    /// Check if the response is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `ceil(total / limit)`, never below 1 so empty lists still report one page
pub fn calculate_total_pages(total: i64, limit: u32) -> i64 {
    if limit == 0 {
        return 1;
    }
    let limit = limit as i64;
    ((total.max(0) + limit - 1) / limit).max(1)
}

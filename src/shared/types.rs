use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 20, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    /// Rows to skip. Saturates instead of overflowing on absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }

    /// Page size clamped to MAX_PAGE_SIZE
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Slice an already materialized list down to the requested page
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit()).unwrap_or(0);
        items.into_iter().skip(offset).take(limit).collect()
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset_and_clamp() {
        let q = PaginationQuery {
            page: 3,
            page_size: 500,
        };
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 2 * MAX_PAGE_SIZE);

        let q = PaginationQuery {
            page: 0,
            page_size: 10,
        };
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_huge_page_saturates() {
        let q = PaginationQuery {
            page: i64::MAX,
            page_size: 20,
        };
        assert_eq!(q.offset(), i64::MAX);
        assert!(q.paginate(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn test_paginate_slices_in_order() {
        let q = PaginationQuery {
            page: 2,
            page_size: 2,
        };
        assert_eq!(q.paginate(vec![1, 2, 3, 4, 5]), vec![3, 4]);

        let past_end = PaginationQuery {
            page: 9,
            page_size: 2,
        };
        assert!(past_end.paginate(vec![1, 2, 3]).is_empty());
    }
}

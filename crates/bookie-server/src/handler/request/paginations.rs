use serde::{Deserialize, Serialize};

use crate::service::store::PageRequest;

/// Page-number pagination query parameters.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct PaginationQuery {
    /// Page size; values outside `1..=100` fall back to the default.
    pub limit: Option<i64>,
    /// 1-based page number.
    pub page: Option<i64>,
}

impl PaginationQuery {
    /// Default page size.
    pub const DEFAULT_LIMIT: u32 = 20;
    /// Largest accepted page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Returns the effective page size.
    pub fn limit(&self) -> u32 {
        match self.limit {
            Some(limit) if (1..=i64::from(Self::MAX_LIMIT)).contains(&limit) => limit as u32,
            _ => Self::DEFAULT_LIMIT,
        }
    }

    /// Returns the number of pages needed for `total` items (at least one).
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit())).max(1)
    }

    /// Returns the requested page clamped to `[1, total_pages]`.
    pub fn page(&self, total: u64) -> u64 {
        let requested = self.page.unwrap_or(1).max(1) as u64;
        requested.min(self.total_pages(total))
    }

    /// Returns the store query for the clamped page.
    pub fn page_request(&self, total: u64) -> PageRequest {
        let limit = self.limit();
        PageRequest {
            limit,
            offset: (self.page(total) - 1).saturating_mul(u64::from(limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<i64>, page: Option<i64>) -> PaginationQuery {
        PaginationQuery { limit, page }
    }

    #[test]
    fn limit_defaults() {
        assert_eq!(query(None, None).limit(), 20);
        assert_eq!(query(Some(0), None).limit(), 20);
        assert_eq!(query(Some(-5), None).limit(), 20);
        assert_eq!(query(Some(101), None).limit(), 20);
        assert_eq!(query(Some(100), None).limit(), 100);
        assert_eq!(query(Some(7), None).limit(), 7);
    }

    #[test]
    fn page_is_clamped() {
        let q = query(Some(10), Some(9));
        assert_eq!(q.total_pages(25), 3);
        assert_eq!(q.page(25), 3);
        assert_eq!(q.page_request(25).offset, 20);

        assert_eq!(query(Some(10), Some(-1)).page(25), 1);
        assert_eq!(query(Some(10), Some(2)).page(0), 1);
    }
}

//! Database query repositories.
//!
//! Queries that may return large result sets take a [`Pagination`] so every
//! listing is bounded.

pub mod user;

use serde::{Deserialize, Serialize};
pub use user::UserRepository;

/// Pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates a new pagination instance.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            // Ensure limit is between 1 and 1000
            limit: limit.clamp(1, 1000),
            offset: offset.max(0),
        }
    }

    /// Creates pagination from a 1-based page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 1000);
        Self::new(page_size, (page - 1) * page_size)
    }

    /// Gets the current page number (1-based).
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit) + 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds_checking() {
        assert_eq!(Pagination::new(0, 10).limit, 1);
        assert_eq!(Pagination::new(1500, 10).limit, 1000);
        assert_eq!(Pagination::new(10, -5).offset, 0);
    }

    #[test]
    fn pagination_from_page() {
        let pagination = Pagination::from_page(1, 20);
        assert_eq!((pagination.limit, pagination.offset), (20, 0));

        let pagination = Pagination::from_page(3, 10);
        assert_eq!((pagination.limit, pagination.offset), (10, 20));
        assert_eq!(pagination.page_number(), 3);

        let pagination = Pagination::from_page(0, 10);
        assert_eq!(pagination.offset, 0);
    }
}

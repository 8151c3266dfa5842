//! Data models for the library portal

pub mod book;
pub mod borrow;
pub mod reader;
pub mod receipt;
pub mod session;
pub mod settings;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Re-export commonly used types
pub use book::{Book, BookShort};
pub use borrow::Borrow;
pub use reader::Reader;
pub use receipt::{Receipt, ReceiptKind};
pub use session::{Session, SessionUser};

/// Default page size when the SPA does not ask for one
pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Fill in and clamp paging parameters before they reach the backend
pub fn normalize_paging(page: &mut Option<i64>, per_page: &mut Option<i64>) {
    *page = Some(page.unwrap_or(1).max(1));
    *per_page = Some(per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE));
}

/// Paginated response wrapper, shared by the backend contract and the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_paging() {
        let (mut page, mut per_page) = (None, None);
        normalize_paging(&mut page, &mut per_page);
        assert_eq!((page, per_page), (Some(1), Some(DEFAULT_PER_PAGE)));

        let (mut page, mut per_page) = (Some(-3), Some(5000));
        normalize_paging(&mut page, &mut per_page);
        assert_eq!((page, per_page), (Some(1), Some(MAX_PER_PAGE)));
    }
}

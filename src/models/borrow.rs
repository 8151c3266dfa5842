//! Borrow (loan) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Active,
    Overdue,
    Returned,
}

/// Borrow record with display details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Borrow {
    pub id: i64,
    pub book_id: i64,
    pub book_title: String,
    pub reader_id: i64,
    pub reader_name: Option<String>,
    pub card_number: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub renew_count: i32,
    pub status: BorrowStatus,
}

/// Borrow query parameters
#[derive(Debug, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BorrowQuery {
    pub reader_id: Option<i64>,
    pub book_id: Option<i64>,
    pub status: Option<BorrowStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create borrow request: a reader card lends one book
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBorrow {
    #[validate(length(min = 1, max = 32, message = "Card number must be 1-32 characters"))]
    pub card_number: String,
    #[validate(range(min = 1, message = "Invalid book id"))]
    pub book_id: i64,
}

//! Circulation and system settings

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SystemSettings {
    #[validate(length(min = 1, max = 120, message = "Library name must be 1-120 characters"))]
    pub library_name: String,
    /// Loan duration in days
    #[validate(range(min = 1, max = 365))]
    pub borrow_days: i32,
    #[validate(range(min = 1, max = 100))]
    pub max_borrows_per_reader: i32,
    #[validate(range(min = 0, max = 10))]
    pub max_renewals: i32,
    /// Overdue fine per day, in cents
    #[validate(range(min = 0))]
    pub fine_per_day_cents: i64,
}

//! Reader and library card model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Suspended,
    Lost,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reader {
    pub id: i64,
    pub name: String,
    pub card_number: String,
    pub card_status: CardStatus,
    pub card_expires_at: Option<DateTime<Utc>>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub max_borrows: i32,
    pub current_borrows: i32,
}

/// Reader query parameters
#[derive(Debug, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ReaderQuery {
    pub name: Option<String>,
    pub card_number: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Card management request (suspend, report lost, extend)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCard {
    pub card_status: CardStatus,
    pub card_expires_at: Option<DateTime<Utc>>,
}

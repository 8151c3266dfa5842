//! Library REST backend contract
//!
//! [`LibraryBackend`] is what the services talk to; [`http::HttpBackend`] is
//! the reqwest implementation used in production.

pub mod http;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, BookShort},
        borrow::{Borrow, BorrowQuery, CreateBorrow},
        reader::{Reader, ReaderQuery, UpdateCard},
        receipt::{Receipt, ReceiptConfirmation},
        session::SessionUser,
        settings::SystemSettings,
        PaginatedResponse,
    },
};

pub use http::HttpBackend;

/// User as returned by the backend login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BackendUser {
    pub id: i64,
    #[serde(alias = "username")]
    pub login: String,
    #[serde(default, alias = "displayName", alias = "nickname")]
    pub display_name: Option<String>,
    #[serde(default, alias = "roleNames")]
    pub role_names: Vec<String>,
}

impl From<BackendUser> for SessionUser {
    fn from(user: BackendUser) -> Self {
        SessionUser {
            user_id: user.id,
            login: user.login,
            display_name: user.display_name,
            role_names: user.role_names.into_iter().collect::<BTreeSet<_>>(),
        }
    }
}

/// Successful backend login
#[derive(Debug, Clone, Deserialize)]
pub struct BackendLogin {
    pub token: String,
    #[serde(default, alias = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: BackendUser,
}

/// Operations the portal forwards to the library backend.
///
/// Every call except `login` and `ping` carries the backend token of the
/// session it runs for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    async fn login(&self, login: &str, password: &str) -> AppResult<BackendLogin>;
    async fn logout(&self, token: &str) -> AppResult<()>;
    async fn ping(&self) -> AppResult<()>;

    async fn list_books(&self, token: &str, query: &BookQuery) -> AppResult<PaginatedResponse<BookShort>>;
    async fn get_book(&self, token: &str, id: i64) -> AppResult<Book>;

    async fn list_borrows(&self, token: &str, query: &BorrowQuery) -> AppResult<PaginatedResponse<Borrow>>;
    async fn create_borrow(&self, token: &str, request: &CreateBorrow) -> AppResult<Borrow>;
    async fn return_borrow(&self, token: &str, id: i64) -> AppResult<Borrow>;
    async fn renew_borrow(&self, token: &str, id: i64) -> AppResult<Borrow>;

    async fn list_readers(&self, token: &str, query: &ReaderQuery) -> AppResult<PaginatedResponse<Reader>>;
    async fn get_reader(&self, token: &str, id: i64) -> AppResult<Reader>;
    async fn update_card(&self, token: &str, id: i64, request: &UpdateCard) -> AppResult<Reader>;

    async fn submit_receipt(&self, token: &str, receipt: &Receipt) -> AppResult<ReceiptConfirmation>;

    async fn get_settings(&self, token: &str) -> AppResult<SystemSettings>;
    async fn update_settings(&self, token: &str, settings: &SystemSettings) -> AppResult<SystemSettings>;
}

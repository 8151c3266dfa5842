//! reqwest implementation of the backend contract

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{BackendLogin, LibraryBackend};
use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, BookShort},
        borrow::{Borrow, BorrowQuery, CreateBorrow},
        reader::{Reader, ReaderQuery, UpdateCard},
        receipt::{Receipt, ReceiptConfirmation},
        settings::SystemSettings,
        PaginatedResponse,
    },
};

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> AppResult<()> {
        check(request.send().await?).await?;
        Ok(())
    }
}

async fn check(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or(text);
    Err(map_status(status, message))
}

/// Translate a backend failure status into the portal's error type
pub(crate) fn map_status(status: StatusCode, message: String) -> AppError {
    let message = if message.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Backend request failed")
            .to_string()
    } else {
        message
    };

    match status {
        StatusCode::UNAUTHORIZED => AppError::Authentication(message),
        StatusCode::FORBIDDEN => AppError::Authorization(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        _ => AppError::Backend(format!("{}: {}", status, message)),
    }
}

#[async_trait]
impl LibraryBackend for HttpBackend {
    async fn login(&self, login: &str, password: &str) -> AppResult<BackendLogin> {
        self.send(
            self.client
                .post(self.url("/auth/login"))
                .json(&LoginBody { login, password }),
        )
        .await
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        self.send_empty(self.client.post(self.url("/auth/logout")).bearer_auth(token))
            .await
    }

    async fn ping(&self) -> AppResult<()> {
        self.send_empty(self.client.get(self.url("/health"))).await
    }

    async fn list_books(&self, token: &str, query: &BookQuery) -> AppResult<PaginatedResponse<BookShort>> {
        self.send(self.client.get(self.url("/books")).bearer_auth(token).query(query))
            .await
    }

    async fn get_book(&self, token: &str, id: i64) -> AppResult<Book> {
        self.send(self.client.get(self.url(&format!("/books/{}", id))).bearer_auth(token))
            .await
    }

    async fn list_borrows(&self, token: &str, query: &BorrowQuery) -> AppResult<PaginatedResponse<Borrow>> {
        self.send(self.client.get(self.url("/borrows")).bearer_auth(token).query(query))
            .await
    }

    async fn create_borrow(&self, token: &str, request: &CreateBorrow) -> AppResult<Borrow> {
        self.send(self.client.post(self.url("/borrows")).bearer_auth(token).json(request))
            .await
    }

    async fn return_borrow(&self, token: &str, id: i64) -> AppResult<Borrow> {
        self.send(
            self.client
                .post(self.url(&format!("/borrows/{}/return", id)))
                .bearer_auth(token),
        )
        .await
    }

    async fn renew_borrow(&self, token: &str, id: i64) -> AppResult<Borrow> {
        self.send(
            self.client
                .post(self.url(&format!("/borrows/{}/renew", id)))
                .bearer_auth(token),
        )
        .await
    }

    async fn list_readers(&self, token: &str, query: &ReaderQuery) -> AppResult<PaginatedResponse<Reader>> {
        self.send(self.client.get(self.url("/readers")).bearer_auth(token).query(query))
            .await
    }

    async fn get_reader(&self, token: &str, id: i64) -> AppResult<Reader> {
        self.send(self.client.get(self.url(&format!("/readers/{}", id))).bearer_auth(token))
            .await
    }

    async fn update_card(&self, token: &str, id: i64, request: &UpdateCard) -> AppResult<Reader> {
        self.send(
            self.client
                .put(self.url(&format!("/readers/{}/card", id)))
                .bearer_auth(token)
                .json(request),
        )
        .await
    }

    async fn submit_receipt(&self, token: &str, receipt: &Receipt) -> AppResult<ReceiptConfirmation> {
        self.send(
            self.client
                .post(self.url(&format!("/receipts/{}", receipt.kind)))
                .bearer_auth(token)
                .json(receipt),
        )
        .await
    }

    async fn get_settings(&self, token: &str) -> AppResult<SystemSettings> {
        self.send(self.client.get(self.url("/settings")).bearer_auth(token))
            .await
    }

    async fn update_settings(&self, token: &str, settings: &SystemSettings) -> AppResult<SystemSettings> {
        self.send(self.client.put(self.url("/settings")).bearer_auth(token).json(settings))
            .await
    }
}

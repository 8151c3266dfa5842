//! Router tests: guarded navigation and the session API, against a fake backend

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use library_portal::{
    api,
    backend::{BackendLogin, BackendUser, LibraryBackend},
    config::AppConfig,
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, BookShort},
        borrow::{Borrow, BorrowQuery, CreateBorrow},
        reader::{Reader, ReaderQuery, UpdateCard},
        receipt::{Receipt, ReceiptConfirmation},
        settings::SystemSettings,
        PaginatedResponse,
    },
    AppState,
};

struct FakeBackend;

fn empty_page<T: for<'a> utoipa::ToSchema<'a>>() -> PaginatedResponse<T> {
    PaginatedResponse {
        items: vec![],
        total: 0,
        page: 1,
        per_page: 20,
    }
}

#[async_trait]
impl LibraryBackend for FakeBackend {
    async fn login(&self, login: &str, password: &str) -> AppResult<BackendLogin> {
        let roles: &[&str] = match (login, password) {
            ("admin", "admin") => &["ManageUser", "ManageBook"],
            ("reader", "reader") => &["Reader"],
            // signs in, but the backend stops accepting the token afterwards
            ("stale", "stale") => &["ManageBook"],
            _ => return Err(AppError::Authentication("Invalid login or password".into())),
        };
        Ok(BackendLogin {
            token: format!("backend-{}", login),
            expires_at: None,
            user: BackendUser {
                id: 1,
                login: login.to_string(),
                display_name: None,
                role_names: roles.iter().map(|r| r.to_string()).collect(),
            },
        })
    }

    async fn logout(&self, _token: &str) -> AppResult<()> {
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn list_books(&self, token: &str, _query: &BookQuery) -> AppResult<PaginatedResponse<BookShort>> {
        if token == "backend-stale" {
            return Err(AppError::Authentication("Token expired".into()));
        }
        Ok(empty_page())
    }

    async fn get_book(&self, _token: &str, id: i64) -> AppResult<Book> {
        Err(AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn list_borrows(&self, _token: &str, _query: &BorrowQuery) -> AppResult<PaginatedResponse<Borrow>> {
        Ok(empty_page())
    }

    async fn create_borrow(&self, _token: &str, _request: &CreateBorrow) -> AppResult<Borrow> {
        Err(AppError::Conflict("Book not available".into()))
    }

    async fn return_borrow(&self, _token: &str, id: i64) -> AppResult<Borrow> {
        Err(AppError::NotFound(format!("Borrow {} not found", id)))
    }

    async fn renew_borrow(&self, _token: &str, id: i64) -> AppResult<Borrow> {
        Err(AppError::NotFound(format!("Borrow {} not found", id)))
    }

    async fn list_readers(&self, _token: &str, _query: &ReaderQuery) -> AppResult<PaginatedResponse<Reader>> {
        Ok(empty_page())
    }

    async fn get_reader(&self, _token: &str, id: i64) -> AppResult<Reader> {
        Err(AppError::NotFound(format!("Reader {} not found", id)))
    }

    async fn update_card(&self, _token: &str, id: i64, _request: &UpdateCard) -> AppResult<Reader> {
        Err(AppError::NotFound(format!("Reader {} not found", id)))
    }

    async fn submit_receipt(&self, _token: &str, receipt: &Receipt) -> AppResult<ReceiptConfirmation> {
        Ok(ReceiptConfirmation {
            receipt_id: 1,
            kind: receipt.kind,
            total_quantity: receipt.total_quantity,
            created_at: chrono::Utc::now(),
        })
    }

    async fn get_settings(&self, _token: &str) -> AppResult<SystemSettings> {
        Err(AppError::NotFound("No settings".into()))
    }

    async fn update_settings(&self, _token: &str, settings: &SystemSettings) -> AppResult<SystemSettings> {
        Ok(settings.clone())
    }
}

fn app() -> Router {
    let state = AppState::new(AppConfig::default(), Arc::new(FakeBackend)).unwrap();
    api::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign in and return the session cookie pair and the response body
async fn sign_in(app: &Router, login: &str, from: Option<&str>) -> (String, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "login": login, "password": login, "from": from }).to_string(),
        ))
        .unwrap();
    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string();
    (cookie, json_body(response).await)
}

#[tokio::test]
async fn test_anonymous_admin_page_redirects_to_admin_login() {
    let app = app();
    let response = send(&app, get("/admin/users", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login?from=%2Fadmin%2Fusers");
}

#[tokio::test]
async fn test_anonymous_reader_page_redirects_to_login() {
    let app = app();
    let response = send(&app, get("/reader/borrows?page=2", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?from=%2Freader%2Fborrows%3Fpage%3D2");
}

#[tokio::test]
async fn test_public_pages_need_no_session() {
    let app = app();
    for uri in ["/", "/catalog", "/login", "/admin/login", "/access-denied"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
    }
}

#[tokio::test]
async fn test_role_holder_enters_protected_page() {
    let app = app();
    let (cookie, body) = sign_in(&app, "admin", Some("/admin/users")).await;
    assert_eq!(body["redirect_to"], "/admin/users");
    assert_eq!(body["token_type"], "Bearer");

    let response = send(&app, get("/admin/users", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reader_is_denied_admin_page() {
    let app = app();
    let (cookie, body) = sign_in(&app, "reader", None).await;
    assert_eq!(body["redirect_to"], "/reader");

    let response = send(&app, get("/admin/users", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/access-denied");

    // no role restriction on the dashboard
    let response = send(&app, get("/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bad_credentials_are_rejected() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "login": "admin", "password": "nope" }).to_string()))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "NotAuthenticated");
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = app();
    let (cookie, _) = sign_in(&app, "admin", None).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, get("/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login?from=%2Fadmin");

    let response = send(&app, get("/api/v1/auth/me", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_uses_status_codes_not_redirects() {
    let app = app();

    let response = send(&app, get("/api/v1/borrows", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (reader, _) = sign_in(&app, "reader", None).await;
    let response = send(&app, get("/api/v1/borrows", Some(&reader))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, get("/api/v1/auth/me/borrows", Some(&reader))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["items"].is_array());
}

#[tokio::test]
async fn test_menu_lists_allowed_sections() {
    let app = app();
    let (cookie, _) = sign_in(&app, "admin", None).await;

    let response = send(&app, get("/api/v1/menu", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let sections: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["section"].as_str())
        .collect();
    assert!(sections.contains(&"Catalog"));
    assert!(sections.contains(&"System"));
    assert!(!sections.contains(&"Circulation"));
}

#[tokio::test]
async fn test_receipt_submission() {
    let app = app();
    let (cookie, _) = sign_in(&app, "admin", None).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/receipts/inward")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "counterparty": "Supplier",
                "lines": [
                    { "book_id": 1, "quantity": 2 },
                    { "book_id": 1, "quantity": 3 }
                ]
            })
            .to_string(),
        ))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["total_quantity"], 5);
    assert_eq!(body["kind"], "inward");
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = app();
    let response = send(&app, get("/api/v1/nothing-here", None)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
async fn test_path_variants_are_guarded() {
    let app = app();
    let cases = [
        ("/ADMIN/users", "/admin/login?from=%2FADMIN%2Fusers"),
        ("/Admin/settings", "/admin/login?from=%2FAdmin%2Fsettings"),
        ("/admin%2Fusers", "/admin/login?from=%2Fadmin%252Fusers"),
        ("/READER/borrows", "/login?from=%2FREADER%2Fborrows"),
    ];
    for (uri, target) in cases {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), target, "{}", uri);
    }

    let (reader, _) = sign_in(&app, "reader", None).await;
    for uri in ["/ADMIN/users", "/admin%2Fsettings"] {
        let response = send(&app, get(uri, Some(&reader))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/access-denied", "{}", uri);
    }
}

#[tokio::test]
async fn test_backend_rejecting_token_ends_session() {
    let app = app();
    let (cookie, _) = sign_in(&app, "stale", None).await;

    let response = send(&app, get("/admin/books", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/api/v1/books", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, get("/admin/books", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login?from=%2Fadmin%2Fbooks");

    let response = send(&app, get("/api/v1/auth/me", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

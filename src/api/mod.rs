//! HTTP layer: JSON API, guarded pages and documentation

pub mod auth;
pub mod books;
pub mod borrows;
pub mod health;
pub mod menu;
pub mod openapi;
pub mod pages;
pub mod readers;
pub mod receipts;
pub mod settings;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::Session, AppState};

/// Extractor for the live session behind a request
pub struct AuthenticatedSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .services
            .sessions
            .resolve(&parts.headers)
            .await
            .map(AuthenticatedSession)
            .ok_or_else(|| AppError::Authentication("Not signed in".to_string()))
    }
}

async fn api_not_found() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/me/borrows", get(borrows::my_borrows))
        .route("/menu", get(menu::get_menu))
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        .route("/receipts/inward", post(receipts::submit_inward))
        .route("/receipts/outward", post(receipts::submit_outward))
        // Circulation
        .route("/borrows", get(borrows::list_borrows).post(borrows::create_borrow))
        .route("/borrows/:id/return", post(borrows::return_borrow))
        .route("/borrows/:id/renew", post(borrows::renew_borrow))
        // Readers
        .route("/readers", get(readers::list_readers))
        .route("/readers/:id", get(readers::get_reader))
        .route("/readers/:id/card", put(readers::update_card))
        // Settings
        .route("/settings", get(settings::get_settings).put(settings::update_settings))
        .fallback(api_not_found)
        .with_state(state.clone());

    // SPA shell behind the route guard
    let pages = Router::new()
        .fallback_service(pages::spa_service(&state.config.portal))
        .layer(middleware::from_fn_with_state(state.clone(), pages::route_guard));

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .merge(pages)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

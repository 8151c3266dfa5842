//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, BookShort},
        PaginatedResponse,
    },
    AppState,
};

use super::AuthenticatedSession;

/// Search the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = PaginatedResponse<BookShort>),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<BookShort>>> {
    let page = state.services.catalog.search_books(&session, query).await?;
    Ok(Json(page))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&session, id).await?;
    Ok(Json(book))
}

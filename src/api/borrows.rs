//! Borrow desk endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        borrow::{Borrow, BorrowQuery, CreateBorrow},
        session::MANAGE_BORROW,
        PaginatedResponse,
    },
    AppState,
};

use super::AuthenticatedSession;

/// List borrows
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Borrows", body = PaginatedResponse<Borrow>),
        (status = 403, description = "ManageBorrow role required")
    )
)]
pub async fn list_borrows(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<PaginatedResponse<Borrow>>> {
    session.require_any_role(&[MANAGE_BORROW])?;

    let page = state.services.circulation.list_borrows(&session, query).await?;
    Ok(Json(page))
}

/// Borrows of the signed-in reader
#[utoipa::path(
    get,
    path = "/auth/me/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Own borrows", body = PaginatedResponse<Borrow>),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn my_borrows(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<PaginatedResponse<Borrow>>> {
    let page = state.services.circulation.my_borrows(&session, query).await?;
    Ok(Json(page))
}

/// Lend a book to a reader card
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Borrow recorded", body = Borrow),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Book not available or borrow limit reached")
    )
)]
pub async fn create_borrow(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(request): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<Borrow>)> {
    session.require_any_role(&[MANAGE_BORROW])?;

    let borrow = state.services.circulation.create_borrow(&session, request).await?;
    Ok((StatusCode::CREATED, Json(borrow)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = Borrow),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn return_borrow(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i64>,
) -> AppResult<Json<Borrow>> {
    session.require_any_role(&[MANAGE_BORROW])?;

    let borrow = state.services.circulation.return_borrow(&session, id).await?;
    Ok(Json(borrow))
}

/// Renew a borrow
#[utoipa::path(
    post,
    path = "/borrows/{id}/renew",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Borrow renewed", body = Borrow),
        (status = 404, description = "Borrow not found"),
        (status = 409, description = "Renewal limit reached")
    )
)]
pub async fn renew_borrow(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i64>,
) -> AppResult<Json<Borrow>> {
    session.require_any_role(&[MANAGE_BORROW])?;

    let borrow = state.services.circulation.renew_borrow(&session, id).await?;
    Ok(Json(borrow))
}

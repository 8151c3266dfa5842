//! Reader and card management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        reader::{Reader, ReaderQuery, UpdateCard},
        session::MANAGE_READER,
        PaginatedResponse,
    },
    AppState,
};

use super::AuthenticatedSession;

/// List readers
#[utoipa::path(
    get,
    path = "/readers",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(ReaderQuery),
    responses(
        (status = 200, description = "Readers", body = PaginatedResponse<Reader>),
        (status = 403, description = "ManageReader role required")
    )
)]
pub async fn list_readers(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Query(query): Query<ReaderQuery>,
) -> AppResult<Json<PaginatedResponse<Reader>>> {
    session.require_any_role(&[MANAGE_READER])?;

    let page = state.services.circulation.list_readers(&session, query).await?;
    Ok(Json(page))
}

/// Get reader details by ID
#[utoipa::path(
    get,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Reader ID")
    ),
    responses(
        (status = 200, description = "Reader details", body = Reader),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn get_reader(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i64>,
) -> AppResult<Json<Reader>> {
    session.require_any_role(&[MANAGE_READER])?;

    let reader = state.services.circulation.get_reader(&session, id).await?;
    Ok(Json(reader))
}

/// Change a reader's card status or expiry
#[utoipa::path(
    put,
    path = "/readers/{id}/card",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Reader ID")
    ),
    request_body = UpdateCard,
    responses(
        (status = 200, description = "Card updated", body = Reader),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn update_card(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCard>,
) -> AppResult<Json<Reader>> {
    session.require_any_role(&[MANAGE_READER])?;

    let reader = state.services.circulation.update_card(&session, id, request).await?;
    Ok(Json(reader))
}

//! Inward and outward stock receipts

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        receipt::{ReceiptConfirmation, ReceiptDraft, ReceiptKind},
        session::MANAGE_BOOK,
    },
    AppState,
};

use super::AuthenticatedSession;

/// Record books entering the collection
#[utoipa::path(
    post,
    path = "/receipts/inward",
    tag = "receipts",
    security(("bearer_auth" = [])),
    request_body = ReceiptDraft,
    responses(
        (status = 201, description = "Receipt recorded", body = ReceiptConfirmation),
        (status = 400, description = "Empty receipt or invalid line"),
        (status = 403, description = "ManageBook role required")
    )
)]
pub async fn submit_inward(
    state: State<AppState>,
    session: AuthenticatedSession,
    draft: Json<ReceiptDraft>,
) -> AppResult<(StatusCode, Json<ReceiptConfirmation>)> {
    submit(state, session, ReceiptKind::Inward, draft).await
}

/// Record books leaving the collection
#[utoipa::path(
    post,
    path = "/receipts/outward",
    tag = "receipts",
    security(("bearer_auth" = [])),
    request_body = ReceiptDraft,
    responses(
        (status = 201, description = "Receipt recorded", body = ReceiptConfirmation),
        (status = 400, description = "Empty receipt, invalid line or missing destination"),
        (status = 403, description = "ManageBook role required")
    )
)]
pub async fn submit_outward(
    state: State<AppState>,
    session: AuthenticatedSession,
    draft: Json<ReceiptDraft>,
) -> AppResult<(StatusCode, Json<ReceiptConfirmation>)> {
    submit(state, session, ReceiptKind::Outward, draft).await
}

async fn submit(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    kind: ReceiptKind,
    Json(draft): Json<ReceiptDraft>,
) -> AppResult<(StatusCode, Json<ReceiptConfirmation>)> {
    session.require_any_role(&[MANAGE_BOOK])?;

    let confirmation = state
        .services
        .catalog
        .submit_receipt(&session, kind, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

//! Settings endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{session::MANAGE_SYSTEM, settings::SystemSettings},
    AppState,
};

use super::AuthenticatedSession;

/// Get system settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current settings", body = SystemSettings),
        (status = 403, description = "ManageSystem role required")
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> AppResult<Json<SystemSettings>> {
    session.require_any_role(&[MANAGE_SYSTEM])?;

    let settings = state.services.settings.get_settings(&session).await?;
    Ok(Json(settings))
}

/// Update system settings
#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = SystemSettings,
    responses(
        (status = 200, description = "Settings updated", body = SystemSettings),
        (status = 400, description = "Invalid value"),
        (status = 403, description = "ManageSystem role required")
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Json(settings): Json<SystemSettings>,
) -> AppResult<Json<SystemSettings>> {
    session.require_any_role(&[MANAGE_SYSTEM])?;

    let updated = state.services.settings.update_settings(&session, settings).await?;
    Ok(Json(updated))
}

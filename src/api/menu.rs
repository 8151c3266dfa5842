//! Navigation menu for the signed-in user

use axum::{extract::State, Json};

use crate::{guard::MenuSection, AppState};

use super::AuthenticatedSession;

/// Menu sections the current session may open
#[utoipa::path(
    get,
    path = "/menu",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Allowed menu sections", body = Vec<MenuSection>),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_menu(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<Vec<MenuSection>> {
    Json(state.routes.menu_for(&session.user))
}

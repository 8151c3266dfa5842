//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::AppResult, models::SessionUser, AppState};

use super::AuthenticatedSession;

/// Login request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Location the user was redirected away from
    pub from: Option<String>,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session token, also set as an HttpOnly cookie
    pub token: String,
    pub token_type: String,
    pub user: SessionUser,
    /// Where the client should navigate next
    pub redirect_to: String,
    pub expires_at: DateTime<Utc>,
}

/// Current session
#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

/// Sign in with the library backend
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    request.validate()?;

    let outcome = state
        .services
        .auth
        .login(&request.login, &request.password, request.from.as_deref())
        .await?;

    let jar = jar.add(state.services.sessions.session_cookie(outcome.token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            token: outcome.token,
            token_type: "Bearer".to_string(),
            expires_at: outcome.session.expires_at,
            user: outcome.session.user,
            redirect_to: outcome.redirect_to,
        }),
    ))
}

/// Sign out and clear the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Signed out")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    session: Option<AuthenticatedSession>,
) -> (CookieJar, StatusCode) {
    if let Some(AuthenticatedSession(session)) = session {
        state.services.auth.logout(&session).await;
    }
    let jar = jar.remove(state.services.sessions.removal_cookie());
    (jar, StatusCode::NO_CONTENT)
}

/// Get the signed-in user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current session", body = MeResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn me(AuthenticatedSession(session): AuthenticatedSession) -> Json<MeResponse> {
    Json(MeResponse {
        user: session.user,
        expires_at: session.expires_at,
    })
}

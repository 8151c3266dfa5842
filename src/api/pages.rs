//! Portal pages: the route guard in front of the single-page application

use std::path::Path;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::{
    config::PortalConfig,
    guard::{self, Access, GuardOutcome},
    AppState,
};

/// Static files of the SPA; unknown paths get `index.html` so client-side
/// routing can take over
pub fn spa_service(portal: &PortalConfig) -> ServeDir<ServeFile> {
    let index = Path::new(&portal.static_dir).join(&portal.index_file);
    ServeDir::new(&portal.static_dir).fallback(ServeFile::new(index))
}

/// Route guard middleware. Public paths pass straight through; protected
/// ones are evaluated against the request's session.
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let allowed_roles = match state.routes.access_for(path) {
        Access::Public => return next.run(request).await,
        Access::Protected { allowed_roles } => allowed_roles,
    };

    let location = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.to_string());
    let session = state.services.sessions.resolve(request.headers()).await;

    let outcome = guard::evaluate(
        session.as_ref().map(|s| &s.user),
        Some(allowed_roles),
        &location,
        &state.destinations,
    );

    match (&outcome, outcome.redirect_target()) {
        (_, None) => next.run(request).await,
        (GuardOutcome::Denied { .. }, Some(target)) => {
            tracing::info!(
                login = session.as_ref().map(|s| s.user.login.as_str()).unwrap_or_default(),
                "Access to {} denied",
                location
            );
            Redirect::to(&target).into_response()
        }
        (_, Some(target)) => {
            tracing::debug!("No session for {}, redirecting to {}", location, target);
            Redirect::to(&target).into_response()
        }
    }
}

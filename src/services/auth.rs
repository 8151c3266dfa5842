//! Sign-in and sign-out against the library backend

use std::sync::Arc;

use crate::{
    backend::LibraryBackend,
    config::PortalConfig,
    error::AppResult,
    models::session::{Session, SessionUser},
    services::sessions::SessionStore,
};

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: Session,
    pub token: String,
    /// Where the SPA should navigate next
    pub redirect_to: String,
}

#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn LibraryBackend>,
    sessions: SessionStore,
    staff_home: String,
    reader_home: String,
}

impl AuthService {
    pub fn new(backend: Arc<dyn LibraryBackend>, sessions: SessionStore, portal: &PortalConfig) -> Self {
        Self {
            backend,
            sessions,
            staff_home: portal.admin_prefix.clone(),
            reader_home: portal.reader_home.clone(),
        }
    }

    /// Authenticate with the backend and open a portal session.
    ///
    /// `from` is the location the route guard sent the user away from.
    pub async fn login(&self, login: &str, password: &str, from: Option<&str>) -> AppResult<LoginOutcome> {
        let backend_login = match self.backend.login(login, password).await {
            Ok(l) => l,
            Err(e) => {
                tracing::info!(login = %login, "Sign-in rejected: {}", e);
                return Err(e);
            }
        };

        let user = SessionUser::from(backend_login.user);
        let (session, token) = self
            .sessions
            .open(user, backend_login.token, backend_login.expires_at)
            .await?;

        let redirect_to = match safe_return_path(from) {
            Some(path) => path.to_string(),
            None if session.user.is_staff() => self.staff_home.clone(),
            None => self.reader_home.clone(),
        };

        tracing::info!(
            login = %session.user.login,
            session = %session.id,
            "User signed in"
        );

        Ok(LoginOutcome {
            session,
            token,
            redirect_to,
        })
    }

    /// Close the session. The backend logout is best effort.
    pub async fn logout(&self, session: &Session) {
        self.sessions.close(session.id).await;
        if let Err(e) = self.backend.logout(&session.backend_token).await {
            tracing::warn!(session = %session.id, "Backend logout failed: {}", e);
        }
        tracing::info!(login = %session.user.login, session = %session.id, "User signed out");
    }
}

/// Accept only same-origin absolute paths as post-login destinations
pub fn safe_return_path(from: Option<&str>) -> Option<&str> {
    let from = from?.trim();
    let ok = from.starts_with('/')
        && !from.starts_with("//")
        && !from.contains('\\')
        && !from.chars().any(char::is_control);
    ok.then_some(from)
}

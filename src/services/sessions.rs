//! Session store - the portal's authentication context
//!
//! Sessions are created after a successful backend login, removed at logout
//! and dropped once expired. Clients hold a signed token naming the session,
//! either in the session cookie or in a `Bearer` Authorization header; the
//! token is only honoured while its session is still in the store.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use tokio::{sync::RwLock, task::JoinHandle};
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::session::{Session, SessionClaims, SessionUser},
};

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    config: AuthConfig,
}

impl SessionStore {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Open a session and return it with its signed token.
    ///
    /// The session ends at the configured TTL or at the backend token's
    /// expiry, whichever comes first.
    pub async fn open(
        &self,
        user: SessionUser,
        backend_token: String,
        backend_expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<(Session, String)> {
        let now = Utc::now();
        let local_expiry = now
            .checked_add_signed(self.config.session_ttl()?)
            .ok_or_else(|| AppError::Configuration("Session lifetime overflows".to_string()))?;
        let expires_at = match backend_expires_at {
            Some(backend) if backend < local_expiry => backend,
            _ => local_expiry,
        };

        let session = Session {
            id: Uuid::new_v4(),
            user,
            backend_token,
            created_at: now,
            expires_at,
        };

        let token = SessionClaims::for_session(&session)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create session token: {}", e)))?;

        self.sessions.write().await.insert(session.id, session.clone());
        tracing::debug!(session = %session.id, login = %session.user.login, "Session opened");

        Ok((session, token))
    }

    /// Live session by id; an expired one is removed and reported absent
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&id) {
                Some(session) if !session.is_expired_at(now) => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(&id);
        tracing::debug!(session = %id, "Session expired");
        None
    }

    pub async fn close(&self, id: Uuid) -> Option<Session> {
        self.sessions.write().await.remove(&id)
    }

    /// Pass a backend result through, closing the session when the backend
    /// no longer accepts its token
    pub async fn close_if_rejected<T>(&self, session: &Session, result: AppResult<T>) -> AppResult<T> {
        if let Err(AppError::Authentication(reason)) = &result {
            if self.close(session.id).await.is_some() {
                tracing::info!(
                    login = %session.user.login,
                    session = %session.id,
                    "Backend rejected session token, session closed: {}",
                    reason
                );
            }
        }
        result
    }

    /// Remove expired sessions, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Session token from the Authorization header, falling back to the cookie
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if let Some(token) = bearer {
            return Some(token.to_string());
        }

        CookieJar::from_headers(headers)
            .get(&self.config.cookie_name)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Resolve the live session a request belongs to, if any
    pub async fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
        let token = self.token_from_headers(headers)?;
        let claims = match SessionClaims::from_token(&token, &self.config.jwt_secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                return None;
            }
        };
        self.get(claims.sid).await
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .secure(self.config.cookie_secure)
            .same_site(SameSite::Lax)
            .build()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), "")).path("/").build()
    }

    /// Periodically drop expired sessions
    pub fn spawn_purge_task(&self) -> JoinHandle<()> {
        let store = self.clone();
        let period = Duration::from_secs(self.config.purge_interval_secs.max(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let purged = store.purge_expired().await;
                if purged > 0 {
                    tracing::info!("Purged {} expired sessions", purged);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    fn store() -> SessionStore {
        SessionStore::new(AuthConfig::default())
    }

    fn user() -> SessionUser {
        SessionUser {
            user_id: 3,
            login: "librarian".to_string(),
            display_name: Some("Front Desk".to_string()),
            role_names: ["ManageBorrow".to_string()].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_open_resolve_close() {
        let store = store();
        let (session, token) = store.open(user(), "backend-token".into(), None).await.unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        let resolved = store.resolve(&headers).await.unwrap();
        assert_eq!(resolved.id, session.id);
        assert_eq!(resolved.backend_token, "backend-token");

        assert!(store.close(session.id).await.is_some());
        assert!(store.resolve(&headers).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_from_cookie() {
        let store = store();
        let (session, token) = store.open(user(), "t".into(), None).await.unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; portal_session={}", token)).unwrap(),
        );
        assert_eq!(store.resolve(&headers).await.map(|s| s.id), Some(session.id));
    }

    #[tokio::test]
    async fn test_forged_or_missing_token() {
        let store = store();
        store.open(user(), "t".into(), None).await.unwrap();

        assert!(store.resolve(&HeaderMap::new()).await.is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"));
        assert!(store.resolve(&headers).await.is_none());
    }

    #[tokio::test]
    async fn test_backend_expiry_caps_session() {
        let store = store();
        let past = Utc::now() - chrono::Duration::seconds(5);
        let (session, _) = store.open(user(), "t".into(), Some(past)).await.unwrap();

        assert_eq!(session.expires_at, past);
        assert!(store.get(session.id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_backend_rejection_closes_session() {
        let store = store();
        let (session, _) = store.open(user(), "t".into(), None).await.unwrap();

        let denied: AppResult<()> = Err(AppError::Authorization("not yours".into()));
        assert!(store.close_if_rejected(&session, denied).await.is_err());
        assert!(store.get(session.id).await.is_some());

        let rejected: AppResult<()> = Err(AppError::Authentication("token expired".into()));
        let result = store.close_if_rejected(&session, rejected).await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
        assert!(store.get(session.id).await.is_none());
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_a_configuration_error() {
        let store = SessionStore::new(AuthConfig {
            session_ttl_hours: u64::MAX,
            ..AuthConfig::default()
        });
        let result = store.open(user(), "t".into(), None).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = store();
        let past = Utc::now() - chrono::Duration::seconds(5);
        store.open(user(), "a".into(), Some(past)).await.unwrap();
        store.open(user(), "b".into(), None).await.unwrap();

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
    }
}

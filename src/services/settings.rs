//! System settings

use std::sync::Arc;

use validator::Validate;

use crate::{
    backend::LibraryBackend,
    error::AppResult,
    models::{session::Session, settings::SystemSettings},
    services::sessions::SessionStore,
};

#[derive(Clone)]
pub struct SettingsService {
    backend: Arc<dyn LibraryBackend>,
    sessions: SessionStore,
}

impl SettingsService {
    pub fn new(backend: Arc<dyn LibraryBackend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    pub async fn get_settings(&self, session: &Session) -> AppResult<SystemSettings> {
        let result = self.backend.get_settings(&session.backend_token).await;
        self.sessions.close_if_rejected(session, result).await
    }

    pub async fn update_settings(&self, session: &Session, settings: SystemSettings) -> AppResult<SystemSettings> {
        settings.validate()?;
        let result = self.backend.update_settings(&session.backend_token, &settings).await;
        let updated = self.sessions.close_if_rejected(session, result).await?;
        tracing::info!(login = %session.user.login, "System settings updated");
        Ok(updated)
    }
}

//! Business logic services

pub mod auth;
pub mod catalog;
pub mod circulation;
pub mod sessions;
pub mod settings;

use std::sync::Arc;

use crate::{
    backend::LibraryBackend,
    config::{AuthConfig, PortalConfig},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn LibraryBackend>,
    pub sessions: sessions::SessionStore,
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub settings: settings::SettingsService,
}

impl Services {
    /// Create all services on top of the given backend
    pub fn new(backend: Arc<dyn LibraryBackend>, auth_config: AuthConfig, portal_config: &PortalConfig) -> Self {
        let sessions = sessions::SessionStore::new(auth_config);
        Self {
            auth: auth::AuthService::new(backend.clone(), sessions.clone(), portal_config),
            catalog: catalog::CatalogService::new(backend.clone(), sessions.clone()),
            circulation: circulation::CirculationService::new(backend.clone(), sessions.clone()),
            settings: settings::SettingsService::new(backend.clone(), sessions.clone()),
            sessions,
            backend,
        }
    }
}

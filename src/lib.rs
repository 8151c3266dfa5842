//! Library Portal
//!
//! Server side of the library administration and public portal: serves the
//! single-page application behind a role-based route guard, owns the
//! signed-in sessions and bridges the SPA to the library REST backend.

use std::sync::Arc;

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use crate::{
    backend::LibraryBackend,
    guard::{Destinations, RouteTable},
    services::Services,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
    pub routes: Arc<RouteTable>,
    pub destinations: Arc<Destinations>,
}

impl AppState {
    /// Build the state, validating the route table against the configured
    /// guard destinations
    pub fn new(config: AppConfig, backend: Arc<dyn LibraryBackend>) -> AppResult<Self> {
        config.auth.session_ttl()?;
        let destinations = Destinations::from(&config.portal);
        let routes = RouteTable::portal(&destinations)?;
        let services = Services::new(backend, config.auth.clone(), &config.portal);

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
            routes: Arc::new(routes),
            destinations: Arc::new(destinations),
        })
    }
}

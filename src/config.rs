//! Configuration management for the library portal

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::error::{AppError, AppResult};

/// Longest session lifetime accepted from configuration
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 366;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Library REST backend the portal forwards to
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_hours: u64,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// Interval between sweeps of expired sessions
    pub purge_interval_secs: u64,
}

/// Navigation destinations used by the route guard
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PortalConfig {
    pub admin_prefix: String,
    pub admin_login: String,
    pub login: String,
    pub access_denied: String,
    /// Landing page for signed-in readers without a management role
    pub reader_home: String,
    /// Directory holding the built single-page application
    pub static_dir: String,
    pub index_file: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // PORTAL_AUTH__JWT_SECRET, PORTAL_BACKEND__URL, ...
            .add_source(
                Environment::with_prefix("PORTAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("backend.url", env::var("BACKEND_URL").ok())?
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl AuthConfig {
    /// Session lifetime, between one hour and [`MAX_SESSION_TTL_HOURS`]
    pub fn session_ttl(&self) -> AppResult<chrono::Duration> {
        Some(self.session_ttl_hours)
            .filter(|hours| (1..=MAX_SESSION_TTL_HOURS).contains(hours))
            .and_then(|hours| i64::try_from(hours).ok())
            .and_then(chrono::Duration::try_hours)
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "auth.session_ttl_hours must be between 1 and {}, got {}",
                    MAX_SESSION_TTL_HOURS, self.session_ttl_hours
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:9000/api".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-this-secret-in-production".to_string(),
            session_ttl_hours: 8,
            cookie_name: "portal_session".to_string(),
            cookie_secure: false,
            purge_interval_secs: 300,
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            admin_prefix: "/admin".to_string(),
            admin_login: "/admin/login".to_string(),
            login: "/login".to_string(),
            access_denied: "/access-denied".to_string(),
            reader_home: "/reader".to_string(),
            static_dir: "public".to_string(),
            index_file: "index.html".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

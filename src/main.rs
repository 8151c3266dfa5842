//! Library Portal server
//!
//! Serves the portal SPA and its JSON API.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_portal::{api, backend::HttpBackend, config::AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_portal={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Library Portal v{}", env!("CARGO_PKG_VERSION"));

    let backend = HttpBackend::new(&config.backend)?;
    tracing::info!("Library backend at {}", config.backend.url);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    // Validates the route table; a bad table stops startup
    let state = AppState::new(config, Arc::new(backend))?;
    tracing::info!("Route table loaded with {} rules", state.routes.rules().len());

    state.services.sessions.spawn_purge_task();

    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

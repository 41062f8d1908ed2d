//! # cea-api: Binary Entry Point
//!
//! Binds to `PORT` (default 8080). `SESSION_TTL_SECS` caps API session
//! lifetime (default 3600). Without backend configuration the
//! service still starts; backend-bound routes answer 503.

use cea_api::state::{AppConfig, AppState, DEFAULT_SESSION_TTL_SECS};
use cea_backend::{BackendClient, BackendConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let session_ttl_secs: u64 = std::env::var("SESSION_TTL_SECS")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_SESSION_TTL_SECS);
    let config = AppConfig {
        port,
        session_ttl_secs,
    };

    let backend = match BackendConfig::from_env() {
        Ok(backend_config) => {
            tracing::info!(url = %backend_config.base_url, "backend configured");
            match BackendClient::new(backend_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("Failed to create backend client: {e}");
                    return Err(e.into());
                }
            }
        }
        Err(e) => {
            tracing::warn!("Backend not configured: {e}. Backend routes will return 503.");
            None
        }
    };

    let app = cea_api::app(AppState::with_config(config, backend));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("CEA agent desk API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Maestro API server entry point.

use std::sync::{Arc, Mutex};

use maestro_api::config::Config;
use maestro_api::error::AppError;
use maestro_api::state::AppState;
use maestro_bridge::http_host::HttpHost;
use maestro_core::clock::SystemClock;
use maestro_core::host::{Host, SoundEndRegistry};
use maestro_core::rng::{DeterministicRng, SystemRng};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Maestro API server");

    let config = Config::from_env()?;

    // Connect to the host bridge. Sound-end events arrive on the hooks route
    // and wake watchers through the shared registry.
    let sound_end = Arc::new(SoundEndRegistry::new());
    let host: Arc<dyn Host> = Arc::new(HttpHost::new(
        &config.bridge_url,
        &config.user_id,
        Arc::clone(&sound_end),
    )?);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(SystemRng::new()));

    let app_state = AppState::new(host, sound_end, Arc::new(SystemClock), rng);

    // TODO: Replace CorsLayer::permissive() with the bridge's origin once it is configurable.
    let app = maestro_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!(bridge_url = %config.bridge_url, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

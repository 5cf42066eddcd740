//! Maestro API — HTTP adapter for the playback conductor.
//!
//! The tabletop host posts its lifecycle hooks here; the imperative playback
//! and override endpoints are served alongside.

use axum::Router;

pub mod conductor;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use crate::state::AppState;

/// Builds the full application router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/hooks", routes::hooks::router())
        .nest("/api/v1/playback", routes::playback::router())
        .nest("/api/v1/tracks", routes::tracks::router())
        .merge(routes::status::router())
        .with_state(app_state)
}

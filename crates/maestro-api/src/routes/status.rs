//! Session diagnostics endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};

use crate::conductor::SessionStatus;
use crate::state::AppState;

/// GET /api/v1/status
async fn status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.conductor.status().await)
}

/// Returns the status router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/status", get(status))
}

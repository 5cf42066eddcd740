//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use maestro_core::host::Host;
use maestro_core::rng::DeterministicRng;
use maestro_test_support::{InMemoryHost, SequenceRng, fixed_clock};
use tower::ServiceExt;

use maestro_api::build_router;
use maestro_api::state::AppState;

/// Build the full app router over an in-memory host with a fixed clock.
/// The host's own user is the active game master, so this session is
/// authoritative.
pub fn build_test_app(host: &Arc<InMemoryHost>) -> Router {
    build_test_app_with_rng(host, SequenceRng::new(vec![]))
}

/// Build the full app router with a custom `SequenceRng` for tests that need
/// deterministic `random-track` picks.
pub fn build_test_app_with_rng(host: &Arc<InMemoryHost>, rng: SequenceRng) -> Router {
    let sound_end = host.sound_end_registry();
    let dyn_host: Arc<dyn Host> = host.clone();
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let app_state = AppState::new(dyn_host, sound_end, Arc::new(fixed_clock()), rng);
    build_router(app_state)
}

/// Send a request with an optional JSON body and return the response. Empty
/// bodies decode as `Null`.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(serde_json::to_vec(body).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, Some(body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "PUT", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "GET", uri, None).await
}

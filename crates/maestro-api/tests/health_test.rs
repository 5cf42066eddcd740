//! Integration tests for the health endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use maestro_test_support::InMemoryHost;

#[tokio::test]
async fn test_health_reports_session_user() {
    let host = Arc::new(InMemoryHost::new("gm-7"));
    let app = common::build_test_app(&host);

    let (status, json) = common::get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["user_id"], "gm-7");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = common::build_test_app(&Arc::new(InMemoryHost::default()));

    let (status, _) = common::get_json(app, "/api/v1/nothing-here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

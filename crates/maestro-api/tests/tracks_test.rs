//! Integration tests for the track override routes.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use maestro_core::documents::Actor;
use maestro_core::host::DocumentRef;
use maestro_test_support::InMemoryHost;
use serde_json::{Value, json};

#[tokio::test]
async fn test_actor_override_round_trip() {
    // Arrange
    let host = Arc::new(InMemoryHost::default().with_actor(Actor {
        id: "a1".to_owned(),
        name: "Brakka".to_owned(),
        flags: Value::Null,
    }));
    let app = common::build_test_app(&host);

    // Act
    let (status, _) = common::put_json(
        app.clone(),
        "/api/v1/tracks/actors/a1",
        &json!({ "playlist": "hype", "track": "war-cry" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = common::get_json(app, "/api/v1/tracks/actors/a1").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["actorId"], "a1");
    assert_eq!(json["playlist"], "hype");
    assert_eq!(json["track"], "war-cry");
}

#[tokio::test]
async fn test_blank_track_clears_actor_override_field() {
    let host = Arc::new(InMemoryHost::default().with_actor(Actor {
        id: "a1".to_owned(),
        name: "Brakka".to_owned(),
        flags: json!({ "playlist": "hype", "track": "war-cry" }),
    }));
    let app = common::build_test_app(&host);

    let (status, json) = common::put_json(
        app,
        "/api/v1/tracks/actors/a1",
        &json!({ "playlist": "hype", "track": "  " }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["track"].is_null());
}

#[tokio::test]
async fn test_combat_override_is_written_to_encounter() {
    let host = Arc::new(InMemoryHost::default());

    let (status, json) = common::put_json(
        common::build_test_app(&host),
        "/api/v1/tracks/combats/c1",
        &json!({ "playlist": "battle", "track": "random-track" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["track"], "random-track");
    let flags = host.flags_of(&DocumentRef::Combat("c1".to_owned()));
    assert_eq!(flags["playlist"], "battle");
}

#[tokio::test]
async fn test_set_track_on_missing_item_returns_404() {
    let host = Arc::new(InMemoryHost::default());

    let (status, json) = common::put_json(
        common::build_test_app(&host),
        "/api/v1/tracks/items/ghost?actor=a1",
        &json!({ "playlist": "items", "track": "horn" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

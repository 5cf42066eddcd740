//! Integration tests for the host hook routes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use maestro_core::documents::{Actor, Item};
use maestro_core::host::{DocumentRef, SoundKey};
use maestro_test_support::{HostCall, InMemoryHost, playlist, sound};
use serde_json::json;

fn running_combat(actor: &str) -> serde_json::Value {
    json!({
        "id": "c1",
        "round": 1,
        "turn": 0,
        "combatantCount": 2,
        "actingActorId": actor
    })
}

#[tokio::test]
async fn test_hype_track_end_resumes_paused_ambience() {
    // Arrange
    let mut ambience = playlist("amb", "Ambience", &[]);
    ambience.sounds.push(sound("rain", true));
    let host = Arc::new(
        InMemoryHost::default()
            .with_settings(json!({ "hype": { "enabled": true, "pauseOthers": true } }))
            .with_playlist(ambience)
            .with_playlist(playlist("hype", "Hype Tracks", &["fanfare"]))
            .with_actor(Actor {
                id: "a1".to_owned(),
                name: "Hero".to_owned(),
                flags: json!({ "playlist": "hype", "track": "fanfare" }),
            }),
    );

    let app = common::build_test_app(&host);

    // Act
    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/hooks/combat-updated",
        &json!({ "previousRound": 1, "turnChanged": true, "combat": running_combat("a1") }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hypeWatching"], true);

    let (status, _) = common::post_json(
        app,
        "/api/v1/hooks/sound-ended",
        &json!({ "playlistId": "hype", "soundId": "fanfare" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut resumed = Vec::new();
    for _ in 0..50 {
        resumed = host.resumed();
        if !resumed.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Assert
    assert_eq!(resumed, vec![SoundKey::new("amb", "rain")]);
}

#[tokio::test]
async fn test_combat_lifecycle_is_visible_in_status() {
    // Arrange
    let host = Arc::new(
        InMemoryHost::default()
            .with_settings(json!({
                "combat": { "enabled": true, "defaultPlaylist": "battle", "defaultTrack": "drums" }
            }))
            .with_playlist(playlist("battle", "Battle", &["drums"])),
    );
    let app = common::build_test_app(&host);

    // Act
    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/hooks/combat-updated",
        &json!({ "previousRound": 0, "combat": running_combat("a1") }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["combatStarted"], true);

    let (_, during) = common::get_json(app.clone(), "/api/v1/status").await;

    let (status, _) = common::post_json(
        app.clone(),
        "/api/v1/hooks/combat-deleted",
        &json!({ "combat": running_combat("a1") }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = common::get_json(app, "/api/v1/status").await;

    // Assert
    assert!(during["combat"]["active"].is_object());
    assert!(after["combat"]["active"].is_null());
    assert!(host.play_calls().contains(&HostCall::PlaySound(SoundKey::new("battle", "drums"))));
}

#[tokio::test]
async fn test_natural_twenty_plays_success_stinger() {
    // Arrange
    let host = Arc::new(
        InMemoryHost::default()
            .with_settings(json!({
                "critical": {
                    "enabled": true,
                    "successPlaylist": "stingers",
                    "successSound": "fanfare"
                }
            }))
            .with_playlist(playlist("stingers", "Critical Success", &["fanfare"])),
    );
    let message = json!({
        "message": {
            "id": "m1",
            "isRoll": true,
            "contentVisible": true,
            "rolls": [{
                "dice": [{ "faces": 20, "results": [{ "result": 20 }], "total": 20 }],
                "total": 20
            }]
        }
    });

    // Act
    let (status, json) = common::post_json(
        common::build_test_app(&host),
        "/api/v1/hooks/chat-message",
        &message,
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["criticals"].as_array().unwrap().len(), 1);
    assert_eq!(json["criticals"][0]["success"]["track"], "fanfare");
    assert_eq!(
        host.play_calls(),
        vec![HostCall::PlaySound(SoundKey::new("stingers", "fanfare"))]
    );
}

#[tokio::test]
async fn test_item_card_plays_once_per_message() {
    // Arrange
    let host = Arc::new(
        InMemoryHost::default()
            .with_settings(json!({ "item": { "enabled": true } }))
            .with_playlist(playlist("items", "Item Tracks", &["horn"]))
            .with_item(Item {
                id: "i1".to_owned(),
                name: "Horn".to_owned(),
                actor_id: None,
                flags: json!({ "playlist": "items", "track": "horn" }),
            }),
    );
    let app = common::build_test_app(&host);
    let card = json!({ "message": { "id": "m1", "itemCardId": "i1" } });

    // Act
    let (status, first) = common::post_json(
        app.clone(),
        "/api/v1/hooks/chat-message",
        &card,
    )
    .await;
    let marked = host.flags_of(&DocumentRef::ChatMessage("m1".to_owned()));
    let rerendered = json!({
        "message": { "id": "m1", "itemCardId": "i1", "flags": marked }
    });
    let (_, second) = common::post_json(
        app,
        "/api/v1/hooks/chat-message",
        &rerendered,
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["itemTrack"]["track"], "horn");
    assert!(second["itemTrack"].is_null());
    assert_eq!(host.play_calls().len(), 1);
}

#[tokio::test]
async fn test_deleted_owned_item_override_is_remembered() {
    let host = Arc::new(InMemoryHost::default().with_settings(json!({ "item": { "enabled": true } })));
    let item = json!({
        "item": {
            "id": "i5",
            "name": "Lute",
            "actorId": "a1",
            "flags": { "playlist": "items", "track": "lute" }
        }
    });

    let app = common::build_test_app(&host);

    let (status, json) = common::post_json(app.clone(), "/api/v1/hooks/item-deleted", &item).await;
    let (_, deleted) = common::get_json(app, "/api/v1/tracks/deleted-items").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["remembered"], true);
    assert_eq!(deleted["i5"]["track"], "lute");
}

#[tokio::test]
async fn test_ready_creates_enabled_playlists() {
    let host = Arc::new(InMemoryHost::default().with_settings(json!({
        "hype": { "enabled": true },
        "item": { "enabled": true, "createPlaylist": true }
    })));

    let (status, json) =
        common::post_json(common::build_test_app(&host), "/api/v1/hooks/ready", &json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hype"]["name"], "Hype Tracks");
    assert_eq!(json["item"]["name"], "Item Tracks");
    assert!(json["combat"].is_null());
    assert!(
        host.calls()
            .contains(&HostCall::CreatePlaylist("Hype Tracks".to_owned()))
    );
}

//! Routes receiving the tabletop host's lifecycle hooks.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use maestro_core::documents::{ChatMessage, Combat, Item};
use maestro_core::host::SoundKey;
use maestro_item::domain::commands::ItemDeleted;
use maestro_playback::domain::commands::SoundUpdate;
use maestro_playback::domain::loop_guard::LoopDecision;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::conductor::{ChatOutcome, EncounterOutcome, ProvisionReport};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /combat-updated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatUpdatedRequest {
    /// Round before the update.
    pub previous_round: u32,
    /// Whether the update changed the acting combatant.
    #[serde(default)]
    pub turn_changed: bool,
    /// Encounter after the update.
    pub combat: Combat,
}

/// Request body for POST /combat-deleted.
#[derive(Debug, Deserialize)]
pub struct CombatDeletedRequest {
    /// The deleted encounter.
    pub combat: Combat,
}

/// Request body for the chat message hooks.
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    /// The message.
    pub message: ChatMessage,
}

/// Response body for POST /pre-create-chat-message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreCreateResponse {
    /// Clear the message's sound before creating it.
    pub strip_sound: bool,
}

/// Request body for POST /sound-ended.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundEndedRequest {
    /// Owning playlist.
    pub playlist_id: String,
    /// The sound that finished.
    pub sound_id: String,
}

/// Response body for POST /sound-ended.
#[derive(Debug, Serialize)]
pub struct SoundEndedResponse {
    /// Watches woken by the event.
    pub woken: usize,
}

/// Request body for POST /item-deleted.
#[derive(Debug, Deserialize)]
pub struct ItemDeletedRequest {
    /// The item as it was before deletion.
    pub item: Item,
}

/// Response body for POST /item-deleted.
#[derive(Debug, Serialize)]
pub struct ItemDeletedResponse {
    /// Whether the item's override was remembered.
    pub remembered: bool,
}

/// Request body for POST /pre-update-sound.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreUpdateSoundRequest {
    /// Owning playlist.
    pub playlist_id: String,
    /// Sound being updated.
    pub sound_id: String,
    /// Incoming playing state, if the update touches it.
    #[serde(default)]
    pub playing: Option<bool>,
}

/// Response body for POST /teardown.
#[derive(Debug, Serialize)]
pub struct TeardownResponse {
    /// Sounds resumed.
    pub resumed: usize,
}

/// POST /ready
#[instrument(skip(state))]
async fn ready(State(state): State<AppState>) -> Json<ProvisionReport> {
    Json(state.conductor.on_ready().await)
}

/// POST /combat-updated
#[instrument(skip(state, request), fields(combat_id = %request.combat.id))]
async fn combat_updated(
    State(state): State<AppState>,
    Json(request): Json<CombatUpdatedRequest>,
) -> Json<EncounterOutcome> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling combat_updated hook");
    Json(
        state
            .conductor
            .on_encounter_updated(
                correlation_id,
                request.previous_round,
                request.turn_changed,
                request.combat,
            )
            .await,
    )
}

/// POST /combat-deleted
#[instrument(skip(state, request), fields(combat_id = %request.combat.id))]
async fn combat_deleted(
    State(state): State<AppState>,
    Json(request): Json<CombatDeletedRequest>,
) -> StatusCode {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling combat_deleted hook");
    state
        .conductor
        .on_encounter_deleted(correlation_id, request.combat)
        .await;
    StatusCode::NO_CONTENT
}

/// POST /chat-message
#[instrument(skip(state, request), fields(message_id = %request.message.id))]
async fn chat_message(
    State(state): State<AppState>,
    Json(request): Json<ChatMessageRequest>,
) -> Json<ChatOutcome> {
    Json(
        state
            .conductor
            .on_chat_message(Uuid::new_v4(), request.message)
            .await,
    )
}

/// POST /pre-create-chat-message
#[instrument(skip(state, request))]
async fn pre_create_chat_message(
    State(state): State<AppState>,
    Json(request): Json<ChatMessageRequest>,
) -> Json<PreCreateResponse> {
    let strip_sound = state
        .conductor
        .on_chat_message_creating(Uuid::new_v4(), request.message)
        .await;
    Json(PreCreateResponse { strip_sound })
}

/// POST /sound-ended
#[instrument(skip(state, request), fields(playlist_id = %request.playlist_id, sound_id = %request.sound_id))]
async fn sound_ended(
    State(state): State<AppState>,
    Json(request): Json<SoundEndedRequest>,
) -> Json<SoundEndedResponse> {
    let key = SoundKey::new(request.playlist_id, request.sound_id);
    Json(SoundEndedResponse {
        woken: state.conductor.on_sound_ended(&key),
    })
}

/// POST /item-deleted
#[instrument(skip(state, request), fields(item_id = %request.item.id))]
async fn item_deleted(
    State(state): State<AppState>,
    Json(request): Json<ItemDeletedRequest>,
) -> Json<ItemDeletedResponse> {
    let command = ItemDeleted {
        correlation_id: Uuid::new_v4(),
        item: request.item,
    };
    Json(ItemDeletedResponse {
        remembered: state.conductor.on_item_deleted(&command).await,
    })
}

/// POST /pre-update-sound
#[instrument(skip(state, request), fields(playlist_id = %request.playlist_id, sound_id = %request.sound_id))]
async fn pre_update_sound(
    State(state): State<AppState>,
    Json(request): Json<PreUpdateSoundRequest>,
) -> Result<Json<LoopDecision>, ApiError> {
    let command = SoundUpdate {
        correlation_id: Uuid::new_v4(),
        playlist_id: request.playlist_id,
        sound_id: request.sound_id,
        playing: request.playing,
    };
    let decision = state
        .conductor
        .driver()
        .handle_sound_update(&command)
        .await?;
    Ok(Json(decision))
}

/// POST /teardown
#[instrument(skip(state))]
async fn teardown(State(state): State<AppState>) -> Json<TeardownResponse> {
    Json(TeardownResponse {
        resumed: state.conductor.teardown().await,
    })
}

/// Returns the router for host hooks.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ready", post(ready))
        .route("/combat-updated", post(combat_updated))
        .route("/combat-deleted", post(combat_deleted))
        .route("/chat-message", post(chat_message))
        .route("/pre-create-chat-message", post(pre_create_chat_message))
        .route("/sound-ended", post(sound_ended))
        .route("/item-deleted", post(item_deleted))
        .route("/pre-update-sound", post(pre_update_sound))
        .route("/teardown", post(teardown))
}

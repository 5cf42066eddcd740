//! Routes for reading and editing per-document track overrides.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::{Json, Router, routing::get, routing::put};
use maestro_combat::application::query_handlers::{CombatDefaultsView, get_combat_defaults};
use maestro_combat::domain::commands::{SetCombatDefaults, SetCombatTrack};
use maestro_core::resolver::TrackOverride;
use maestro_hype::application::query_handlers::{ActorHypeView, get_actor_hype};
use maestro_hype::domain::commands::SetHypeTrack;
use maestro_item::application::query_handlers::{ItemTrackView, get_item_track, list_deleted_items};
use maestro_item::domain::commands::SetItemTrack;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for every override PUT.
#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    /// Playlist identifier; blank clears it.
    #[serde(default)]
    pub playlist: String,
    /// Track identifier or mode token; blank clears it.
    #[serde(default)]
    pub track: String,
}

/// Query string for the item routes.
#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    /// Owning actor, for owned items.
    #[serde(default)]
    pub actor: Option<String>,
}

/// GET /actors/{actor_id}
#[instrument(skip(state))]
async fn get_actor_track(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
) -> Result<Json<ActorHypeView>, ApiError> {
    let view = get_actor_hype(state.host.as_ref(), &actor_id).await?;
    Ok(Json(view))
}

/// PUT /actors/{actor_id}
#[instrument(skip(state, request))]
async fn set_actor_track(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
    Json(request): Json<TrackRequest>,
) -> Result<Json<TrackOverride>, ApiError> {
    let command = SetHypeTrack {
        correlation_id: Uuid::new_v4(),
        actor_id,
        playlist: request.playlist,
        track: request.track,
    };

    info!(correlation_id = %command.correlation_id, "handling set_hype_track command");

    let value = state.conductor.hype().set_hype_track(&command).await?;
    Ok(Json(value))
}

/// PUT /combats/{combat_id}
#[instrument(skip(state, request))]
async fn set_combat_track(
    State(state): State<AppState>,
    Path(combat_id): Path<String>,
    Json(request): Json<TrackRequest>,
) -> Result<Json<TrackOverride>, ApiError> {
    let command = SetCombatTrack {
        correlation_id: Uuid::new_v4(),
        combat_id,
        playlist: request.playlist,
        track: request.track,
    };

    info!(correlation_id = %command.correlation_id, "handling set_combat_track command");

    let value = state.conductor.combat().set_combat_track(&command).await?;
    Ok(Json(value))
}

/// GET /combat-defaults
#[instrument(skip(state))]
async fn combat_defaults(State(state): State<AppState>) -> Result<Json<CombatDefaultsView>, ApiError> {
    let view = get_combat_defaults(state.host.as_ref()).await?;
    Ok(Json(view))
}

/// PUT /combat-defaults
#[instrument(skip(state, request))]
async fn set_combat_defaults(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> Result<Json<TrackOverride>, ApiError> {
    let command = SetCombatDefaults {
        correlation_id: Uuid::new_v4(),
        playlist: request.playlist,
        track: request.track,
    };
    let value = state.conductor.combat().set_combat_defaults(&command).await?;
    Ok(Json(value))
}

/// GET /items/{item_id}
#[instrument(skip(state, query))]
async fn item_track(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<ItemTrackView>, ApiError> {
    let view = get_item_track(state.host.as_ref(), query.actor.as_deref(), &item_id).await?;
    Ok(Json(view))
}

/// PUT /items/{item_id}
#[instrument(skip(state, query, request))]
async fn set_item_track(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(query): Query<ItemQuery>,
    Json(request): Json<TrackRequest>,
) -> Result<Json<TrackOverride>, ApiError> {
    let command = SetItemTrack {
        correlation_id: Uuid::new_v4(),
        actor_id: query.actor,
        item_id,
        playlist: request.playlist,
        track: request.track,
    };

    info!(correlation_id = %command.correlation_id, "handling set_item_track command");

    let value = state.conductor.item().set_item_track(&command).await?;
    Ok(Json(value))
}

/// GET /deleted-items
#[instrument(skip(state))]
async fn deleted_items(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, TrackOverride>>, ApiError> {
    let items = list_deleted_items(state.host.as_ref()).await?;
    Ok(Json(items))
}

/// Returns the router for track overrides.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/actors/{actor_id}", get(get_actor_track).put(set_actor_track))
        .route("/combats/{combat_id}", put(set_combat_track))
        .route(
            "/combat-defaults",
            get(combat_defaults).put(set_combat_defaults),
        )
        .route("/items/{item_id}", get(item_track).put(set_item_track))
        .route("/deleted-items", get(deleted_items))
}

//! Routes for imperative playback control.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post, routing::put};
use maestro_core::error::DomainError;
use maestro_core::host::SoundKey;
use maestro_hype::domain::commands::PlayHype;
use maestro_playback::application::query_handlers::{self, SoundView};
use maestro_playback::domain::aggregates::PausedSound;
use maestro_playback::domain::commands::{
    FindBy, PauseSounds, PlaySoundByName, ResumeSounds, SetPlaylistLoop,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /play-hype.
#[derive(Debug, Deserialize)]
pub struct PlayHypeRequest {
    /// Actor id or name.
    pub actor: String,
}

/// Request body for POST /pause and POST /resume.
#[derive(Debug, Deserialize)]
pub struct SoundsRequest {
    /// Sound ids, names or paths.
    pub sounds: Vec<String>,
}

/// Request body for POST /play-by-name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayByNameRequest {
    /// Value to match.
    pub search: String,
    /// Restrict the search to this playlist.
    #[serde(default)]
    pub playlist_id: Option<String>,
    /// Field to match on.
    #[serde(default)]
    pub find_by: FindBy,
}

/// Query string for GET /find-sound.
#[derive(Debug, Deserialize)]
pub struct FindSoundQuery {
    /// Value to match.
    pub search: String,
    /// Field to match on.
    #[serde(default)]
    pub by: FindBy,
}

/// Request body for PUT /playlists/{playlist_id}/loop.
#[derive(Debug, Deserialize)]
pub struct LoopRequest {
    /// Whether the playlist should loop.
    pub enabled: bool,
}

/// Response body for commands that may start a sound.
#[derive(Debug, Serialize)]
pub struct PlayResponse {
    /// The sound started, if a concrete one was.
    pub sound: Option<SoundKey>,
}

/// Response body for pause commands.
#[derive(Debug, Serialize)]
pub struct PausedResponse {
    /// Sounds paused, with their positions.
    pub paused: Vec<PausedSound>,
}

/// Response body for POST /resume.
#[derive(Debug, Serialize)]
pub struct ResumedResponse {
    /// Sounds resumed.
    pub resumed: Vec<SoundKey>,
}

/// POST /play-hype
#[instrument(skip(state, request), fields(actor = %request.actor))]
async fn play_hype(
    State(state): State<AppState>,
    Json(request): Json<PlayHypeRequest>,
) -> Result<Json<PlayResponse>, ApiError> {
    let command = PlayHype {
        correlation_id: Uuid::new_v4(),
        actor: request.actor,
    };

    info!(correlation_id = %command.correlation_id, "handling play_hype command");

    let sound = state.conductor.hype().play_hype(&command).await?;
    Ok(Json(PlayResponse { sound }))
}

/// POST /pause
#[instrument(skip(state, request))]
async fn pause(
    State(state): State<AppState>,
    Json(request): Json<SoundsRequest>,
) -> Result<Json<PausedResponse>, ApiError> {
    let command = PauseSounds {
        correlation_id: Uuid::new_v4(),
        sounds: request.sounds,
    };
    let paused = state.conductor.driver().pause_sounds(&command).await?;
    Ok(Json(PausedResponse { paused }))
}

/// POST /pause-all
#[instrument(skip(state))]
async fn pause_all(State(state): State<AppState>) -> Result<Json<PausedResponse>, ApiError> {
    let paused = state.conductor.driver().pause_all_playing().await?;
    Ok(Json(PausedResponse { paused }))
}

/// POST /resume
#[instrument(skip(state, request))]
async fn resume(
    State(state): State<AppState>,
    Json(request): Json<SoundsRequest>,
) -> Result<Json<ResumedResponse>, ApiError> {
    let command = ResumeSounds {
        correlation_id: Uuid::new_v4(),
        sounds: request.sounds,
    };
    let resumed = state.conductor.driver().resume_sounds(&command).await?;
    Ok(Json(ResumedResponse { resumed }))
}

/// GET /find-sound
#[instrument(skip(state, query), fields(search = %query.search))]
async fn find_sound(
    State(state): State<AppState>,
    Query(query): Query<FindSoundQuery>,
) -> Result<Json<SoundView>, ApiError> {
    let view = query_handlers::find_sound(state.host.as_ref(), &query.search, query.by)
        .await?
        .ok_or_else(|| DomainError::not_found("sound", query.search.clone()))?;
    Ok(Json(view))
}

/// POST /play-by-name
#[instrument(skip(state, request), fields(search = %request.search))]
async fn play_by_name(
    State(state): State<AppState>,
    Json(request): Json<PlayByNameRequest>,
) -> Result<Json<PlayResponse>, ApiError> {
    let command = PlaySoundByName {
        correlation_id: Uuid::new_v4(),
        search: request.search,
        playlist_id: request.playlist_id,
        find_by: request.find_by,
    };
    let sound = state.conductor.driver().play_sound_by_name(&command).await?;
    Ok(Json(PlayResponse { sound }))
}

/// GET /playlists/{playlist_id}/sounds
#[instrument(skip(state))]
async fn playlist_sounds(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<Json<Vec<SoundView>>, ApiError> {
    let sounds = query_handlers::playlist_sounds(state.host.as_ref(), &playlist_id).await?;
    Ok(Json(sounds))
}

/// PUT /playlists/{playlist_id}/loop
#[instrument(skip(state, request))]
async fn set_playlist_loop(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    Json(request): Json<LoopRequest>,
) -> Result<StatusCode, ApiError> {
    let command = SetPlaylistLoop {
        correlation_id: Uuid::new_v4(),
        playlist_id,
        enabled: request.enabled,
    };
    state.conductor.driver().set_playlist_loop(&command).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for imperative playback.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/play-hype", post(play_hype))
        .route("/pause", post(pause))
        .route("/pause-all", post(pause_all))
        .route("/resume", post(resume))
        .route("/find-sound", get(find_sound))
        .route("/play-by-name", post(play_by_name))
        .route("/playlists/{playlist_id}/sounds", get(playlist_sounds))
        .route("/playlists/{playlist_id}/loop", put(set_playlist_loop))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use maestro_core::host::{Host, SoundEndRegistry};
    use maestro_core::rng::DeterministicRng;
    use maestro_test_support::{FailingHost, InMemoryHost, MockRng, fixed_clock, playlist, sound};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    fn app_state_with(host: Arc<dyn Host>) -> AppState {
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        AppState::new(
            host,
            Arc::new(SoundEndRegistry::new()),
            Arc::new(fixed_clock()),
            rng,
        )
    }

    fn ambience_host() -> Arc<dyn Host> {
        let mut ambience = playlist("amb", "Ambience", &[]);
        ambience.sounds.push(sound("rain", true));
        ambience.sounds.push(sound("wind", false));
        Arc::new(InMemoryHost::default().with_playlist(ambience))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&Value>) -> (StatusCode, Value) {
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
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_pause_all_returns_paused_positions() {
        // Arrange
        let app = router().with_state(app_state_with(ambience_host()));

        // Act
        let (status, json) = send(app, "POST", "/pause-all", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let paused = json["paused"].as_array().unwrap();
        assert_eq!(paused.len(), 1);
        assert_eq!(paused[0]["key"]["soundId"], "rain");
        assert_eq!(paused[0]["position"], 30.0);
    }

    #[tokio::test]
    async fn test_find_sound_by_name() {
        let app = router().with_state(app_state_with(ambience_host()));

        let (status, json) = send(app, "GET", "/find-sound?search=wind%20name", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["key"]["soundId"], "wind");
        assert_eq!(json["playlistName"], "Ambience");
    }

    #[tokio::test]
    async fn test_find_sound_miss_returns_404() {
        let app = router().with_state(app_state_with(ambience_host()));

        let (status, json) = send(app, "GET", "/find-sound?search=thunder&by=id", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_set_loop_on_missing_playlist_returns_404() {
        let app = router().with_state(app_state_with(ambience_host()));

        let (status, _) = send(
            app,
            "PUT",
            "/playlists/nope/loop",
            Some(&json!({ "enabled": false })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pause_all_returns_502_when_host_fails() {
        let app = router().with_state(app_state_with(Arc::new(FailingHost::default())));

        let (status, json) = send(app, "POST", "/pause-all", None).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "bridge_error");
    }
}

//! Command handlers for the Hype Track context.
//!
//! [`HypeEngine`] owns the hype state behind an async mutex that is held for
//! the whole of each transition, so two triggers never interleave their
//! stop/pause/start steps. Host failures inside a transition are absorbed
//! into the session error counter; the remaining steps still run.

use std::sync::Arc;

use maestro_core::authority::Authority;
use maestro_core::diagnostics::EngineStatus;
use maestro_core::documents::{Actor, Playlist};
use maestro_core::error::DomainError;
use maestro_core::host::{DocumentRef, SoundKey};
use maestro_core::resolver::{TrackOverride, parse_override, resolve};
use maestro_core::selection::{OwnerId, Selection, TrackChoice};
use maestro_core::settings::HypeSettings;
use maestro_playback::application::command_handlers::PlaybackDriver;
use tokio::sync::{Mutex, oneshot, watch};
use tracing::{debug, info, warn};

use crate::HYPE_PLAYLIST_NAME;
use crate::domain::aggregates::{HypeTrack, TurnPlan};
use crate::domain::commands::{EncounterEnded, PlayHype, SetHypeTrack, TurnChanged};

/// A pending "track ended" notification for the record `(selection, owner)`.
#[derive(Debug)]
pub struct TrackEndWatch {
    /// Selection that was recorded when the watch was registered.
    pub selection: Selection,
    /// Owner that was recorded when the watch was registered.
    pub owner: OwnerId,
    ended: oneshot::Receiver<()>,
    generation: u64,
    superseded: watch::Receiver<u64>,
}

/// Arbitrates the per-turn hype track.
pub struct HypeEngine {
    driver: PlaybackDriver,
    authority: Arc<dyn Authority>,
    state: Mutex<HypeTrack>,
    generation: watch::Sender<u64>,
}

impl HypeEngine {
    /// Creates an engine with an empty record and stack.
    #[must_use]
    pub fn new(driver: PlaybackDriver, authority: Arc<dyn Authority>) -> Self {
        Self {
            driver,
            authority,
            state: Mutex::new(HypeTrack::new()),
            generation: watch::Sender::new(0),
        }
    }

    fn publish(&self, state: &HypeTrack) {
        self.generation.send_replace(state.generation());
    }

    /// Per-field defaults; a blank default playlist falls back to the
    /// provisioned hype playlist.
    async fn defaults(&self, settings: &HypeSettings) -> TrackOverride {
        let mut defaults = settings.defaults();
        if defaults.playlist.is_none() {
            let found = self
                .driver
                .errors()
                .absorb(
                    "find hype playlist",
                    self.driver.playlist_named(HYPE_PLAYLIST_NAME).await,
                )
                .flatten();
            defaults.playlist = found.map(|p| p.id);
        }
        defaults
    }

    async fn resolve_for(&self, actor_id: Option<&str>, settings: &HypeSettings) -> Option<Selection> {
        let explicit = match actor_id {
            Some(id) => self
                .driver
                .errors()
                .absorb("look up acting actor", self.driver.host().actor(id).await)
                .flatten()
                .and_then(|actor| parse_override(&actor.flags)),
            None => None,
        };
        let defaults = self.defaults(settings).await;
        resolve(explicit.as_ref(), &defaults)
    }

    async fn stop_active(&self, state: &mut HypeTrack) {
        if let Some(active) = state.clear() {
            self.publish(state);
            let result = self.driver.stop_selection(&active.selection).await;
            self.driver.errors().absorb("stop hype track", result);
        }
    }

    /// Handles a turn change. Returns a watch when the started track should
    /// restore ambience once it ends; the caller awaits it with
    /// [`Self::await_track_end`].
    pub async fn handle_turn_changed(&self, command: &TurnChanged) -> Option<TrackEndWatch> {
        let combat = &command.combat;
        if combat.round == 0 || combat.turn.is_none() || combat.combatant_count == 0 {
            debug!(combat_id = %combat.id, "turn change ignored: encounter not running");
            return None;
        }
        if !self.authority.is_authoritative().await {
            debug!(combat_id = %combat.id, "turn change ignored: session not authoritative");
            return None;
        }
        let settings = self.driver.settings().await?;
        if !settings.hype.enabled {
            return None;
        }

        let mut state = self.state.lock().await;

        let desired = self
            .resolve_for(combat.acting_actor_id.as_deref(), &settings.hype)
            .await;
        let still_playing = match state.active() {
            Some(active) => self
                .driver
                .errors()
                .absorb("check hype track", self.driver.is_playing(&active.selection).await)
                .unwrap_or(false),
            None => false,
        };

        match state.plan(desired, still_playing) {
            TurnPlan::Clear => {
                debug!(combat_id = %combat.id, "no hype track for acting actor");
                self.stop_active(&mut state).await;
                self.driver.drain_and_resume(&mut state.paused).await;
                None
            }
            TurnPlan::Keep => {
                debug!(combat_id = %combat.id, "hype track already playing");
                None
            }
            TurnPlan::Switch(selection) => {
                self.stop_active(&mut state).await;

                if settings.hype.pause_others {
                    let paused = self
                        .driver
                        .errors()
                        .absorb("pause ambience", self.driver.pause_all_playing().await)
                        .unwrap_or_default();
                    state.paused.merge(paused);
                } else if !state.paused.is_empty() {
                    self.driver.drain_and_resume(&mut state.paused).await;
                }

                let result = self.driver.play_selection(&selection).await;
                self.driver.errors().absorb("start hype track", result);

                let owner = OwnerId(combat.acting_actor_id.clone().unwrap_or_default());
                info!(
                    correlation_id = %command.correlation_id,
                    selection = %selection,
                    owner = %owner,
                    "hype track switched"
                );
                state.record(selection.clone(), owner.clone(), self.driver.clock().now());
                self.publish(&state);

                if !state.wants_end_watch() {
                    return None;
                }
                let TrackChoice::Sound(sound_id) = &selection.track else {
                    return None;
                };
                let key = SoundKey::new(&selection.playlist_id, sound_id);
                let ended = self.driver.host().sound_ended(&key);
                Some(TrackEndWatch {
                    selection,
                    owner,
                    ended,
                    generation: state.generation(),
                    superseded: self.generation.subscribe(),
                })
            }
        }
    }

    /// Handles the end of a watched track. Acts only when the record is still
    /// exactly `(selection, owner)`; returns whether it did.
    pub async fn handle_track_ended(&self, selection: &Selection, owner: &OwnerId) -> bool {
        let mut state = self.state.lock().await;
        if !state.is_current(selection, owner) {
            debug!(selection = %selection, owner = %owner, "stale track-ended notification discarded");
            return false;
        }
        state.clear();
        self.publish(&state);
        self.driver.drain_and_resume(&mut state.paused).await;
        info!(selection = %selection, "hype track ended, ambience restored");
        true
    }

    /// Waits for a watched track to end, then handles it. Gives up as soon
    /// as the record moves on, since a stopped track never reports its end.
    pub async fn await_track_end(&self, watch: TrackEndWatch) -> bool {
        let TrackEndWatch {
            selection,
            owner,
            ended,
            generation,
            mut superseded,
        } = watch;
        let moved_on = async move {
            let _ = superseded.wait_for(|current| *current != generation).await;
        };
        tokio::select! {
            result = ended => {
                if result.is_err() {
                    debug!(selection = %selection, "track-ended notification dropped");
                    return false;
                }
                self.handle_track_ended(&selection, &owner).await
            }
            () = moved_on => {
                debug!(selection = %selection, "track-end watch superseded");
                false
            }
        }
    }

    /// Handles the end of an encounter: stops the hype track, resets the
    /// hype playlist's sound markers, restores ambience and clears the record.
    pub async fn handle_encounter_ended(&self, command: &EncounterEnded) {
        if !self.authority.is_authoritative().await {
            debug!(combat_id = %command.combat_id, "encounter end ignored: session not authoritative");
            return;
        }
        let settings = self.driver.settings().await.unwrap_or_default();

        let mut state = self.state.lock().await;
        let mut playlists: Vec<String> = state
            .clear()
            .map(|a| a.selection.playlist_id)
            .into_iter()
            .collect();
        self.publish(&state);
        if let Some(hype_playlist) = self.defaults(&settings.hype).await.playlist {
            if !playlists.contains(&hype_playlist) {
                playlists.push(hype_playlist);
            }
        }
        for playlist_id in &playlists {
            let result = self.driver.stop_and_reset(playlist_id).await;
            self.driver.errors().absorb("reset hype playlist", result);
        }
        let resumed = self.driver.drain_and_resume(&mut state.paused).await;
        info!(combat_id = %command.combat_id, resumed, "hype track stopped for encounter end");
    }

    async fn find_actor(&self, reference: &str) -> Result<Option<Actor>, DomainError> {
        if let Some(actor) = self.driver.host().actor(reference).await? {
            return Ok(Some(actor));
        }
        let actors = self.driver.host().actors().await?;
        Ok(actors.into_iter().find(|a| a.name == reference))
    }

    /// Plays an actor's hype track on demand, looked up by id or name. Does
    /// not touch the engine's record or stack. Returns the started sound.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn play_hype(&self, command: &PlayHype) -> Result<Option<SoundKey>, DomainError> {
        let Some(actor) = self.find_actor(&command.actor).await? else {
            warn!(actor = %command.actor, "no actor matches hype request");
            return Ok(None);
        };
        let explicit = parse_override(&actor.flags).filter(|o| o.track.is_some());
        let Some(explicit) = explicit else {
            warn!(actor_id = %actor.id, "actor has no hype track");
            return Ok(None);
        };
        let settings = self.driver.settings().await.unwrap_or_default();
        let defaults = self.defaults(&settings.hype).await;
        let Some(selection) = resolve(Some(&explicit), &defaults) else {
            warn!(actor_id = %actor.id, "no playlist for actor hype track");
            return Ok(None);
        };
        self.driver.play_track(&selection).await
    }

    /// Sets an actor's hype override.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the actor does not exist, or any
    /// host failure.
    pub async fn set_hype_track(&self, command: &SetHypeTrack) -> Result<TrackOverride, DomainError> {
        if self.driver.host().actor(&command.actor_id).await?.is_none() {
            return Err(DomainError::not_found("actor", command.actor_id.clone()));
        }
        let value = TrackOverride::new(&command.playlist, &command.track);
        self.driver
            .host()
            .set_flags(&DocumentRef::Actor(command.actor_id.clone()), &value.to_flags())
            .await?;
        info!(actor_id = %command.actor_id, "hype override updated");
        Ok(value)
    }

    /// Ensures the hype playlist exists when hype tracks are enabled and this
    /// session is authoritative.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn provision(&self) -> Result<Option<Playlist>, DomainError> {
        if !self.authority.is_authoritative().await {
            return Ok(None);
        }
        let Some(settings) = self.driver.settings().await else {
            return Ok(None);
        };
        if !settings.hype.enabled {
            return Ok(None);
        }
        self.driver.ensure_playlist(HYPE_PLAYLIST_NAME).await.map(Some)
    }

    /// Best-effort resume of everything still held paused.
    pub async fn teardown(&self) -> usize {
        let mut state = self.state.lock().await;
        self.driver.drain_and_resume(&mut state.paused).await
    }

    /// Current record and stack size.
    pub async fn status(&self) -> EngineStatus {
        self.state.lock().await.status()
    }
}

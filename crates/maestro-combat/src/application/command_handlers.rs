//! Command handlers for the Combat Engagement context.
//!
//! [`CombatEngine`] mirrors the hype engine's locking: one async mutex over
//! the record and stack, held for a whole start or stop transition.

use std::sync::Arc;

use maestro_core::authority::Authority;
use maestro_core::diagnostics::EngineStatus;
use maestro_core::documents::{Combat, Playlist};
use maestro_core::error::DomainError;
use maestro_core::host::DocumentRef;
use maestro_core::resolver::{TrackOverride, parse_override, resolve, resolve_playlist};
use maestro_core::selection::{OwnerId, Selection};
use maestro_core::settings::{CombatSettings, MaestroSettings};
use maestro_playback::application::command_handlers::PlaybackDriver;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::COMBAT_PLAYLIST_NAME;
use crate::domain::aggregates::{CombatTrack, StartPlan, is_combat_start};
use crate::domain::commands::{
    EncounterDeleted, EncounterUpdated, SetCombatDefaults, SetCombatTrack,
};

fn encounter_override(combat: &Combat) -> Option<TrackOverride> {
    parse_override(&combat.flags)
}

/// Resolves an encounter's selection from its override and the defaults.
#[must_use]
pub fn resolve_encounter(combat: &Combat, settings: &CombatSettings) -> Option<Selection> {
    resolve(encounter_override(combat).as_ref(), &settings.defaults())
}

/// Arbitrates the encounter-wide combat track.
pub struct CombatEngine {
    driver: PlaybackDriver,
    authority: Arc<dyn Authority>,
    state: Mutex<CombatTrack>,
}

impl CombatEngine {
    /// Creates an engine with an empty record and stack.
    #[must_use]
    pub fn new(driver: PlaybackDriver, authority: Arc<dyn Authority>) -> Self {
        Self {
            driver,
            authority,
            state: Mutex::new(CombatTrack::new()),
        }
    }

    /// Handles an encounter update; only the round 0 to 1 transition starts
    /// the combat track. Returns whether a selection was started.
    pub async fn handle_encounter_updated(&self, command: &EncounterUpdated) -> bool {
        let combat = &command.combat;
        if !is_combat_start(command.previous_round, combat.round) {
            return false;
        }
        if !self.authority.is_authoritative().await {
            debug!(combat_id = %combat.id, "combat start ignored: session not authoritative");
            return false;
        }
        let Some(settings) = self.driver.settings().await else {
            return false;
        };
        if !settings.combat.enabled {
            return false;
        }
        let Some(desired) = resolve_encounter(combat, &settings.combat) else {
            debug!(combat_id = %combat.id, "no combat track configured");
            return false;
        };

        let mut state = self.state.lock().await;

        let still_playing = match state.active() {
            Some(active) => self
                .driver
                .errors()
                .absorb("check combat track", self.driver.is_playing(&active.selection).await)
                .unwrap_or(false),
            None => false,
        };
        let StartPlan::Start(selection) = state.plan_start(desired, still_playing) else {
            debug!(combat_id = %combat.id, "combat track already playing");
            return false;
        };

        if let Some(previous) = state.clear() {
            let result = self.driver.stop_selection(&previous.selection).await;
            self.driver.errors().absorb("stop previous combat track", result);
        }

        if settings.combat.pause_others {
            let paused = self
                .driver
                .errors()
                .absorb("pause ambience", self.driver.pause_all_playing().await)
                .unwrap_or_default();
            state.paused.merge(paused);
        }

        let result = self.driver.play_selection(&selection).await;
        self.driver.errors().absorb("start combat track", result);

        info!(
            correlation_id = %command.correlation_id,
            combat_id = %combat.id,
            selection = %selection,
            "combat track started"
        );
        state.record(selection, OwnerId(combat.id.clone()), self.driver.clock().now());
        true
    }

    /// Handles an encounter deletion: stops and resets the encounter's
    /// playlist and the playlist actually recorded as playing, when they
    /// still exist, then restores ambience and clears the record.
    pub async fn handle_encounter_deleted(&self, command: &EncounterDeleted) {
        let combat = &command.combat;
        if !self.authority.is_authoritative().await {
            debug!(combat_id = %combat.id, "combat stop ignored: session not authoritative");
            return;
        }
        let settings = self.driver.settings().await.unwrap_or_default();

        let mut state = self.state.lock().await;

        let explicit = encounter_override(combat);
        let defaults = settings.combat.defaults();
        let mut playlists: Vec<String> = resolve_playlist(explicit.as_ref(), &defaults)
            .map(str::to_owned)
            .into_iter()
            .collect();
        if let Some(active) = state.active() {
            if !playlists.contains(&active.selection.playlist_id) {
                playlists.push(active.selection.playlist_id.clone());
            }
        }

        for playlist_id in &playlists {
            let result = self.driver.stop_and_reset(playlist_id).await;
            if self.driver.errors().absorb("stop combat track", result) == Some(false) {
                debug!(playlist_id, "combat playlist no longer exists");
            }
        }

        let resumed = self.driver.drain_and_resume(&mut state.paused).await;
        state.clear();
        info!(
            correlation_id = %command.correlation_id,
            combat_id = %combat.id,
            resumed,
            "combat track stopped"
        );
    }

    /// Sets an encounter's combat track override.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the host write fails.
    pub async fn set_combat_track(&self, command: &SetCombatTrack) -> Result<TrackOverride, DomainError> {
        let value = TrackOverride::new(&command.playlist, &command.track);
        self.driver
            .host()
            .set_flags(&DocumentRef::Combat(command.combat_id.clone()), &value.to_flags())
            .await?;
        info!(combat_id = %command.combat_id, "combat override updated");
        Ok(value)
    }

    /// Sets the default combat selection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the settings cannot be read or written.
    pub async fn set_combat_defaults(
        &self,
        command: &SetCombatDefaults,
    ) -> Result<TrackOverride, DomainError> {
        let raw = self.driver.host().settings().await?;
        let mut settings = MaestroSettings::from_value(&raw);
        settings.combat.default_playlist = command.playlist.trim().to_owned();
        settings.combat.default_track = command.track.trim().to_owned();
        self.driver.store_settings(&settings).await?;
        info!("combat defaults updated");
        Ok(settings.combat.defaults())
    }

    /// Ensures the combat playlist exists when enabled and configured to be
    /// created, and this session is authoritative.
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
        if !settings.combat.enabled || !settings.combat.create_playlist {
            return Ok(None);
        }
        self.driver.ensure_playlist(COMBAT_PLAYLIST_NAME).await.map(Some)
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

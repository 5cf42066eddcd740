//! Command handlers for the Playback context.
//!
//! [`PlaybackDriver`] is the only place that turns selections and sound
//! references into host playback calls. Engines hold one driver each and
//! share its session error counter.

use std::sync::{Arc, Mutex};

use maestro_core::clock::Clock;
use maestro_core::diagnostics::SessionErrors;
use maestro_core::documents::{Playlist, PlaylistSound};
use maestro_core::error::DomainError;
use maestro_core::host::{DocumentRef, Host, SoundCommand, SoundKey};
use maestro_core::rng::{DeterministicRng, pick_index};
use maestro_core::selection::{Selection, TrackChoice};
use maestro_core::settings::MaestroSettings;
use tracing::{debug, info, warn};

use crate::application::query_handlers::{find_in, find_in_playlist, find_reference};
use crate::domain::aggregates::{PausedSound, PausedSoundStack};
use crate::domain::commands::{
    PauseSounds, PlaySoundByName, ResumeSounds, SetPlaylistLoop, SoundUpdate,
};
use crate::domain::loop_guard::{self, LOOP_FLAG, LoopDecision, PREVIOUS_SOUND_FLAG};

/// Realizes selections and pause/resume requests on the host.
#[derive(Clone)]
pub struct PlaybackDriver {
    host: Arc<dyn Host>,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    clock: Arc<dyn Clock>,
    errors: Arc<SessionErrors>,
}

impl PlaybackDriver {
    /// Creates a driver over `host`.
    #[must_use]
    pub fn new(
        host: Arc<dyn Host>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        clock: Arc<dyn Clock>,
        errors: Arc<SessionErrors>,
    ) -> Self {
        Self {
            host,
            rng,
            clock,
            errors,
        }
    }

    /// The host this driver talks to.
    #[must_use]
    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// The session's non-fatal error counter.
    #[must_use]
    pub fn errors(&self) -> &SessionErrors {
        &self.errors
    }

    /// The clock used to timestamp records.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Reads the current settings document. A failed read is recorded and
    /// yields `None`; a malformed document yields defaults.
    pub async fn settings(&self) -> Option<MaestroSettings> {
        self.errors
            .absorb("read settings", self.host.settings().await)
            .map(|raw| MaestroSettings::from_value(&raw))
    }

    /// Replaces the stored settings document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the host write fails.
    pub async fn store_settings(&self, settings: &MaestroSettings) -> Result<(), DomainError> {
        self.host.store_settings(&settings.to_value()).await
    }

    /// Finds a playlist by name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the host cannot list playlists.
    pub async fn playlist_named(&self, name: &str) -> Result<Option<Playlist>, DomainError> {
        let playlists = self.host.playlists().await?;
        Ok(playlists.into_iter().find(|p| p.name == name))
    }

    /// Plays one track of a selection's playlist.
    ///
    /// `Random` picks uniformly among the playlist's sounds at call time; a
    /// missing playlist, an empty playlist or an unknown sound is a no-op.
    /// `All` is delegated to [`Self::play_playlist`]. Returns the sound that
    /// was started, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails or the RNG lock is poisoned.
    pub async fn play_track(&self, selection: &Selection) -> Result<Option<SoundKey>, DomainError> {
        if selection.track == TrackChoice::All {
            self.play_playlist(&selection.playlist_id).await?;
            return Ok(None);
        }

        let Some(playlist) = self.host.playlist(&selection.playlist_id).await? else {
            debug!(playlist_id = %selection.playlist_id, "playlist not found, nothing to play");
            return Ok(None);
        };

        let sound_id = match &selection.track {
            TrackChoice::Sound(id) => id.clone(),
            _ => {
                // Lock RNG only for the pick, never across an await.
                let picked = {
                    let mut rng = self.rng.lock().map_err(|e| {
                        DomainError::Infrastructure(format!("RNG mutex poisoned: {e}"))
                    })?;
                    pick_index(&mut *rng, playlist.sounds.len())
                };
                let Some(index) = picked else {
                    debug!(playlist_id = %playlist.id, "random track requested from empty playlist");
                    return Ok(None);
                };
                playlist.sounds[index].id.clone()
            }
        };

        if playlist.sound(&sound_id).is_none() {
            debug!(playlist_id = %playlist.id, sound_id, "sound not found, nothing to play");
            return Ok(None);
        }

        let key = playlist.key(&sound_id);
        self.host.play_sound(&key).await?;
        info!(sound = %key, "track started");
        Ok(Some(key))
    }

    /// Starts whole-playlist playback with the playlist's own ordering.
    /// Returns `false` when the playlist does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn play_playlist(&self, playlist_id: &str) -> Result<bool, DomainError> {
        if self.host.playlist(playlist_id).await?.is_none() {
            debug!(playlist_id, "playlist not found, nothing to play");
            return Ok(false);
        }
        self.host.play_playlist(playlist_id).await?;
        info!(playlist_id, "playlist started");
        Ok(true)
    }

    /// Starts a selection: a concrete or random track, or the whole playlist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn play_selection(&self, selection: &Selection) -> Result<(), DomainError> {
        self.play_track(selection).await.map(|_| ())
    }

    /// Stops a selection's playlist if it reports playing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn stop_selection(&self, selection: &Selection) -> Result<(), DomainError> {
        let Some(playlist) = self.host.playlist(&selection.playlist_id).await? else {
            return Ok(());
        };
        if playlist.playing {
            self.host.stop_playlist(&playlist.id).await?;
            info!(playlist_id = %playlist.id, "playlist stopped");
        }
        Ok(())
    }

    /// Returns whether a selection's audio is still audible. A concrete
    /// track checks that sound; mode tokens check the playlist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the host lookup fails.
    pub async fn is_playing(&self, selection: &Selection) -> Result<bool, DomainError> {
        let Some(playlist) = self.host.playlist(&selection.playlist_id).await? else {
            return Ok(false);
        };
        Ok(match &selection.track {
            TrackChoice::Sound(id) => playlist.sound(id).is_some_and(|s| s.playing),
            TrackChoice::All | TrackChoice::Random => playlist.playing,
        })
    }

    /// Stops a playlist and clears the playing and paused markers of each of
    /// its sounds. Returns `false` when the playlist does not exist.
    ///
    /// Failures to reset single sounds are recorded and skipped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the playlist lookup or stop fails.
    pub async fn stop_and_reset(&self, playlist_id: &str) -> Result<bool, DomainError> {
        let Some(playlist) = self.host.playlist(playlist_id).await? else {
            return Ok(false);
        };
        self.host.stop_playlist(playlist_id).await?;
        for sound in &playlist.sounds {
            if !sound.playing && sound.paused_time.is_none() {
                continue;
            }
            let key = playlist.key(&sound.id);
            if let Err(e) = self.host.update_sound(&key, SoundCommand::Reset).await {
                self.errors.record("reset sound", &e);
            }
        }
        info!(playlist_id, "playlist stopped and reset");
        Ok(true)
    }

    async fn pause_one(&self, playlist: &Playlist, sound: &PlaylistSound) -> Option<PausedSound> {
        let key = playlist.key(&sound.id);
        let position = sound.current_time.unwrap_or(0.0);
        match self
            .host
            .update_sound(&key, SoundCommand::Pause { at: position })
            .await
        {
            Ok(()) => Some(PausedSound {
                key,
                name: sound.name.clone(),
                position,
                paused_at: self.clock.now(),
            }),
            Err(e) => {
                self.errors.record("pause sound", &e);
                None
            }
        }
    }

    /// Pauses every sound currently playing on the host at its current
    /// position and returns exactly the sounds that were paused.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the host cannot list playlists.
    pub async fn pause_all_playing(&self) -> Result<Vec<PausedSound>, DomainError> {
        let playlists = self.host.playlists().await?;
        let mut paused = Vec::new();
        for playlist in &playlists {
            for sound in playlist.sounds.iter().filter(|s| s.playing) {
                if let Some(entry) = self.pause_one(playlist, sound).await {
                    paused.push(entry);
                }
            }
        }
        if !paused.is_empty() {
            info!(count = paused.len(), "paused playing sounds");
        }
        Ok(paused)
    }

    /// Empties `stack`, dispatching a resume for each entry as it is removed.
    /// A failed resume is recorded and does not stop the others. Returns how
    /// many resumes succeeded.
    pub async fn drain_and_resume(&self, stack: &mut PausedSoundStack) -> usize {
        let mut resumed = 0;
        while let Some(entry) = stack.pop() {
            let command = SoundCommand::Resume {
                from: entry.position,
            };
            match self.host.update_sound(&entry.key, command).await {
                Ok(()) => resumed += 1,
                Err(e) => self.errors.record("resume sound", &e),
            }
        }
        if resumed > 0 {
            info!(count = resumed, "resumed paused sounds");
        }
        resumed
    }

    /// Pauses the referenced sounds that are playing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the host cannot list playlists.
    pub async fn pause_sounds(&self, command: &PauseSounds) -> Result<Vec<PausedSound>, DomainError> {
        let playlists = self.host.playlists().await?;
        let mut paused = Vec::new();
        for reference in &command.sounds {
            let Some((playlist, sound)) = find_reference(&playlists, reference) else {
                debug!(reference, "sound reference did not resolve");
                continue;
            };
            if !sound.playing {
                continue;
            }
            if let Some(entry) = self.pause_one(playlist, sound).await {
                paused.push(entry);
            }
        }
        Ok(paused)
    }

    /// Resumes the referenced sounds that carry a paused position.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the host cannot list playlists.
    pub async fn resume_sounds(&self, command: &ResumeSounds) -> Result<Vec<SoundKey>, DomainError> {
        let playlists = self.host.playlists().await?;
        let mut resumed = Vec::new();
        for reference in &command.sounds {
            let Some((playlist, sound)) = find_reference(&playlists, reference) else {
                debug!(reference, "sound reference did not resolve");
                continue;
            };
            let Some(from) = sound.paused_time.filter(|t| *t > 0.0) else {
                continue;
            };
            let key = playlist.key(&sound.id);
            match self
                .host
                .update_sound(&key, SoundCommand::Resume { from })
                .await
            {
                Ok(()) => resumed.push(key),
                Err(e) => self.errors.record("resume sound", &e),
            }
        }
        Ok(resumed)
    }

    /// Plays the first sound matching a search, optionally within one
    /// playlist. Returns `None` and logs a warning when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn play_sound_by_name(
        &self,
        command: &PlaySoundByName,
    ) -> Result<Option<SoundKey>, DomainError> {
        let key = if let Some(playlist_id) = &command.playlist_id {
            self.host.playlist(playlist_id).await?.and_then(|p| {
                find_in_playlist(&p, &command.search, command.find_by).map(|s| p.key(&s.id))
            })
        } else {
            let playlists = self.host.playlists().await?;
            find_in(&playlists, &command.search, command.find_by).map(|(p, s)| p.key(&s.id))
        };

        let Some(key) = key else {
            warn!(search = %command.search, "no playlist sound matches search");
            return Ok(None);
        };
        self.host.play_sound(&key).await?;
        info!(sound = %key, "sound started by name");
        Ok(Some(key))
    }

    /// Returns the playlist named `name`, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn ensure_playlist(&self, name: &str) -> Result<Playlist, DomainError> {
        if let Some(existing) = self.playlist_named(name).await? {
            return Ok(existing);
        }
        let created = self.host.create_playlist(name).await?;
        info!(playlist_id = %created.id, name, "playlist created");
        Ok(created)
    }

    /// Runs the loop guard for a pending sound update and records the
    /// previous sound when the update is a stop.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn handle_sound_update(
        &self,
        command: &SoundUpdate,
    ) -> Result<LoopDecision, DomainError> {
        let Some(playlist) = self.host.playlist(&command.playlist_id).await? else {
            return Ok(LoopDecision::Allow);
        };
        let decision = loop_guard::decide(&playlist, &command.sound_id, command.playing);
        match &decision {
            LoopDecision::RememberPrevious(sound_id) => {
                let patch = serde_json::json!({ PREVIOUS_SOUND_FLAG: sound_id });
                self.host
                    .set_flags(&DocumentRef::Playlist(playlist.id.clone()), &patch)
                    .await?;
            }
            LoopDecision::Suppress => {
                info!(playlist_id = %playlist.id, "playlist reached its end with looping disabled");
            }
            LoopDecision::Allow => {}
        }
        Ok(decision)
    }

    /// Turns a playlist's looping on or off.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the playlist does not exist, or any
    /// host failure.
    pub async fn set_playlist_loop(&self, command: &SetPlaylistLoop) -> Result<(), DomainError> {
        if self.host.playlist(&command.playlist_id).await?.is_none() {
            return Err(DomainError::not_found("playlist", command.playlist_id.clone()));
        }
        let value = if command.enabled {
            serde_json::Value::Null
        } else {
            serde_json::Value::Bool(false)
        };
        let patch = serde_json::json!({ LOOP_FLAG: value });
        self.host
            .set_flags(&DocumentRef::Playlist(command.playlist_id.clone()), &patch)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use maestro_core::diagnostics::SessionErrors;
    use maestro_core::documents::{Playlist, PlaylistMode};
    use maestro_core::error::DomainError;
    use maestro_core::host::{Host, SoundCommand, SoundKey};
    use maestro_core::rng::DeterministicRng;
    use maestro_core::selection::{Selection, TrackChoice};
    use maestro_test_support::{
        HostCall, InMemoryHost, MockRng, SequenceRng, fixed_clock, playlist, sound,
    };
    use uuid::Uuid;

    use super::PlaybackDriver;
    use crate::domain::aggregates::PausedSoundStack;
    use crate::domain::commands::{
        FindBy, PauseSounds, PlaySoundByName, ResumeSounds, SetPlaylistLoop, SoundUpdate,
    };
    use crate::domain::loop_guard::LoopDecision;

    fn driver_with_rng(
        host: &Arc<InMemoryHost>,
        rng: impl DeterministicRng + Send + 'static,
    ) -> PlaybackDriver {
        let host: Arc<dyn Host> = host.clone();
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
        PlaybackDriver::new(
            host,
            rng,
            Arc::new(fixed_clock()),
            Arc::new(SessionErrors::new()),
        )
    }

    fn driver(host: &Arc<InMemoryHost>) -> PlaybackDriver {
        driver_with_rng(host, MockRng)
    }

    fn ambience_playing() -> Playlist {
        Playlist {
            sounds: vec![sound("rain", true), sound("wind", true), sound("birds", false)],
            playing: true,
            ..playlist("amb", "Ambience", &[])
        }
    }

    #[tokio::test]
    async fn test_play_track_plays_concrete_sound() {
        // Arrange
        let host = Arc::new(
            InMemoryHost::default().with_playlist(playlist("hype", "Hype Tracks", &["theme"])),
        );
        let driver = driver(&host);

        // Act
        let started = driver
            .play_track(&Selection::sound("hype", "theme"))
            .await
            .unwrap();

        // Assert
        assert_eq!(started, Some(SoundKey::new("hype", "theme")));
        assert_eq!(
            host.calls(),
            vec![HostCall::PlaySound(SoundKey::new("hype", "theme"))]
        );
    }

    #[tokio::test]
    async fn test_play_track_random_picks_from_playlist() {
        // Arrange
        let host = Arc::new(
            InMemoryHost::default().with_playlist(playlist("pl", "Mix", &["a", "b", "c"])),
        );
        let driver = driver_with_rng(&host, SequenceRng::new(vec![2]));
        let selection = Selection {
            playlist_id: "pl".to_owned(),
            track: TrackChoice::Random,
        };

        // Act
        let started = driver.play_track(&selection).await.unwrap();

        // Assert
        assert_eq!(started, Some(SoundKey::new("pl", "c")));
    }

    #[tokio::test]
    async fn test_play_track_random_on_empty_playlist_is_noop() {
        let host = Arc::new(InMemoryHost::default().with_playlist(playlist("pl", "Empty", &[])));
        let driver = driver(&host);
        let selection = Selection {
            playlist_id: "pl".to_owned(),
            track: TrackChoice::Random,
        };

        let started = driver.play_track(&selection).await.unwrap();

        assert_eq!(started, None);
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_play_track_missing_sound_is_noop() {
        let host = Arc::new(InMemoryHost::default().with_playlist(playlist("pl", "Mix", &["a"])));
        let driver = driver(&host);

        let started = driver.play_track(&Selection::sound("pl", "zzz")).await.unwrap();

        assert_eq!(started, None);
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_play_all_starts_whole_playlist() {
        let host = Arc::new(InMemoryHost::default().with_playlist(playlist("pl", "Mix", &["a"])));
        let driver = driver(&host);
        let selection = Selection {
            playlist_id: "pl".to_owned(),
            track: TrackChoice::All,
        };

        driver.play_selection(&selection).await.unwrap();

        assert_eq!(host.calls(), vec![HostCall::PlayPlaylist("pl".to_owned())]);
    }

    #[tokio::test]
    async fn test_stop_selection_only_stops_playing_playlist() {
        let host = Arc::new(
            InMemoryHost::default()
                .with_playlist(ambience_playing())
                .with_playlist(playlist("quiet", "Quiet", &["a"])),
        );
        let driver = driver(&host);

        driver.stop_selection(&Selection::sound("quiet", "a")).await.unwrap();
        driver.stop_selection(&Selection::sound("amb", "rain")).await.unwrap();

        assert_eq!(host.calls(), vec![HostCall::StopPlaylist("amb".to_owned())]);
    }

    #[tokio::test]
    async fn test_pause_all_playing_returns_exactly_paused_set() {
        // Arrange
        let host = Arc::new(InMemoryHost::default().with_playlist(ambience_playing()));
        let driver = driver(&host);

        // Act
        let paused = driver.pause_all_playing().await.unwrap();

        // Assert
        let keys: Vec<_> = paused.iter().map(|p| p.key.sound_id.as_str()).collect();
        assert_eq!(keys, vec!["rain", "wind"]);
        let rain = host.sound_state(&SoundKey::new("amb", "rain")).unwrap();
        assert!(!rain.playing);
        assert_eq!(rain.paused_time, Some(30.0));
    }

    #[tokio::test]
    async fn test_pause_then_drain_restores_every_sound() {
        // Arrange
        let host = Arc::new(InMemoryHost::default().with_playlist(ambience_playing()));
        let driver = driver(&host);
        let mut stack = PausedSoundStack::new();
        stack.merge(driver.pause_all_playing().await.unwrap());

        // Act
        let resumed = driver.drain_and_resume(&mut stack).await;

        // Assert
        assert_eq!(resumed, 2);
        assert!(stack.is_empty());
        for id in ["rain", "wind"] {
            let state = host.sound_state(&SoundKey::new("amb", id)).unwrap();
            assert!(state.playing);
            assert_eq!(state.paused_time, None);
        }
    }

    #[tokio::test]
    async fn test_overlapping_pauses_resume_each_sound_once() {
        // Arrange
        let host = Arc::new(InMemoryHost::default().with_playlist(Playlist {
            sounds: vec![sound("a", true), sound("b", true), sound("c", false)],
            playing: true,
            ..playlist("amb", "Ambience", &[])
        }));
        let driver = driver(&host);
        let mut stack = PausedSoundStack::new();
        stack.merge(driver.pause_all_playing().await.unwrap());
        host.set_playing(&SoundKey::new("amb", "b"), true);
        host.set_playing(&SoundKey::new("amb", "c"), true);
        stack.merge(driver.pause_all_playing().await.unwrap());
        assert_eq!(stack.len(), 3);
        host.clear_calls();

        // Act
        let resumed = driver.drain_and_resume(&mut stack).await;

        // Assert
        assert_eq!(resumed, 3);
        assert!(stack.is_empty());
        assert_eq!(
            host.resumed(),
            vec![
                SoundKey::new("amb", "a"),
                SoundKey::new("amb", "b"),
                SoundKey::new("amb", "c"),
            ]
        );
    }

    #[tokio::test]
    async fn test_drain_continues_past_failed_resume() {
        // Arrange
        let host = Arc::new(InMemoryHost::default().with_playlist(ambience_playing()));
        let driver = driver(&host);
        let mut stack = PausedSoundStack::new();
        stack.merge(driver.pause_all_playing().await.unwrap());
        host.fail_updates_for(&SoundKey::new("amb", "rain"));

        // Act
        let resumed = driver.drain_and_resume(&mut stack).await;

        // Assert
        assert_eq!(resumed, 1);
        assert!(stack.is_empty());
        assert_eq!(driver.errors().count(), 1);
        assert!(host.sound_state(&SoundKey::new("amb", "wind")).unwrap().playing);
    }

    #[tokio::test]
    async fn test_stop_and_reset_clears_sound_markers() {
        // Arrange
        let mut hype = playlist("hype", "Hype Tracks", &["theme", "other"]);
        hype.sounds[0].playing = true;
        hype.sounds[1].paused_time = Some(4.0);
        hype.playing = true;
        let host = Arc::new(InMemoryHost::default().with_playlist(hype));
        let driver = driver(&host);

        // Act
        let existed = driver.stop_and_reset("hype").await.unwrap();

        // Assert
        assert!(existed);
        assert!(host.calls().contains(&HostCall::UpdateSound(
            SoundKey::new("hype", "other"),
            SoundCommand::Reset
        )));
        let other = host.sound_state(&SoundKey::new("hype", "other")).unwrap();
        assert_eq!(other.paused_time, None);
        assert!(!host.playlist_state("hype").unwrap().playing);
    }

    #[tokio::test]
    async fn test_stop_and_reset_missing_playlist_reports_false() {
        let host = Arc::new(InMemoryHost::default());
        let driver = driver(&host);

        assert!(!driver.stop_and_reset("gone").await.unwrap());
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pause_and_resume_sounds_by_reference() {
        // Arrange
        let host = Arc::new(InMemoryHost::default().with_playlist(ambience_playing()));
        let driver = driver(&host);
        let pause = PauseSounds {
            correlation_id: Uuid::new_v4(),
            sounds: vec!["rain name".to_owned(), "birds".to_owned(), "nope".to_owned()],
        };

        // Act
        let paused = driver.pause_sounds(&pause).await.unwrap();
        let resumed = driver
            .resume_sounds(&ResumeSounds {
                correlation_id: Uuid::new_v4(),
                sounds: vec!["music/rain.ogg".to_owned(), "wind".to_owned()],
            })
            .await
            .unwrap();

        // Assert
        assert_eq!(paused.len(), 1);
        assert_eq!(paused[0].key, SoundKey::new("amb", "rain"));
        assert_eq!(resumed, vec![SoundKey::new("amb", "rain")]);
    }

    #[tokio::test]
    async fn test_play_sound_by_name_scoped_to_playlist() {
        let host = Arc::new(
            InMemoryHost::default()
                .with_playlist(playlist("a", "A", &["x"]))
                .with_playlist(playlist("b", "B", &["x"])),
        );
        let driver = driver(&host);

        let started = driver
            .play_sound_by_name(&PlaySoundByName {
                correlation_id: Uuid::new_v4(),
                search: "x name".to_owned(),
                playlist_id: Some("b".to_owned()),
                find_by: FindBy::Name,
            })
            .await
            .unwrap();

        assert_eq!(started, Some(SoundKey::new("b", "x")));
    }

    #[tokio::test]
    async fn test_play_sound_by_name_without_match_returns_none() {
        let host = Arc::new(InMemoryHost::default().with_playlist(playlist("a", "A", &["x"])));
        let driver = driver(&host);

        let started = driver
            .play_sound_by_name(&PlaySoundByName {
                correlation_id: Uuid::new_v4(),
                search: "missing".to_owned(),
                playlist_id: None,
                find_by: FindBy::Path,
            })
            .await
            .unwrap();

        assert_eq!(started, None);
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_playlist_creates_only_when_missing() {
        let host = Arc::new(InMemoryHost::default().with_playlist(playlist("h", "Hype Tracks", &[])));
        let driver = driver(&host);

        let existing = driver.ensure_playlist("Hype Tracks").await.unwrap();
        let created = driver.ensure_playlist("Combat Tracks").await.unwrap();

        assert_eq!(existing.id, "h");
        assert_eq!(created.name, "Combat Tracks");
        assert_eq!(
            host.calls(),
            vec![HostCall::CreatePlaylist("Combat Tracks".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_loop_guard_remembers_stop_then_suppresses_wrap() {
        // Arrange
        let mut pl = playlist("pl", "Mix", &["a", "b"]);
        pl.playing = true;
        pl.mode = PlaylistMode::Sequential;
        let host = Arc::new(InMemoryHost::default().with_playlist(pl));
        let driver = driver(&host);
        driver
            .set_playlist_loop(&SetPlaylistLoop {
                correlation_id: Uuid::new_v4(),
                playlist_id: "pl".to_owned(),
                enabled: false,
            })
            .await
            .unwrap();

        // Act
        let stop = driver
            .handle_sound_update(&SoundUpdate {
                correlation_id: Uuid::new_v4(),
                playlist_id: "pl".to_owned(),
                sound_id: "b".to_owned(),
                playing: Some(false),
            })
            .await
            .unwrap();
        let wrap = driver
            .handle_sound_update(&SoundUpdate {
                correlation_id: Uuid::new_v4(),
                playlist_id: "pl".to_owned(),
                sound_id: "a".to_owned(),
                playing: Some(true),
            })
            .await
            .unwrap();

        // Assert
        assert_eq!(stop, LoopDecision::RememberPrevious("b".to_owned()));
        assert_eq!(wrap, LoopDecision::Suppress);
    }

    #[tokio::test]
    async fn test_set_playlist_loop_on_unknown_playlist_is_not_found() {
        let host = Arc::new(InMemoryHost::default());
        let driver = driver(&host);

        let result = driver
            .set_playlist_loop(&SetPlaylistLoop {
                correlation_id: Uuid::new_v4(),
                playlist_id: "nope".to_owned(),
                enabled: true,
            })
            .await;

        match result.unwrap_err() {
            DomainError::NotFound { kind, id } => {
                assert_eq!(kind, "playlist");
                assert_eq!(id, "nope");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}

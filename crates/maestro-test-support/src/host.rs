//! Test hosts — mock `Host` implementations for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use maestro_core::documents::{Actor, Item, Playlist, PlaylistMode, PlaylistSound, User};
use maestro_core::error::DomainError;
use maestro_core::host::{DocumentRef, Host, SoundCommand, SoundEndRegistry, SoundKey};
use serde_json::Value;
use tokio::sync::oneshot;

/// A mutating call observed by [`InMemoryHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    /// `play_sound`.
    PlaySound(SoundKey),
    /// `play_playlist`.
    PlayPlaylist(String),
    /// `stop_playlist`.
    StopPlaylist(String),
    /// `update_sound`.
    UpdateSound(SoundKey, SoundCommand),
    /// `create_playlist`, by name.
    CreatePlaylist(String),
    /// `set_flags`.
    SetFlags(DocumentRef, Value),
    /// `store_settings`.
    StoreSettings(Value),
}

#[derive(Debug, Default)]
struct HostState {
    users: Vec<User>,
    settings: Value,
    playlists: Vec<Playlist>,
    actors: Vec<Actor>,
    items: Vec<Item>,
    other_flags: HashMap<(String, String), Value>,
    created: usize,
}

impl HostState {
    fn playlist_mut(&mut self, playlist_id: &str) -> Result<&mut Playlist, DomainError> {
        self.playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| DomainError::not_found("playlist", playlist_id))
    }

    fn sound_mut(&mut self, key: &SoundKey) -> Result<&mut PlaylistSound, DomainError> {
        self.playlist_mut(&key.playlist_id)?
            .sounds
            .iter_mut()
            .find(|s| s.id == key.sound_id)
            .ok_or_else(|| DomainError::not_found("sound", key.to_string()))
    }

    fn refresh_playing(&mut self, playlist_id: &str) {
        if let Ok(playlist) = self.playlist_mut(playlist_id) {
            playlist.playing = playlist.sounds.iter().any(|s| s.playing);
        }
    }
}

/// An in-memory host that applies playback calls to its own document copies
/// and records every mutating call in order.
///
/// The current user is registered as an active game master on construction.
#[derive(Debug)]
pub struct InMemoryHost {
    user_id: String,
    state: Mutex<HostState>,
    calls: Mutex<Vec<HostCall>>,
    failing_sounds: Mutex<HashSet<SoundKey>>,
    sound_end: Arc<SoundEndRegistry>,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new("gm-1")
    }
}

impl InMemoryHost {
    /// Creates a host whose session runs as `user_id`.
    #[must_use]
    pub fn new(user_id: &str) -> Self {
        let state = HostState {
            users: vec![User {
                id: user_id.to_owned(),
                is_gm: true,
                active: true,
            }],
            ..HostState::default()
        };
        Self {
            user_id: user_id.to_owned(),
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
            failing_sounds: Mutex::new(HashSet::new()),
            sound_end: Arc::new(SoundEndRegistry::new()),
        }
    }

    /// Adds a playlist.
    #[must_use]
    pub fn with_playlist(self, playlist: Playlist) -> Self {
        self.state.lock().unwrap().playlists.push(playlist);
        self
    }

    /// Adds an actor.
    #[must_use]
    pub fn with_actor(self, actor: Actor) -> Self {
        self.state.lock().unwrap().actors.push(actor);
        self
    }

    /// Adds an item.
    #[must_use]
    pub fn with_item(self, item: Item) -> Self {
        self.state.lock().unwrap().items.push(item);
        self
    }

    /// Adds another user.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        self.state.lock().unwrap().users.push(user);
        self
    }

    /// Sets the stored settings document.
    #[must_use]
    pub fn with_settings(self, settings: Value) -> Self {
        self.state.lock().unwrap().settings = settings;
        self
    }

    /// Makes every `update_sound` call for `key` fail.
    pub fn fail_updates_for(&self, key: &SoundKey) {
        self.failing_sounds.lock().unwrap().insert(key.clone());
    }

    /// The registry backing `sound_ended`.
    #[must_use]
    pub fn sound_end_registry(&self) -> Arc<SoundEndRegistry> {
        Arc::clone(&self.sound_end)
    }

    /// Marks a sound as finished and fires its "sound ended" waiters.
    pub fn finish_sound(&self, key: &SoundKey) -> usize {
        {
            let mut state = self.state.lock().unwrap();
            if let Ok(sound) = state.sound_mut(key) {
                sound.playing = false;
            }
            state.refresh_playing(&key.playlist_id);
        }
        self.sound_end.notify(key)
    }

    /// Overrides a sound's playing flag without recording a call.
    pub fn set_playing(&self, key: &SoundKey, playing: bool) {
        let mut state = self.state.lock().unwrap();
        if let Ok(sound) = state.sound_mut(key) {
            sound.playing = playing;
        }
        state.refresh_playing(&key.playlist_id);
    }

    /// Snapshot of every mutating call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the calls that start audio.
    #[must_use]
    pub fn play_calls(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, HostCall::PlaySound(_) | HostCall::PlayPlaylist(_)))
            .collect()
    }

    /// Keys of sounds that received a `Resume` command, in order.
    #[must_use]
    pub fn resumed(&self) -> Vec<SoundKey> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::UpdateSound(key, SoundCommand::Resume { .. }) => Some(key),
                _ => None,
            })
            .collect()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Current copy of a sound.
    #[must_use]
    pub fn sound_state(&self, key: &SoundKey) -> Option<PlaylistSound> {
        let mut state = self.state.lock().unwrap();
        state.sound_mut(key).ok().cloned()
    }

    /// Current copy of a playlist.
    #[must_use]
    pub fn playlist_state(&self, playlist_id: &str) -> Option<Playlist> {
        let mut state = self.state.lock().unwrap();
        state.playlist_mut(playlist_id).ok().cloned()
    }

    /// Current flag bag of a document.
    #[must_use]
    pub fn flags_of(&self, document: &DocumentRef) -> Value {
        let state = self.state.lock().unwrap();
        match document {
            DocumentRef::Actor(id) => state
                .actors
                .iter()
                .find(|a| &a.id == id)
                .map_or(Value::Null, |a| a.flags.clone()),
            DocumentRef::Item(id) => state
                .items
                .iter()
                .find(|i| &i.id == id)
                .map_or(Value::Null, |i| i.flags.clone()),
            DocumentRef::Playlist(id) => state
                .playlists
                .iter()
                .find(|p| &p.id == id)
                .map_or(Value::Null, |p| p.flags.clone()),
            other => state
                .other_flags
                .get(&(other.collection().to_owned(), other.id().to_owned()))
                .cloned()
                .unwrap_or(Value::Null),
        }
    }

    /// The stored settings document.
    #[must_use]
    pub fn stored_settings(&self) -> Value {
        self.state.lock().unwrap().settings.clone()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn merge_flags(target: &mut Value, patch: &Value) {
    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (k, v) in patch {
            target.insert(k.clone(), v.clone());
        }
    }
}

#[async_trait]
impl Host for InMemoryHost {
    fn current_user_id(&self) -> &str {
        &self.user_id
    }

    async fn users(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn settings(&self) -> Result<Value, DomainError> {
        Ok(self.state.lock().unwrap().settings.clone())
    }

    async fn store_settings(&self, settings: &Value) -> Result<(), DomainError> {
        self.record(HostCall::StoreSettings(settings.clone()));
        self.state.lock().unwrap().settings = settings.clone();
        Ok(())
    }

    async fn playlists(&self) -> Result<Vec<Playlist>, DomainError> {
        Ok(self.state.lock().unwrap().playlists.clone())
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Option<Playlist>, DomainError> {
        Ok(self.playlist_state(playlist_id))
    }

    async fn create_playlist(&self, name: &str) -> Result<Playlist, DomainError> {
        self.record(HostCall::CreatePlaylist(name.to_owned()));
        let mut state = self.state.lock().unwrap();
        state.created += 1;
        let created = Playlist {
            id: format!("created-{}", state.created),
            name: name.to_owned(),
            ..Playlist::default()
        };
        state.playlists.push(created.clone());
        Ok(created)
    }

    async fn actor(&self, actor_id: &str) -> Result<Option<Actor>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.actors.iter().find(|a| a.id == actor_id).cloned())
    }

    async fn actors(&self) -> Result<Vec<Actor>, DomainError> {
        Ok(self.state.lock().unwrap().actors.clone())
    }

    async fn item(
        &self,
        actor_id: Option<&str>,
        item_id: &str,
    ) -> Result<Option<Item>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .find(|i| i.id == item_id && i.actor_id.as_deref() == actor_id)
            .cloned())
    }

    async fn set_flags(&self, document: &DocumentRef, patch: &Value) -> Result<(), DomainError> {
        self.record(HostCall::SetFlags(document.clone(), patch.clone()));
        let mut state = self.state.lock().unwrap();
        let target = match document {
            DocumentRef::Actor(id) => state
                .actors
                .iter_mut()
                .find(|a| &a.id == id)
                .map(|a| &mut a.flags),
            DocumentRef::Item(id) => state
                .items
                .iter_mut()
                .find(|i| &i.id == id)
                .map(|i| &mut i.flags),
            DocumentRef::Playlist(id) => state
                .playlists
                .iter_mut()
                .find(|p| &p.id == id)
                .map(|p| &mut p.flags),
            other => Some(
                state
                    .other_flags
                    .entry((other.collection().to_owned(), other.id().to_owned()))
                    .or_insert(Value::Null),
            ),
        };
        let target = target.ok_or_else(|| {
            DomainError::not_found(document.collection(), document.id().to_owned())
        })?;
        merge_flags(target, patch);
        Ok(())
    }

    async fn play_sound(&self, key: &SoundKey) -> Result<(), DomainError> {
        self.record(HostCall::PlaySound(key.clone()));
        let mut state = self.state.lock().unwrap();
        let sound = state.sound_mut(key)?;
        sound.playing = true;
        sound.paused_time = None;
        state.refresh_playing(&key.playlist_id);
        Ok(())
    }

    async fn play_playlist(&self, playlist_id: &str) -> Result<(), DomainError> {
        self.record(HostCall::PlayPlaylist(playlist_id.to_owned()));
        let mut state = self.state.lock().unwrap();
        let playlist = state.playlist_mut(playlist_id)?;
        let simultaneous = playlist.mode == PlaylistMode::Simultaneous;
        let first = playlist.effective_order().into_iter().next();
        for sound in &mut playlist.sounds {
            if simultaneous || first.as_deref() == Some(sound.id.as_str()) {
                sound.playing = true;
                sound.paused_time = None;
            }
        }
        playlist.playing = true;
        Ok(())
    }

    async fn stop_playlist(&self, playlist_id: &str) -> Result<(), DomainError> {
        self.record(HostCall::StopPlaylist(playlist_id.to_owned()));
        let mut state = self.state.lock().unwrap();
        let playlist = state.playlist_mut(playlist_id)?;
        for sound in &mut playlist.sounds {
            sound.playing = false;
        }
        playlist.playing = false;
        Ok(())
    }

    async fn update_sound(
        &self,
        key: &SoundKey,
        command: SoundCommand,
    ) -> Result<(), DomainError> {
        self.record(HostCall::UpdateSound(key.clone(), command));
        if self.failing_sounds.lock().unwrap().contains(key) {
            return Err(DomainError::Infrastructure("update rejected".into()));
        }
        let mut state = self.state.lock().unwrap();
        let sound = state.sound_mut(key)?;
        match command {
            SoundCommand::Pause { at } => {
                sound.playing = false;
                sound.paused_time = Some(at);
            }
            SoundCommand::Resume { from } => {
                sound.playing = true;
                sound.paused_time = None;
                sound.current_time = Some(from);
            }
            SoundCommand::Reset => {
                sound.playing = false;
                sound.paused_time = None;
            }
        }
        state.refresh_playing(&key.playlist_id);
        Ok(())
    }

    fn sound_ended(&self, key: &SoundKey) -> oneshot::Receiver<()> {
        self.sound_end.subscribe(key)
    }
}

/// A host whose every call fails with an infrastructure error. Useful for
/// testing that nothing escapes an event-handling cycle.
#[derive(Debug)]
pub struct FailingHost {
    sound_end: SoundEndRegistry,
}

impl Default for FailingHost {
    fn default() -> Self {
        Self {
            sound_end: SoundEndRegistry::new(),
        }
    }
}

fn refused<T>() -> Result<T, DomainError> {
    Err(DomainError::Infrastructure("connection refused".into()))
}

#[async_trait]
impl Host for FailingHost {
    fn current_user_id(&self) -> &str {
        "gm-1"
    }

    async fn users(&self) -> Result<Vec<User>, DomainError> {
        refused()
    }

    async fn settings(&self) -> Result<Value, DomainError> {
        refused()
    }

    async fn store_settings(&self, _settings: &Value) -> Result<(), DomainError> {
        refused()
    }

    async fn playlists(&self) -> Result<Vec<Playlist>, DomainError> {
        refused()
    }

    async fn playlist(&self, _playlist_id: &str) -> Result<Option<Playlist>, DomainError> {
        refused()
    }

    async fn create_playlist(&self, _name: &str) -> Result<Playlist, DomainError> {
        refused()
    }

    async fn actor(&self, _actor_id: &str) -> Result<Option<Actor>, DomainError> {
        refused()
    }

    async fn actors(&self) -> Result<Vec<Actor>, DomainError> {
        refused()
    }

    async fn item(
        &self,
        _actor_id: Option<&str>,
        _item_id: &str,
    ) -> Result<Option<Item>, DomainError> {
        refused()
    }

    async fn set_flags(&self, _document: &DocumentRef, _patch: &Value) -> Result<(), DomainError> {
        refused()
    }

    async fn play_sound(&self, _key: &SoundKey) -> Result<(), DomainError> {
        refused()
    }

    async fn play_playlist(&self, _playlist_id: &str) -> Result<(), DomainError> {
        refused()
    }

    async fn stop_playlist(&self, _playlist_id: &str) -> Result<(), DomainError> {
        refused()
    }

    async fn update_sound(
        &self,
        _key: &SoundKey,
        _command: SoundCommand,
    ) -> Result<(), DomainError> {
        refused()
    }

    fn sound_ended(&self, key: &SoundKey) -> oneshot::Receiver<()> {
        self.sound_end.subscribe(key)
    }
}

/// Builds a playlist with the given sound ids, none of them playing.
#[must_use]
pub fn playlist(id: &str, name: &str, sound_ids: &[&str]) -> Playlist {
    Playlist {
        id: id.to_owned(),
        name: name.to_owned(),
        sounds: sound_ids.iter().map(|s| sound(s, false)).collect(),
        ..Playlist::default()
    }
}

/// Builds a sound whose name and path derive from its id.
#[must_use]
pub fn sound(id: &str, playing: bool) -> PlaylistSound {
    PlaylistSound {
        id: id.to_owned(),
        name: format!("{id} name"),
        path: format!("music/{id}.ogg"),
        playing,
        paused_time: None,
        current_time: playing.then_some(30.0),
    }
}

//! The host capability boundary.
//!
//! Everything the arbitration core needs from the tabletop host goes through
//! the [`Host`] trait: document lookup, flag writes, playback primitives and
//! "sound ended" notifications. Implementations live outside the core.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::documents::{Actor, Item, Playlist, User};
use crate::error::DomainError;

/// Identity of a sound across all playlists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundKey {
    /// Owning playlist.
    pub playlist_id: String,
    /// Sound within the playlist.
    pub sound_id: String,
}

impl SoundKey {
    /// Creates a key.
    #[must_use]
    pub fn new(playlist_id: impl Into<String>, sound_id: impl Into<String>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            sound_id: sound_id.into(),
        }
    }
}

impl fmt::Display for SoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.playlist_id, self.sound_id)
    }
}

/// A state change requested on a single sound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SoundCommand {
    /// Stop the sound and remember `at` as its paused position.
    Pause {
        /// Position in seconds.
        at: f64,
    },
    /// Start the sound from `from` and clear its paused marker.
    Resume {
        /// Position in seconds.
        from: f64,
    },
    /// Stop the sound and clear both its playing and paused markers.
    Reset,
}

/// A host document that can carry module flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DocumentRef {
    /// An actor.
    Actor(String),
    /// A combat encounter.
    Combat(String),
    /// An item (world-level or owned).
    Item(String),
    /// A playlist.
    Playlist(String),
    /// A chat message.
    ChatMessage(String),
}

impl DocumentRef {
    /// Collection name used in logs and bridge URLs.
    #[must_use]
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Actor(_) => "actors",
            Self::Combat(_) => "combats",
            Self::Item(_) => "items",
            Self::Playlist(_) => "playlists",
            Self::ChatMessage(_) => "messages",
        }
    }

    /// The document identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Actor(id)
            | Self::Combat(id)
            | Self::Item(id)
            | Self::Playlist(id)
            | Self::ChatMessage(id) => id,
        }
    }
}

/// Capability contract consumed from the tabletop host.
#[async_trait]
pub trait Host: Send + Sync {
    /// Identifier of the user this session runs as.
    fn current_user_id(&self) -> &str;

    /// All users known to the session.
    async fn users(&self) -> Result<Vec<User>, DomainError>;

    /// The stored settings document (may be `Null`).
    async fn settings(&self) -> Result<Value, DomainError>;

    /// Replaces the stored settings document.
    async fn store_settings(&self, settings: &Value) -> Result<(), DomainError>;

    /// All playlists with their sounds.
    async fn playlists(&self) -> Result<Vec<Playlist>, DomainError>;

    /// A single playlist by id.
    async fn playlist(&self, playlist_id: &str) -> Result<Option<Playlist>, DomainError>;

    /// Creates an empty playlist.
    async fn create_playlist(&self, name: &str) -> Result<Playlist, DomainError>;

    /// A single actor by id.
    async fn actor(&self, actor_id: &str) -> Result<Option<Actor>, DomainError>;

    /// All world actors.
    async fn actors(&self) -> Result<Vec<Actor>, DomainError>;

    /// An item, looked up on `actor_id` when given, otherwise in the world.
    async fn item(&self, actor_id: Option<&str>, item_id: &str)
    -> Result<Option<Item>, DomainError>;

    /// Merges `patch` into the module flag bag of `document`.
    async fn set_flags(&self, document: &DocumentRef, patch: &Value) -> Result<(), DomainError>;

    /// Plays one sound.
    async fn play_sound(&self, key: &SoundKey) -> Result<(), DomainError>;

    /// Plays a whole playlist with its own ordering and looping.
    async fn play_playlist(&self, playlist_id: &str) -> Result<(), DomainError>;

    /// Stops every sound of a playlist.
    async fn stop_playlist(&self, playlist_id: &str) -> Result<(), DomainError>;

    /// Applies a state change to one sound.
    async fn update_sound(&self, key: &SoundKey, command: SoundCommand)
    -> Result<(), DomainError>;

    /// Registers a one-shot notification fired when `key` finishes playing.
    ///
    /// The host offers no way to cancel a registration; receivers that are
    /// never fired are simply dropped.
    fn sound_ended(&self, key: &SoundKey) -> oneshot::Receiver<()>;
}

/// Registry of pending "sound ended" notifications, shared between a host
/// implementation and whatever delivers the host's end-of-sound events.
#[derive(Debug, Default)]
pub struct SoundEndRegistry {
    waiters: Mutex<HashMap<SoundKey, Vec<oneshot::Sender<()>>>>,
}

impl SoundEndRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a waiter for `key`, dropping earlier waiters whose
    /// receivers are gone.
    pub fn subscribe(&self, key: &SoundKey) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let mut waiters = self.waiters.lock().unwrap_or_else(PoisonError::into_inner);
        let senders = waiters.entry(key.clone()).or_default();
        senders.retain(|tx| !tx.is_closed());
        senders.push(tx);
        rx
    }

    /// Fires and forgets every waiter registered for `key`. Returns how many
    /// live waiters were woken.
    pub fn notify(&self, key: &SoundKey) -> usize {
        let senders = self
            .waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .unwrap_or_default();
        senders
            .into_iter()
            .map(|tx| tx.send(()))
            .filter(Result::is_ok)
            .count()
    }

    /// Number of waiters registered for `key`, live or not.
    #[must_use]
    pub fn waiting(&self, key: &SoundKey) -> usize {
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map_or(0, Vec::len)
    }

    /// Number of keys with at least one registered waiter.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_wakes_every_waiter_once() {
        let registry = SoundEndRegistry::new();
        let key = SoundKey::new("pl", "snd");
        let first = registry.subscribe(&key);
        let second = registry.subscribe(&key);

        assert_eq!(registry.notify(&key), 2);
        assert!(first.await.is_ok());
        assert!(second.await.is_ok());
        assert_eq!(registry.notify(&key), 0);
    }

    #[test]
    fn test_notify_skips_dropped_receivers() {
        let registry = SoundEndRegistry::new();
        let key = SoundKey::new("pl", "snd");
        drop(registry.subscribe(&key));

        assert_eq!(registry.notify(&key), 0);
        assert_eq!(registry.pending(), 0);
    }

    #[test]
    fn test_subscribe_prunes_abandoned_waiters() {
        // Arrange
        let registry = SoundEndRegistry::new();
        let key = SoundKey::new("pl", "snd");
        for _ in 0..50 {
            drop(registry.subscribe(&key));
        }

        // Act
        let live = registry.subscribe(&key);

        // Assert
        assert_eq!(registry.waiting(&key), 1);
        drop(live);
    }

    #[test]
    fn test_sound_command_wire_shape() {
        let json = serde_json::to_value(SoundCommand::Pause { at: 12.5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "action": "pause", "at": 12.5 }));
    }

    #[test]
    fn test_document_ref_wire_shape() {
        let json = serde_json::to_value(DocumentRef::Actor("a1".to_owned())).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "actor", "id": "a1" }));
    }
}

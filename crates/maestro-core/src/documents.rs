//! Read-only snapshots of host documents.
//!
//! The host owns these documents; the core only ever sees point-in-time
//! copies delivered by [`crate::host::Host`] or carried on trigger events.
//! Module flags stay as raw JSON here and are parsed into typed records by
//! the code that needs them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::SoundKey;

/// Playback ordering a playlist applies to itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistMode {
    /// Manual playback only.
    Disabled,
    /// Sounds play one after another in list order.
    #[default]
    Sequential,
    /// Sounds play one after another in shuffled order.
    Shuffle,
    /// All sounds play at once.
    Simultaneous,
}

impl PlaylistMode {
    /// Returns `true` for modes that advance from one sound to the next.
    #[must_use]
    pub fn is_sequenced(self) -> bool {
        matches!(self, Self::Sequential | Self::Shuffle)
    }
}

/// A sound inside a playlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaylistSound {
    /// Sound identifier, unique within its playlist.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Audio file path.
    pub path: String,
    /// Whether the sound is currently audible.
    pub playing: bool,
    /// Position the sound was paused at, if paused.
    pub paused_time: Option<f64>,
    /// Current playback position in seconds, if the host reports one.
    pub current_time: Option<f64>,
}

/// A playlist and its sounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Playlist {
    /// Playlist identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the playlist reports itself as playing.
    pub playing: bool,
    /// Ordering mode.
    pub mode: PlaylistMode,
    /// Shuffled order of sound ids, meaningful in [`PlaylistMode::Shuffle`].
    pub playback_order: Vec<String>,
    /// The sounds, in list order.
    pub sounds: Vec<PlaylistSound>,
    /// This module's flag bag on the playlist.
    pub flags: Value,
}

impl Playlist {
    /// Looks up a sound by id.
    #[must_use]
    pub fn sound(&self, sound_id: &str) -> Option<&PlaylistSound> {
        self.sounds.iter().find(|s| s.id == sound_id)
    }

    /// Builds the identity key of one of this playlist's sounds.
    #[must_use]
    pub fn key(&self, sound_id: &str) -> SoundKey {
        SoundKey::new(&self.id, sound_id)
    }

    /// Sound ids in the order the playlist will advance through them.
    #[must_use]
    pub fn effective_order(&self) -> Vec<String> {
        if self.mode == PlaylistMode::Shuffle && !self.playback_order.is_empty() {
            self.playback_order.clone()
        } else {
            self.sounds.iter().map(|s| s.id.clone()).collect()
        }
    }
}

/// An actor (character or creature).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Actor {
    /// Actor identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// This module's flag bag on the actor.
    pub flags: Value,
}

/// An item, either world-level or owned by an actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
    /// Item identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning actor, if the item is owned.
    pub actor_id: Option<String>,
    /// This module's flag bag on the item.
    pub flags: Value,
}

impl Item {
    /// Returns `true` when an actor owns this item.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.actor_id.is_some()
    }
}

/// A combat encounter as delivered with a lifecycle event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Combat {
    /// Encounter identifier.
    pub id: String,
    /// Current round; 0 before the encounter starts.
    pub round: u32,
    /// Index of the acting combatant, if any.
    pub turn: Option<u32>,
    /// Number of combatants.
    pub combatant_count: usize,
    /// Actor of the acting combatant, if any.
    pub acting_actor_id: Option<String>,
    /// This module's flag bag on the encounter.
    pub flags: Value,
}

/// A user connected to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    /// User identifier.
    pub id: String,
    /// Whether the user holds game-master privileges.
    pub is_gm: bool,
    /// Whether the user is currently connected.
    pub active: bool,
}

/// Who a chat message was spoken as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Speaker {
    /// Speaking actor.
    pub actor: Option<String>,
    /// Speaking token.
    pub token: Option<String>,
    /// Scene of the speaking token.
    pub scene: Option<String>,
}

/// One result rolled on a die.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DieResult {
    /// Face value.
    pub result: i64,
    /// Present when the result was evaluated against a success target.
    pub success: Option<bool>,
}

/// One die term of a roll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Die {
    /// Number of faces.
    pub faces: u32,
    /// Individual results.
    pub results: Vec<DieResult>,
    /// Total of this term, if the host reports one.
    pub total: Option<i64>,
}

/// Metadata a game system attaches to a roll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RollOptions {
    /// Critical threshold embedded by the game system.
    pub critical: Option<i64>,
    /// Fumble threshold embedded by the game system.
    pub fumble: Option<i64>,
    /// Margin of success, present on derived rolls.
    pub margin_success: Option<i64>,
    /// Margin of failure, present on derived rolls.
    pub margin_failure: Option<i64>,
}

/// A resolved dice roll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Roll {
    /// Die terms in formula order.
    pub dice: Vec<Die>,
    /// Total of the whole formula.
    pub total: i64,
    /// System metadata.
    pub options: RollOptions,
}

/// A chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message identifier.
    pub id: String,
    /// Speaker of the message.
    pub speaker: Speaker,
    /// Whether the message carries rolls.
    pub is_roll: bool,
    /// Whether the current user may see the message content.
    pub content_visible: bool,
    /// Rolls carried by the message.
    pub rolls: Vec<Roll>,
    /// Sound the host will play for the message.
    pub sound: Option<String>,
    /// Item id found on an item chat card, if the message renders one.
    pub item_card_id: Option<String>,
    /// This module's flag bag on the message.
    pub flags: Value,
}

//! Selections — what a trigger wants to be audible.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Wire token for whole-playlist playback.
pub const PLAY_ALL: &str = "play-all";

/// Wire token for a uniformly random sound from the playlist.
pub const RANDOM_TRACK: &str = "random-track";

/// The track half of a selection: a concrete sound or a playback mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TrackChoice {
    /// A concrete sound identifier within the playlist.
    Sound(String),
    /// Play every sound via the playlist's own ordering.
    All,
    /// Pick one sound uniformly at random each time.
    Random,
}

impl TrackChoice {
    /// Parses a stored track value. Blank values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw {
            "" => None,
            PLAY_ALL => Some(Self::All),
            RANDOM_TRACK => Some(Self::Random),
            id => Some(Self::Sound(id.to_owned())),
        }
    }

    /// Returns the wire form of this choice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sound(id) => id,
            Self::All => PLAY_ALL,
            Self::Random => RANDOM_TRACK,
        }
    }

    /// Returns `true` for a concrete sound (not a playback mode).
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        matches!(self, Self::Sound(_))
    }
}

impl TryFrom<String> for TrackChoice {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
            .ok_or_else(|| DomainError::Validation("track must not be blank".to_owned()))
    }
}

impl From<TrackChoice> for String {
    fn from(value: TrackChoice) -> Self {
        match value {
            TrackChoice::Sound(id) => id,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TrackChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(playlist, track-or-mode)` pair describing what should be audible.
///
/// "No selection" is represented as `Option::<Selection>::None`; a
/// `Selection` value always names both a playlist and a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSelection")]
pub struct Selection {
    /// The playlist identifier.
    pub playlist_id: String,
    /// The sound or mode to play.
    pub track: TrackChoice,
}

impl Selection {
    /// Builds a selection from raw stored fields. Either field blank → `None`.
    #[must_use]
    pub fn from_parts(playlist_id: &str, track: &str) -> Option<Self> {
        let playlist_id = playlist_id.trim();
        if playlist_id.is_empty() {
            return None;
        }
        Some(Self {
            playlist_id: playlist_id.to_owned(),
            track: TrackChoice::parse(track)?,
        })
    }

    /// Builds a selection for a concrete sound.
    #[must_use]
    pub fn sound(playlist_id: impl Into<String>, sound_id: impl Into<String>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            track: TrackChoice::Sound(sound_id.into()),
        }
    }
}

#[derive(Deserialize)]
struct RawSelection {
    playlist_id: String,
    track: TrackChoice,
}

impl TryFrom<RawSelection> for Selection {
    type Error = DomainError;

    fn try_from(raw: RawSelection) -> Result<Self, Self::Error> {
        let playlist_id = raw.playlist_id.trim();
        if playlist_id.is_empty() {
            return Err(DomainError::Validation("playlist must not be blank".to_owned()));
        }
        Ok(Self {
            playlist_id: playlist_id.to_owned(),
            track: raw.track,
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.playlist_id, self.track)
    }
}

/// Identifier of whoever owns an active selection (actor id or encounter id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The selection an engine currently holds as audible, and who asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSelection {
    /// The realized selection.
    pub selection: Selection,
    /// The actor or encounter that owns it.
    pub owner: OwnerId,
    /// When the engine started it.
    pub started_at: DateTime<Utc>,
}

impl ActiveSelection {
    /// Returns `true` if this record is exactly `(selection, owner)`.
    #[must_use]
    pub fn is(&self, selection: &Selection, owner: &OwnerId) -> bool {
        &self.selection == selection && &self.owner == owner
    }
}

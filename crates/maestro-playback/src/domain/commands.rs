//! Commands for the Playback context.

use maestro_core::command::Command;
use serde::Deserialize;
use uuid::Uuid;

/// Which sound field a lookup matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindBy {
    /// Display name.
    #[default]
    Name,
    /// Audio file path.
    Path,
    /// Sound identifier.
    Id,
}

/// Command to play the first sound matching a search string.
#[derive(Debug, Clone)]
pub struct PlaySoundByName {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Value to match.
    pub search: String,
    /// Restrict the search to this playlist id.
    pub playlist_id: Option<String>,
    /// Field to match on.
    pub find_by: FindBy,
}

impl Command for PlaySoundByName {
    fn command_type(&self) -> &'static str {
        "playback.play_sound_by_name"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pause the referenced sounds that are playing.
///
/// References are sound ids, names or paths, tried in that order.
#[derive(Debug, Clone)]
pub struct PauseSounds {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Sound references.
    pub sounds: Vec<String>,
}

impl Command for PauseSounds {
    fn command_type(&self) -> &'static str {
        "playback.pause_sounds"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to resume the referenced sounds that are paused.
#[derive(Debug, Clone)]
pub struct ResumeSounds {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Sound references.
    pub sounds: Vec<String>,
}

impl Command for ResumeSounds {
    fn command_type(&self) -> &'static str {
        "playback.resume_sounds"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// A pending change to a sound's playing state, offered to the loop guard
/// before the host applies it.
#[derive(Debug, Clone)]
pub struct SoundUpdate {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Owning playlist.
    pub playlist_id: String,
    /// Sound being updated.
    pub sound_id: String,
    /// Incoming playing state, if the update touches it.
    pub playing: Option<bool>,
}

impl Command for SoundUpdate {
    fn command_type(&self) -> &'static str {
        "playback.sound_update"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to turn a playlist's wrap-around looping on or off.
#[derive(Debug, Clone)]
pub struct SetPlaylistLoop {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target playlist.
    pub playlist_id: String,
    /// Whether the playlist should loop.
    pub enabled: bool,
}

impl Command for SetPlaylistLoop {
    fn command_type(&self) -> &'static str {
        "playback.set_playlist_loop"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

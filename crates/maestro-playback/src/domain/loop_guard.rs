//! Playlist loop guard.
//!
//! Sequenced playlists wrap from their last sound back to the first. A
//! playlist flagged with looping disabled stops there instead. The guard sees
//! every pending playing-state change of a sound: stops record the sound as
//! "previous", and a start that follows a stop of the last sound in the order
//! is suppressed.

use maestro_core::documents::Playlist;
use serde::Serialize;
use serde_json::Value;

/// Flag holding the loop toggle; only an explicit `false` disables looping.
pub const LOOP_FLAG: &str = "playlist-loop";

/// Flag holding the id of the most recently stopped sound.
pub const PREVIOUS_SOUND_FLAG: &str = "previous-sound";

/// What to do with a pending sound update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "soundId", rename_all = "snake_case")]
pub enum LoopDecision {
    /// Let the update through and remember this sound as previous.
    RememberPrevious(String),
    /// Cancel the start and mark the playlist stopped.
    Suppress,
    /// Let the update through untouched.
    Allow,
}

/// Returns `false` only when the playlist explicitly disables looping.
#[must_use]
pub fn loop_enabled(playlist: &Playlist) -> bool {
    playlist.flags.get(LOOP_FLAG).and_then(Value::as_bool) != Some(false)
}

fn previous_sound(playlist: &Playlist) -> Option<&str> {
    playlist
        .flags
        .get(PREVIOUS_SOUND_FLAG)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Decides how a pending playing-state change should be handled.
#[must_use]
pub fn decide(playlist: &Playlist, sound_id: &str, incoming_playing: Option<bool>) -> LoopDecision {
    if !playlist.playing || !playlist.mode.is_sequenced() {
        return LoopDecision::Allow;
    }

    match incoming_playing {
        Some(false) => LoopDecision::RememberPrevious(sound_id.to_owned()),
        Some(true) => {
            let Some(previous) = previous_sound(playlist) else {
                return LoopDecision::Allow;
            };
            let order = playlist.effective_order();
            let wrapped = order.last().is_some_and(|last| last == previous);
            if wrapped && !loop_enabled(playlist) {
                LoopDecision::Suppress
            } else {
                LoopDecision::Allow
            }
        }
        None => LoopDecision::Allow,
    }
}

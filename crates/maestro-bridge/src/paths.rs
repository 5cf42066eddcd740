//! REST paths of the host bridge.

use maestro_core::host::{DocumentRef, SoundKey};

/// All playlists, or playlist creation.
pub const PLAYLISTS: &str = "/playlists";

/// All actors.
pub const ACTORS: &str = "/actors";

/// All users.
pub const USERS: &str = "/users";

/// The module settings document.
pub const SETTINGS: &str = "/settings";

/// A single playlist.
#[must_use]
pub fn playlist(playlist_id: &str) -> String {
    format!("{PLAYLISTS}/{playlist_id}")
}

/// Whole-playlist playback.
#[must_use]
pub fn playlist_play(playlist_id: &str) -> String {
    format!("{PLAYLISTS}/{playlist_id}/play")
}

/// Whole-playlist stop.
#[must_use]
pub fn playlist_stop(playlist_id: &str) -> String {
    format!("{PLAYLISTS}/{playlist_id}/stop")
}

/// A single sound, target of state updates.
#[must_use]
pub fn sound(key: &SoundKey) -> String {
    format!("{PLAYLISTS}/{}/sounds/{}", key.playlist_id, key.sound_id)
}

/// Single-sound playback.
#[must_use]
pub fn sound_play(key: &SoundKey) -> String {
    format!("{}/play", sound(key))
}

/// A single actor.
#[must_use]
pub fn actor(actor_id: &str) -> String {
    format!("{ACTORS}/{actor_id}")
}

/// A single item. Owned items are addressed with an `actor` query parameter.
#[must_use]
pub fn item(item_id: &str) -> String {
    format!("/items/{item_id}")
}

/// The module flag bag of a document.
#[must_use]
pub fn flags(document: &DocumentRef) -> String {
    format!("/{}/{}/flags", document.collection(), document.id())
}

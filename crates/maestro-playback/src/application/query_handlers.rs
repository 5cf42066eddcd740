//! Query handlers for the Playback context.
//!
//! Read-only lookups of sounds across the host's playlists.

use maestro_core::documents::{Playlist, PlaylistSound};
use maestro_core::error::DomainError;
use maestro_core::host::{Host, SoundKey};
use serde::Serialize;

use crate::domain::commands::FindBy;

/// Read-only view of a sound found in a playlist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundView {
    /// Identity of the sound.
    pub key: SoundKey,
    /// Name of the owning playlist.
    pub playlist_name: String,
    /// Display name.
    pub name: String,
    /// Audio file path.
    pub path: String,
    /// Whether the sound is audible.
    pub playing: bool,
    /// Paused position, if paused.
    pub paused_time: Option<f64>,
}

impl SoundView {
    fn new(playlist: &Playlist, sound: &PlaylistSound) -> Self {
        Self {
            key: playlist.key(&sound.id),
            playlist_name: playlist.name.clone(),
            name: sound.name.clone(),
            path: sound.path.clone(),
            playing: sound.playing,
            paused_time: sound.paused_time,
        }
    }
}

fn matches(sound: &PlaylistSound, search: &str, find_by: FindBy) -> bool {
    match find_by {
        FindBy::Name => sound.name == search,
        FindBy::Path => sound.path == search,
        FindBy::Id => sound.id == search,
    }
}

/// Finds the first sound matching `search` in one playlist.
#[must_use]
pub fn find_in_playlist<'a>(
    playlist: &'a Playlist,
    search: &str,
    find_by: FindBy,
) -> Option<&'a PlaylistSound> {
    playlist.sounds.iter().find(|s| matches(s, search, find_by))
}

/// Finds the first sound matching `search`, scanning playlists in order.
#[must_use]
pub fn find_in<'a>(
    playlists: &'a [Playlist],
    search: &str,
    find_by: FindBy,
) -> Option<(&'a Playlist, &'a PlaylistSound)> {
    playlists
        .iter()
        .find_map(|p| find_in_playlist(p, search, find_by).map(|s| (p, s)))
}

/// Resolves a loose sound reference, trying id, then name, then path.
#[must_use]
pub fn find_reference<'a>(
    playlists: &'a [Playlist],
    reference: &str,
) -> Option<(&'a Playlist, &'a PlaylistSound)> {
    [FindBy::Id, FindBy::Name, FindBy::Path]
        .into_iter()
        .find_map(|by| find_in(playlists, reference, by))
}

/// Finds a sound across all playlists.
///
/// # Errors
///
/// Returns `DomainError` if the host cannot list playlists.
pub async fn find_sound(
    host: &dyn Host,
    search: &str,
    find_by: FindBy,
) -> Result<Option<SoundView>, DomainError> {
    let playlists = host.playlists().await?;
    Ok(find_in(&playlists, search, find_by).map(|(p, s)| SoundView::new(p, s)))
}

/// Lists the sounds of a playlist; an unknown playlist has none.
///
/// # Errors
///
/// Returns `DomainError` if the host lookup fails.
pub async fn playlist_sounds(
    host: &dyn Host,
    playlist_id: &str,
) -> Result<Vec<SoundView>, DomainError> {
    let Some(playlist) = host.playlist(playlist_id).await? else {
        return Ok(Vec::new());
    };
    Ok(playlist
        .sounds
        .iter()
        .map(|s| SoundView::new(&playlist, s))
        .collect())
}

#[cfg(test)]
mod tests {
    use maestro_test_support::{InMemoryHost, playlist};

    use super::*;

    fn library() -> Vec<Playlist> {
        vec![
            playlist("amb", "Ambience", &["rain", "wind"]),
            playlist("hype", "Hype Tracks", &["theme", "rain"]),
        ]
    }

    #[test]
    fn test_find_in_returns_first_playlist_match() {
        let playlists = library();

        let (found_playlist, found_sound) = find_in(&playlists, "rain", FindBy::Id).unwrap();

        assert_eq!(found_playlist.id, "amb");
        assert_eq!(found_sound.id, "rain");
    }

    #[test]
    fn test_find_in_matches_by_path_and_name() {
        let playlists = library();

        assert_eq!(
            find_in(&playlists, "music/theme.ogg", FindBy::Path).map(|(_, s)| s.id.as_str()),
            Some("theme")
        );
        assert_eq!(
            find_in(&playlists, "wind name", FindBy::Name).map(|(_, s)| s.id.as_str()),
            Some("wind")
        );
        assert!(find_in(&playlists, "wind", FindBy::Name).is_none());
    }

    #[test]
    fn test_find_reference_falls_back_from_id_to_name_to_path() {
        let playlists = library();

        assert_eq!(find_reference(&playlists, "theme").unwrap().1.id, "theme");
        assert_eq!(find_reference(&playlists, "theme name").unwrap().1.id, "theme");
        assert_eq!(find_reference(&playlists, "music/wind.ogg").unwrap().1.id, "wind");
        assert!(find_reference(&playlists, "nothing").is_none());
    }

    #[tokio::test]
    async fn test_find_sound_reports_owning_playlist() {
        // Arrange
        let host = InMemoryHost::default()
            .with_playlist(playlist("hype", "Hype Tracks", &["theme"]));

        // Act
        let found = find_sound(&host, "theme name", FindBy::Name).await.unwrap();

        // Assert
        let view = found.unwrap();
        assert_eq!(view.key, SoundKey::new("hype", "theme"));
        assert_eq!(view.playlist_name, "Hype Tracks");
    }

    #[tokio::test]
    async fn test_playlist_sounds_of_unknown_playlist_is_empty() {
        let host = InMemoryHost::default();

        let sounds = playlist_sounds(&host, "missing").await.unwrap();

        assert!(sounds.is_empty());
    }
}

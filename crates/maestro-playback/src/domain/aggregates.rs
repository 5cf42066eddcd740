//! Aggregate roots for the Playback context.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use maestro_core::host::SoundKey;
use serde::Serialize;

/// A host sound that was interrupted and should later be resumed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PausedSound {
    /// Identity of the sound.
    pub key: SoundKey,
    /// Display name at the time of pausing.
    pub name: String,
    /// Playback position in seconds.
    pub position: f64,
    /// When the sound was paused.
    pub paused_at: DateTime<Utc>,
}

/// The set of sounds an engine has paused and owes a resume to.
///
/// Entries are keyed by [`SoundKey`]; a key is never held twice.
#[derive(Debug, Default)]
pub struct PausedSoundStack {
    entries: BTreeMap<SoundKey, PausedSound>,
}

impl PausedSoundStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every sound whose key is not already held. The first recorded
    /// position wins. Returns how many entries were added.
    pub fn merge(&mut self, sounds: impl IntoIterator<Item = PausedSound>) -> usize {
        let mut added = 0;
        for sound in sounds {
            if self.entries.contains_key(&sound.key) {
                continue;
            }
            self.entries.insert(sound.key.clone(), sound);
            added += 1;
        }
        added
    }

    /// Removes and returns one entry.
    pub fn pop(&mut self) -> Option<PausedSound> {
        self.entries.pop_first().map(|(_, sound)| sound)
    }

    /// Returns `true` when no sound is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of held sounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when `key` is held.
    #[must_use]
    pub fn contains(&self, key: &SoundKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Held entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &PausedSound> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn paused(playlist: &str, sound: &str, position: f64) -> PausedSound {
        PausedSound {
            key: SoundKey::new(playlist, sound),
            name: sound.to_owned(),
            position,
            paused_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_merge_skips_keys_already_held() {
        // Arrange
        let mut stack = PausedSoundStack::new();
        stack.merge([paused("amb", "rain", 12.0)]);

        // Act
        let added = stack.merge([paused("amb", "rain", 40.0), paused("amb", "wind", 3.0)]);

        // Assert
        assert_eq!(added, 1);
        assert_eq!(stack.len(), 2);
        let rain = stack.iter().find(|s| s.key.sound_id == "rain").unwrap();
        assert!((rain.position - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut stack = PausedSoundStack::new();
        let batch = vec![paused("amb", "rain", 1.0), paused("town", "bells", 2.0)];

        stack.merge(batch.clone());
        let added_again = stack.merge(batch);

        assert_eq!(added_again, 0);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_same_sound_id_in_different_playlists_are_distinct() {
        let mut stack = PausedSoundStack::new();

        stack.merge([paused("a", "s1", 0.0), paused("b", "s1", 0.0)]);

        assert_eq!(stack.len(), 2);
        assert!(stack.contains(&SoundKey::new("b", "s1")));
    }

    #[test]
    fn test_pop_drains_to_empty() {
        let mut stack = PausedSoundStack::new();
        stack.merge([paused("amb", "rain", 1.0), paused("amb", "wind", 2.0)]);

        let mut popped = Vec::new();
        while let Some(sound) = stack.pop() {
            popped.push(sound.key.sound_id);
        }

        assert_eq!(popped, vec!["rain", "wind"]);
        assert!(stack.is_empty());
    }
}

//! Selection resolver: explicit override first, per-kind default second.
//!
//! Every function here is pure. Missing or malformed override data is
//! treated as absent; nothing in this module fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::selection::Selection;

/// Flag key holding an override's playlist id.
pub const PLAYLIST_FLAG: &str = "playlist";

/// Flag key holding an override's track id or mode token.
pub const TRACK_FLAG: &str = "track";

/// Typed form of the `{ playlist, track }` pair stored on a document, or of a
/// configured per-kind default. Blank fields are normalized to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOverride {
    /// Playlist identifier, if set.
    #[serde(default)]
    pub playlist: Option<String>,
    /// Track identifier or mode token, if set.
    #[serde(default)]
    pub track: Option<String>,
}

impl TrackOverride {
    /// Builds an override from raw fields, dropping blank values.
    #[must_use]
    pub fn new(playlist: &str, track: &str) -> Self {
        Self {
            playlist: non_blank(playlist),
            track: non_blank(track),
        }
    }

    /// Returns `true` when neither field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.playlist.is_none() && self.track.is_none()
    }

    /// Serializes this override as a flag patch for the host.
    #[must_use]
    pub fn to_flags(&self) -> Value {
        serde_json::json!({
            PLAYLIST_FLAG: self.playlist.clone().unwrap_or_default(),
            TRACK_FLAG: self.track.clone().unwrap_or_default(),
        })
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Reads an override out of a document's module flag bag.
///
/// Returns `None` when the bag is not an object. Fields of the wrong type
/// are ignored individually.
#[must_use]
pub fn parse_override(flags: &Value) -> Option<TrackOverride> {
    let bag = flags.as_object()?;
    let field = |name: &str| bag.get(name).and_then(Value::as_str).and_then(non_blank);
    Some(TrackOverride {
        playlist: field(PLAYLIST_FLAG),
        track: field(TRACK_FLAG),
    })
}

/// Resolves the desired selection for a trigger context.
///
/// Each field of `explicit` that is unset is substituted independently from
/// `default`. If the merged pair lacks a playlist or a track the result is
/// "no selection".
#[must_use]
pub fn resolve(explicit: Option<&TrackOverride>, default: &TrackOverride) -> Option<Selection> {
    let playlist = resolve_playlist(explicit, default)?;
    let track = explicit
        .and_then(|o| o.track.as_deref())
        .or(default.track.as_deref())?;
    Selection::from_parts(playlist, track)
}

/// Resolves only the playlist half of a context's selection.
#[must_use]
pub fn resolve_playlist<'a>(
    explicit: Option<&'a TrackOverride>,
    default: &'a TrackOverride,
) -> Option<&'a str> {
    explicit
        .and_then(|o| o.playlist.as_deref())
        .or(default.playlist.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::TrackChoice;

    fn default_pair() -> TrackOverride {
        TrackOverride::new("default-pl", "default-snd")
    }

    #[test]
    fn test_no_override_yields_exact_default() {
        let resolved = resolve(None, &default_pair());
        assert_eq!(resolved, Some(Selection::sound("default-pl", "default-snd")));
    }

    #[test]
    fn test_full_override_wins() {
        let explicit = TrackOverride::new("P1", "T1");
        let resolved = resolve(Some(&explicit), &default_pair());
        assert_eq!(resolved, Some(Selection::sound("P1", "T1")));
    }

    #[test]
    fn test_empty_track_falls_back_to_default_track_only() {
        let explicit = TrackOverride::new("P1", "");
        let resolved = resolve(Some(&explicit), &default_pair());
        assert_eq!(resolved, Some(Selection::sound("P1", "default-snd")));
    }

    #[test]
    fn test_empty_playlist_falls_back_to_default_playlist_only() {
        let explicit = TrackOverride::new("", "T1");
        let resolved = resolve(Some(&explicit), &default_pair());
        assert_eq!(resolved, Some(Selection::sound("default-pl", "T1")));
    }

    #[test]
    fn test_nothing_configured_resolves_to_no_selection() {
        assert_eq!(resolve(None, &TrackOverride::default()), None);
        let half = TrackOverride::new("P1", "");
        assert_eq!(resolve(Some(&half), &TrackOverride::default()), None);
    }

    #[test]
    fn test_mode_tokens_survive_resolution() {
        let explicit = TrackOverride::new("P1", "random-track");
        let resolved = resolve(Some(&explicit), &TrackOverride::default()).unwrap();
        assert_eq!(resolved.track, TrackChoice::Random);
    }

    #[test]
    fn test_parse_override_tolerates_malformed_flags() {
        assert_eq!(parse_override(&Value::Null), None);
        assert_eq!(parse_override(&serde_json::json!("oops")), None);

        let parsed = parse_override(&serde_json::json!({ "playlist": 7, "track": "T1" })).unwrap();
        assert_eq!(parsed.playlist, None);
        assert_eq!(parsed.track.as_deref(), Some("T1"));
    }

    #[test]
    fn test_parse_override_ignores_blank_strings() {
        let parsed = parse_override(&serde_json::json!({ "playlist": "  ", "track": "" })).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_to_flags_round_trips_through_parse() {
        let original = TrackOverride::new("P1", "play-all");
        assert_eq!(parse_override(&original.to_flags()), Some(original));
    }
}

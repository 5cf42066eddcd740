//! Item chat card rules.

use maestro_core::documents::ChatMessage;
use maestro_core::resolver::{TrackOverride, resolve};
use maestro_core::selection::Selection;
use serde::Serialize;
use serde_json::{Value, json};

/// Message flag marking a card whose track already played.
pub const PLAYED_FLAG: &str = "item-track-played";

/// Where a card's item override was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSource {
    /// An item owned by the speaking actor.
    Owned,
    /// A world-level item.
    World,
    /// The deleted-items store.
    Deleted,
}

/// Returns the item id carried by the message's card, if any.
#[must_use]
pub fn card_item_id(message: &ChatMessage) -> Option<&str> {
    message
        .item_card_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Returns `true` once the card's track has been played.
#[must_use]
pub fn already_played(message: &ChatMessage) -> bool {
    message
        .flags
        .get(PLAYED_FLAG)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Flag patch marking a card as played.
#[must_use]
pub fn played_patch() -> Value {
    json!({ PLAYED_FLAG: true })
}

/// Selection for an item override. Items have no per-kind default, so both
/// halves must be set on the override itself.
#[must_use]
pub fn card_selection(value: &TrackOverride) -> Option<Selection> {
    resolve(Some(value), &TrackOverride::default())
}

#[cfg(test)]
mod tests {
    use maestro_core::selection::TrackChoice;

    use super::*;

    #[test]
    fn test_blank_card_id_is_ignored() {
        let message = ChatMessage {
            item_card_id: Some("  ".to_owned()),
            ..ChatMessage::default()
        };

        assert_eq!(card_item_id(&message), None);
    }

    #[test]
    fn test_played_flag_is_read_from_message() {
        let mut message = ChatMessage::default();
        assert!(!already_played(&message));

        message.flags = played_patch();
        assert!(already_played(&message));
    }

    #[test]
    fn test_card_selection_requires_both_halves() {
        assert_eq!(card_selection(&TrackOverride::new("pl", "")), None);
        assert_eq!(card_selection(&TrackOverride::new("", "snd")), None);

        let all = card_selection(&TrackOverride::new("pl", "play-all")).unwrap();
        assert_eq!(all.track, TrackChoice::All);
    }
}

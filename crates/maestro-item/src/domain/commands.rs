//! Commands for the Item Track context.

use maestro_core::command::Command;
use maestro_core::documents::{ChatMessage, Item};
use uuid::Uuid;

/// A chat message that may carry an item card was rendered.
#[derive(Debug, Clone)]
pub struct ItemCardRendered {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The rendered message.
    pub message: ChatMessage,
}

impl Command for ItemCardRendered {
    fn command_type(&self) -> &'static str {
        "item.card_rendered"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// An item was deleted.
#[derive(Debug, Clone)]
pub struct ItemDeleted {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The item as it was before deletion.
    pub item: Item,
}

impl Command for ItemDeleted {
    fn command_type(&self) -> &'static str {
        "item.deleted"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Set or clear an item's track override.
#[derive(Debug, Clone)]
pub struct SetItemTrack {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Owning actor, for owned items.
    pub actor_id: Option<String>,
    /// The item.
    pub item_id: String,
    /// Playlist id; blank clears.
    pub playlist: String,
    /// Track id or mode token; blank clears.
    pub track: String,
}

impl Command for SetItemTrack {
    fn command_type(&self) -> &'static str {
        "item.set_track"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

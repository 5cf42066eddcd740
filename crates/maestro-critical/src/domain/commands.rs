//! Commands for the Critical Roll context.

use maestro_core::command::Command;
use maestro_core::documents::ChatMessage;
use uuid::Uuid;

/// A chat message was rendered.
#[derive(Debug, Clone)]
pub struct ChatMessageRendered {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The rendered message.
    pub message: ChatMessage,
}

impl Command for ChatMessageRendered {
    fn command_type(&self) -> &'static str {
        "critical.chat_message_rendered"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// A chat message is about to be created.
#[derive(Debug, Clone)]
pub struct ChatMessageCreating {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The message data as it will be created.
    pub message: ChatMessage,
}

impl Command for ChatMessageCreating {
    fn command_type(&self) -> &'static str {
        "critical.chat_message_creating"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

//! Commands for the Hype Track context.

use maestro_core::command::Command;
use maestro_core::documents::Combat;
use uuid::Uuid;

/// The acting combatant of an encounter changed.
#[derive(Debug, Clone)]
pub struct TurnChanged {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Encounter snapshot after the change.
    pub combat: Combat,
}

impl Command for TurnChanged {
    fn command_type(&self) -> &'static str {
        "hype.turn_changed"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// An encounter was deleted.
#[derive(Debug, Clone)]
pub struct EncounterEnded {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The deleted encounter.
    pub combat_id: String,
}

impl Command for EncounterEnded {
    fn command_type(&self) -> &'static str {
        "hype.encounter_ended"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to play an actor's hype track on demand.
#[derive(Debug, Clone)]
pub struct PlayHype {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Actor id or name.
    pub actor: String,
}

impl Command for PlayHype {
    fn command_type(&self) -> &'static str {
        "hype.play_hype"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to set an actor's hype override.
#[derive(Debug, Clone)]
pub struct SetHypeTrack {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target actor.
    pub actor_id: String,
    /// Playlist id; blank falls back to the default.
    pub playlist: String,
    /// Sound id or mode token; blank falls back to the default.
    pub track: String,
}

impl Command for SetHypeTrack {
    fn command_type(&self) -> &'static str {
        "hype.set_hype_track"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

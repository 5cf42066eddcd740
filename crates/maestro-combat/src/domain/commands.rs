//! Commands for the Combat Engagement context.

use maestro_core::command::Command;
use maestro_core::documents::Combat;
use uuid::Uuid;

/// An encounter was updated.
#[derive(Debug, Clone)]
pub struct EncounterUpdated {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Round before the update.
    pub previous_round: u32,
    /// Encounter snapshot after the update.
    pub combat: Combat,
}

impl Command for EncounterUpdated {
    fn command_type(&self) -> &'static str {
        "combat.encounter_updated"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// An encounter was deleted.
#[derive(Debug, Clone)]
pub struct EncounterDeleted {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Encounter snapshot at deletion, carrying its override flags.
    pub combat: Combat,
}

impl Command for EncounterDeleted {
    fn command_type(&self) -> &'static str {
        "combat.encounter_deleted"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to set an encounter's combat track override.
#[derive(Debug, Clone)]
pub struct SetCombatTrack {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target encounter.
    pub combat_id: String,
    /// Playlist id; blank falls back to the default.
    pub playlist: String,
    /// Sound id or mode token; blank falls back to the default.
    pub track: String,
}

impl Command for SetCombatTrack {
    fn command_type(&self) -> &'static str {
        "combat.set_combat_track"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to set the default combat selection.
#[derive(Debug, Clone)]
pub struct SetCombatDefaults {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Default playlist id.
    pub playlist: String,
    /// Default sound id or mode token.
    pub track: String,
}

impl Command for SetCombatDefaults {
    fn command_type(&self) -> &'static str {
        "combat.set_combat_defaults"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

//! Aggregate roots for the Combat Engagement context.

use chrono::{DateTime, Utc};
use maestro_core::diagnostics::EngineStatus;
use maestro_core::selection::{ActiveSelection, OwnerId, Selection};
use maestro_playback::domain::aggregates::PausedSoundStack;

/// Returns `true` for the update that moves an encounter from round 0 to
/// round 1.
#[must_use]
pub fn is_combat_start(previous_round: u32, round: u32) -> bool {
    previous_round == 0 && round == 1
}

/// What an encounter start should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPlan {
    /// The same selection is already active and audible.
    Keep,
    /// Start this selection, stopping any different active one first.
    Start(Selection),
}

/// Per-session combat state: the active selection record and the sounds
/// paused when the encounter started.
#[derive(Debug, Default)]
pub struct CombatTrack {
    pub(crate) active: Option<ActiveSelection>,
    pub(crate) paused: PausedSoundStack,
}

impl CombatTrack {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans an encounter start for a resolved selection.
    #[must_use]
    pub fn plan_start(&self, desired: Selection, active_still_playing: bool) -> StartPlan {
        match &self.active {
            Some(active) if active.selection == desired && active_still_playing => StartPlan::Keep,
            _ => StartPlan::Start(desired),
        }
    }

    /// Records a newly started selection.
    pub fn record(&mut self, selection: Selection, owner: OwnerId, now: DateTime<Utc>) {
        self.active = Some(ActiveSelection {
            selection,
            owner,
            started_at: now,
        });
    }

    /// Clears the record, returning what was active.
    pub fn clear(&mut self) -> Option<ActiveSelection> {
        self.active.take()
    }

    /// The active record, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveSelection> {
        self.active.as_ref()
    }

    /// Read-only status.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            active: self.active.clone(),
            paused: self.paused.len(),
        }
    }
}

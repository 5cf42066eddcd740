//! Aggregate roots for the Hype Track context.

use chrono::{DateTime, Utc};
use maestro_core::diagnostics::EngineStatus;
use maestro_core::selection::{ActiveSelection, OwnerId, Selection};
use maestro_playback::domain::aggregates::PausedSoundStack;

/// What a turn change should do to the audible hype track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnPlan {
    /// Nothing resolves for the acting actor: stop and restore ambience.
    Clear,
    /// The desired track is already active and audible.
    Keep,
    /// Stop whatever is active and start this selection.
    Switch(Selection),
}

/// Per-session hype state: the active selection record and the sounds the
/// engine paused to make room for it.
#[derive(Debug, Default)]
pub struct HypeTrack {
    pub(crate) active: Option<ActiveSelection>,
    pub(crate) paused: PausedSoundStack,
    generation: u64,
}

impl HypeTrack {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans a turn change given the resolved selection and whether the
    /// active selection is still audible on the host.
    #[must_use]
    pub fn plan(&self, desired: Option<Selection>, active_still_playing: bool) -> TurnPlan {
        let Some(desired) = desired else {
            return TurnPlan::Clear;
        };
        match &self.active {
            Some(active) if active.selection == desired && active_still_playing => TurnPlan::Keep,
            _ => TurnPlan::Switch(desired),
        }
    }

    /// Records a newly started selection.
    pub fn record(&mut self, selection: Selection, owner: OwnerId, now: DateTime<Utc>) {
        self.generation += 1;
        self.active = Some(ActiveSelection {
            selection,
            owner,
            started_at: now,
        });
    }

    /// Clears the record, returning what was active.
    pub fn clear(&mut self) -> Option<ActiveSelection> {
        self.generation += 1;
        self.active.take()
    }

    /// Bumped on every `record` and `clear`.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The active record, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveSelection> {
        self.active.as_ref()
    }

    /// Returns `true` when the record is exactly `(selection, owner)`.
    #[must_use]
    pub fn is_current(&self, selection: &Selection, owner: &OwnerId) -> bool {
        self.active.as_ref().is_some_and(|a| a.is(selection, owner))
    }

    /// Whether the just-recorded selection should be watched for its end:
    /// a concrete track while ambience is held paused.
    #[must_use]
    pub fn wants_end_watch(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.selection.track.is_concrete())
            && !self.paused.is_empty()
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

//! Critical roll evaluation.
//!
//! Only plain single-die rolls qualify: the first die term must have the
//! configured number of faces and exactly one result, and the roll must not
//! have been evaluated against a target by the game system.

use maestro_core::documents::Roll;
use maestro_core::selection::Selection;
use maestro_core::settings::CriticalSettings;
use serde::Serialize;

const FALLBACK_SUCCESS: i64 = 20;
const FALLBACK_FAILURE: i64 = 1;

/// Which stinger a roll earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalOutcome {
    /// Natural critical success.
    Success(Selection),
    /// Natural critical failure.
    Failure(Selection),
}

impl CriticalOutcome {
    /// The selection to play.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        match self {
            Self::Success(s) | Self::Failure(s) => s,
        }
    }
}

fn is_derived(roll: &Roll) -> bool {
    let marked = roll
        .dice
        .first()
        .and_then(|d| d.results.first())
        .is_some_and(|r| r.success.is_some());
    let margin = |m: Option<i64>| m.is_some_and(|v| v != 0);
    marked || margin(roll.options.margin_success) || margin(roll.options.margin_failure)
}

/// Evaluates a roll against the critical settings. Returns `None` when the
/// roll does not qualify or the matching stinger is not configured.
#[must_use]
pub fn evaluate(roll: &Roll, settings: &CriticalSettings) -> Option<CriticalOutcome> {
    let die = roll.dice.first()?;
    if die.faces != settings.die_faces || die.results.len() != 1 || is_derived(roll) {
        return None;
    }

    let success = settings
        .success_threshold
        .or(roll.options.critical)
        .unwrap_or(FALLBACK_SUCCESS);
    let failure = settings
        .failure_threshold
        .or(roll.options.fumble)
        .unwrap_or(FALLBACK_FAILURE);
    let total = die.total.unwrap_or(roll.total);

    // A zero threshold disables that side.
    if success != 0 && total >= success {
        if let Some(selection) =
            Selection::from_parts(&settings.success_playlist, &settings.success_sound)
        {
            return Some(CriticalOutcome::Success(selection));
        }
    }
    if failure != 0 && total <= failure {
        if let Some(selection) =
            Selection::from_parts(&settings.failure_playlist, &settings.failure_sound)
        {
            return Some(CriticalOutcome::Failure(selection));
        }
    }
    None
}

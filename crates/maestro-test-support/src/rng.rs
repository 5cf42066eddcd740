//! Test RNG — scripted `random-track` picks.

use std::collections::VecDeque;

use maestro_core::rng::DeterministicRng;

/// Always picks the lowest index, so `random-track` lands on a playlist's
/// first sound.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// Replays a scripted list of picks, clamped into the requested range.
///
/// # Panics
///
/// Panics when asked for more picks than were scripted, so a test that
/// triggers an unexpected random pick fails loudly.
#[derive(Debug)]
pub struct SequenceRng {
    picks: VecDeque<u32>,
}

impl SequenceRng {
    /// Scripts the picks in the order they will be returned.
    #[must_use]
    pub fn new(picks: Vec<u32>) -> Self {
        Self {
            picks: picks.into(),
        }
    }

    /// Picks not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let pick = self
            .picks
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted pick left for range {min}..={max}"));
        pick.clamp(min, max)
    }
}

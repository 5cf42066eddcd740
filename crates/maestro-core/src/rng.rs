//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or scripted
//! implementation is injected so `random-track` picks are repeatable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform picks behind `random-track` selections.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by an OS-seeded `StdRng`.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Creates a new RNG seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Creates a new RNG from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SystemRng {
    fn default() -> Self {
        Self::new()
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}

/// Picks a uniformly distributed index into a collection of `len` elements.
///
/// Returns `None` for an empty collection.
pub fn pick_index(rng: &mut dyn DeterministicRng, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let max = u32::try_from(len - 1).unwrap_or(u32::MAX);
    let picked = rng.next_u32_range(0, max) as usize;
    Some(picked.min(len - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_index_on_empty_collection_returns_none() {
        let mut rng = SystemRng::seeded(7);
        assert_eq!(pick_index(&mut rng, 0), None);
    }

    #[test]
    fn test_pick_index_stays_in_bounds() {
        let mut rng = SystemRng::seeded(42);
        for _ in 0..200 {
            let idx = pick_index(&mut rng, 3).unwrap();
            assert!(idx < 3);
        }
    }

    #[test]
    fn test_seeded_rng_is_repeatable() {
        let mut a = SystemRng::seeded(99);
        let mut b = SystemRng::seeded(99);
        let left: Vec<u32> = (0..5).map(|_| a.next_u32_range(1, 20)).collect();
        let right: Vec<u32> = (0..5).map(|_| b.next_u32_range(1, 20)).collect();
        assert_eq!(left, right);
    }
}

//! Maestro — Critical Roll bounded context.
//!
//! Responsible for playing a short stinger when a chat roll lands a critical
//! success or failure, and for muting the host's default dice sound.

pub mod application;
pub mod domain;

/// Name of the playlist provisioned for critical success stingers.
pub const SUCCESS_PLAYLIST_NAME: &str = "Critical Success Tracks";

/// Name of the playlist provisioned for critical failure stingers.
pub const FAILURE_PLAYLIST_NAME: &str = "Critical Failure Tracks";

/// The host's default dice-roll sound.
pub const DEFAULT_DICE_SOUND: &str = "sounds/dice.wav";

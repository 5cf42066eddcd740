//! Maestro — Hype Track bounded context.
//!
//! Responsible for playing the acting combatant's signature track at the
//! start of each turn, pausing ambience around it, and restoring ambience
//! when the track ends or the encounter is over.

pub mod application;
pub mod domain;

/// Name of the playlist provisioned for hype tracks.
pub const HYPE_PLAYLIST_NAME: &str = "Hype Tracks";

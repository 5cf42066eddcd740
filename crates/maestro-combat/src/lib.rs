//! Maestro — Combat Engagement bounded context.
//!
//! Responsible for starting an encounter-wide track when combat begins and
//! stopping it, with ambience restored, when the encounter is deleted.

pub mod application;
pub mod domain;

/// Name of the playlist provisioned for combat tracks.
pub const COMBAT_PLAYLIST_NAME: &str = "Combat Tracks";

//! Maestro — Playback bounded context.
//!
//! Responsible for realizing selections on the host, pausing and resuming
//! ambient sounds, looking sounds up across playlists, and the per-playlist
//! loop guard.

pub mod application;
pub mod domain;

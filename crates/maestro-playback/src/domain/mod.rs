//! Domain layer for the Playback context.

pub mod aggregates;
pub mod commands;
pub mod loop_guard;

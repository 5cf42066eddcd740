//! Application layer for the Playback context.

pub mod command_handlers;
pub mod query_handlers;

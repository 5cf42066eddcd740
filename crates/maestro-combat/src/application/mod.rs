//! Application layer for the Combat Engagement context.

pub mod command_handlers;
pub mod query_handlers;

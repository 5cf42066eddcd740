//! Application layer for the Hype Track context.

pub mod command_handlers;
pub mod query_handlers;

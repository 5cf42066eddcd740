//! Application layer for the Item Track context.

pub mod command_handlers;
pub mod query_handlers;

//! Application layer for the Critical Roll context.

pub mod command_handlers;

//! Domain layer for the Critical Roll context.

pub mod commands;
pub mod outcome;

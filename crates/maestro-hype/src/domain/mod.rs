//! Domain layer for the Hype Track context.

pub mod aggregates;
pub mod commands;

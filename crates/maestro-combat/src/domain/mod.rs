//! Domain layer for the Combat Engagement context.

pub mod aggregates;
pub mod commands;

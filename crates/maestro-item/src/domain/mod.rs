//! Domain layer for the Item Track context.

pub mod card;
pub mod commands;

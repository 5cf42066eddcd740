//! Maestro Core — shared playback-arbitration abstractions.
//!
//! This crate defines the value types, the host capability trait and the
//! determinism seams (clock, RNG) that every engine depends on. It contains
//! no infrastructure code.

pub mod authority;
pub mod clock;
pub mod command;
pub mod diagnostics;
pub mod documents;
pub mod error;
pub mod host;
pub mod resolver;
pub mod rng;
pub mod selection;
pub mod settings;

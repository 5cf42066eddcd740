//! Route modules organized by concern.

pub mod health;
pub mod hooks;
pub mod playback;
pub mod status;
pub mod tracks;

//! Maestro — Item Track bounded context.
//!
//! Responsible for playing an item's track once when its chat card is
//! rendered, including for owned items that were deleted after the card was
//! posted.

pub mod application;
pub mod domain;

/// Name of the playlist provisioned for item tracks.
pub const ITEM_PLAYLIST_NAME: &str = "Item Tracks";

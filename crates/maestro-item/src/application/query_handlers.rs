//! Query handlers for the Item Track context.

use std::collections::BTreeMap;

use maestro_core::error::DomainError;
use maestro_core::host::Host;
use maestro_core::resolver::{TrackOverride, parse_override};
use maestro_core::settings::MaestroSettings;
use serde::Serialize;

/// Read-only view of an item's track override.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTrackView {
    /// The item identifier.
    pub item_id: String,
    /// The item's display name.
    pub name: String,
    /// Owning actor, for owned items.
    pub actor_id: Option<String>,
    /// Override playlist, if set.
    pub playlist: Option<String>,
    /// Override track or mode token, if set.
    pub track: Option<String>,
}

/// Retrieves an item's track override.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the item does not exist.
pub async fn get_item_track(
    host: &dyn Host,
    actor_id: Option<&str>,
    item_id: &str,
) -> Result<ItemTrackView, DomainError> {
    let item = host
        .item(actor_id, item_id)
        .await?
        .ok_or_else(|| DomainError::not_found("item", item_id))?;
    let value = parse_override(&item.flags).unwrap_or_default();
    Ok(ItemTrackView {
        item_id: item.id,
        name: item.name,
        actor_id: item.actor_id,
        playlist: value.playlist,
        track: value.track,
    })
}

/// Lists the overrides remembered for deleted owned items.
///
/// # Errors
///
/// Returns `DomainError` if the settings cannot be read.
pub async fn list_deleted_items(
    host: &dyn Host,
) -> Result<BTreeMap<String, TrackOverride>, DomainError> {
    let settings = MaestroSettings::from_value(&host.settings().await?);
    Ok(settings.item.deleted_items)
}

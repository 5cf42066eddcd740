//! Command handlers for the Item Track context.

use std::sync::Arc;

use maestro_core::authority::Authority;
use maestro_core::documents::{ChatMessage, Playlist};
use maestro_core::error::DomainError;
use maestro_core::host::DocumentRef;
use maestro_core::resolver::{TrackOverride, parse_override};
use maestro_core::selection::Selection;
use maestro_core::settings::ItemSettings;
use maestro_playback::application::command_handlers::PlaybackDriver;
use tracing::{debug, info};

use crate::ITEM_PLAYLIST_NAME;
use crate::domain::card::{CardSource, already_played, card_item_id, card_selection, played_patch};
use crate::domain::commands::{ItemCardRendered, ItemDeleted, SetItemTrack};

/// Plays item tracks for chat cards and remembers overrides of deleted items.
pub struct ItemTrackPlayer {
    driver: PlaybackDriver,
    authority: Arc<dyn Authority>,
}

impl ItemTrackPlayer {
    /// Creates a player.
    #[must_use]
    pub fn new(driver: PlaybackDriver, authority: Arc<dyn Authority>) -> Self {
        Self { driver, authority }
    }

    /// Plays the track of the item on a rendered chat card, once per message.
    /// Returns the selection that was played.
    pub async fn handle_card_rendered(&self, command: &ItemCardRendered) -> Option<Selection> {
        let settings = self.driver.settings().await?;
        if !settings.item.enabled || !self.authority.is_authoritative().await {
            return None;
        }
        let message = &command.message;
        let item_id = card_item_id(message)?;
        if already_played(message) {
            debug!(message_id = %message.id, "item track already played for card");
            return None;
        }

        let found = self.lookup(message, item_id, &settings.item).await;
        let (source, value) = self.driver.errors().absorb("look up card item", found)??;
        let selection = card_selection(&value)?;

        let played = self.driver.play_selection(&selection).await;
        self.driver.errors().absorb("play item track", played)?;
        let marked = self
            .driver
            .host()
            .set_flags(&DocumentRef::ChatMessage(message.id.clone()), &played_patch())
            .await;
        self.driver.errors().absorb("mark item card played", marked);

        info!(
            correlation_id = %command.correlation_id,
            item_id,
            source = ?source,
            selection = %selection,
            "item track played"
        );
        Some(selection)
    }

    async fn lookup(
        &self,
        message: &ChatMessage,
        item_id: &str,
        settings: &ItemSettings,
    ) -> Result<Option<(CardSource, TrackOverride)>, DomainError> {
        let host = self.driver.host();
        if let Some(actor_id) = message.speaker.actor.as_deref().filter(|a| !a.is_empty()) {
            if let Some(item) = host.item(Some(actor_id), item_id).await? {
                return Ok(parse_override(&item.flags).map(|v| (CardSource::Owned, v)));
            }
        }
        if let Some(item) = host.item(None, item_id).await? {
            return Ok(parse_override(&item.flags).map(|v| (CardSource::World, v)));
        }
        Ok(settings
            .deleted_items
            .get(item_id)
            .cloned()
            .map(|v| (CardSource::Deleted, v)))
    }

    /// Remembers the override of a deleted owned item so cards posted earlier
    /// keep playing. Returns `true` when the store changed.
    pub async fn handle_item_deleted(&self, command: &ItemDeleted) -> bool {
        let Some(mut settings) = self.driver.settings().await else {
            return false;
        };
        if !settings.item.enabled || !self.authority.is_authoritative().await {
            return false;
        }
        let item = &command.item;
        if !item.is_owned() {
            return false;
        }
        let Some(value) = parse_override(&item.flags).filter(|v| !v.is_empty()) else {
            return false;
        };
        if settings.item.deleted_items.contains_key(&item.id) {
            return false;
        }

        settings.item.deleted_items.insert(item.id.clone(), value);
        let stored = self.driver.store_settings(&settings).await;
        let changed = self.driver.errors().absorb("store deleted item", stored).is_some();
        if changed {
            info!(correlation_id = %command.correlation_id, item_id = %item.id, "deleted item override remembered");
        }
        changed
    }

    /// Sets or clears an item's track override.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the item does not exist, or an
    /// infrastructure error if the host call fails.
    pub async fn set_item_track(&self, command: &SetItemTrack) -> Result<TrackOverride, DomainError> {
        let host = self.driver.host();
        if host
            .item(command.actor_id.as_deref(), &command.item_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("item", command.item_id.clone()));
        }
        let value = TrackOverride::new(&command.playlist, &command.track);
        host.set_flags(&DocumentRef::Item(command.item_id.clone()), &value.to_flags())
            .await?;
        info!(item_id = %command.item_id, "item override updated");
        Ok(value)
    }

    /// Ensures the item playlist exists when configured to be created.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn provision(&self) -> Result<Option<Playlist>, DomainError> {
        if !self.authority.is_authoritative().await {
            return Ok(None);
        }
        let Some(settings) = self.driver.settings().await else {
            return Ok(None);
        };
        if !settings.item.enabled || !settings.item.create_playlist {
            return Ok(None);
        }
        self.driver.ensure_playlist(ITEM_PLAYLIST_NAME).await.map(Some)
    }
}

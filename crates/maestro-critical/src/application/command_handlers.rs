//! Command handlers for the Critical Roll context.
//!
//! Stingers play over whatever is audible; nothing here pauses or resumes
//! other sounds.

use std::sync::Arc;

use maestro_core::authority::Authority;
use maestro_core::documents::Playlist;
use maestro_core::error::DomainError;
use maestro_playback::application::command_handlers::PlaybackDriver;
use tracing::{debug, info};

use crate::domain::commands::{ChatMessageCreating, ChatMessageRendered};
use crate::domain::outcome::{CriticalOutcome, evaluate};
use crate::{DEFAULT_DICE_SOUND, FAILURE_PLAYLIST_NAME, SUCCESS_PLAYLIST_NAME};

/// Plays critical stingers for chat rolls.
pub struct CriticalTrigger {
    driver: PlaybackDriver,
    authority: Arc<dyn Authority>,
}

impl CriticalTrigger {
    /// Creates a trigger.
    #[must_use]
    pub fn new(driver: PlaybackDriver, authority: Arc<dyn Authority>) -> Self {
        Self { driver, authority }
    }

    /// Evaluates every roll of a rendered chat message and plays the earned
    /// stingers. Returns the outcomes that were played.
    pub async fn handle_chat_message(&self, command: &ChatMessageRendered) -> Vec<CriticalOutcome> {
        let Some(settings) = self.driver.settings().await else {
            return Vec::new();
        };
        if !settings.critical.enabled {
            return Vec::new();
        }
        if !self.authority.is_authoritative().await {
            return Vec::new();
        }
        let message = &command.message;
        if !message.is_roll || !message.content_visible {
            debug!(message_id = %message.id, "chat message carries no visible roll");
            return Vec::new();
        }

        let mut played = Vec::new();
        for roll in &message.rolls {
            let Some(outcome) = evaluate(roll, &settings.critical) else {
                continue;
            };
            let result = self.driver.play_selection(outcome.selection()).await;
            if self.driver.errors().absorb("play critical stinger", result).is_some() {
                info!(
                    correlation_id = %command.correlation_id,
                    message_id = %message.id,
                    outcome = ?outcome,
                    "critical stinger played"
                );
                played.push(outcome);
            }
        }
        played
    }

    /// Returns `true` when the message's default dice sound should be
    /// removed before the message is created.
    pub async fn handle_chat_message_creating(&self, command: &ChatMessageCreating) -> bool {
        let Some(settings) = self.driver.settings().await else {
            return false;
        };
        settings.disable_dice_sound
            && command.message.sound.as_deref() == Some(DEFAULT_DICE_SOUND)
    }

    /// Ensures the critical playlists exist when configured to be created,
    /// and writes a created playlist back into the settings when none is set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if a host call fails.
    pub async fn provision(&self) -> Result<Vec<Playlist>, DomainError> {
        if !self.authority.is_authoritative().await {
            return Ok(Vec::new());
        }
        let Some(mut settings) = self.driver.settings().await else {
            return Ok(Vec::new());
        };
        if !settings.critical.enabled {
            return Ok(Vec::new());
        }

        let mut provisioned = Vec::new();
        let mut changed = false;
        if settings.critical.create_success_playlist {
            let playlist = self.driver.ensure_playlist(SUCCESS_PLAYLIST_NAME).await?;
            if settings.critical.success_playlist.is_empty() {
                settings.critical.success_playlist.clone_from(&playlist.id);
                changed = true;
            }
            provisioned.push(playlist);
        }
        if settings.critical.create_failure_playlist {
            let playlist = self.driver.ensure_playlist(FAILURE_PLAYLIST_NAME).await?;
            if settings.critical.failure_playlist.is_empty() {
                settings.critical.failure_playlist.clone_from(&playlist.id);
                changed = true;
            }
            provisioned.push(playlist);
        }
        if changed {
            self.driver.store_settings(&settings).await?;
        }
        Ok(provisioned)
    }
}

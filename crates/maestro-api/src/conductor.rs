//! Conductor — subscribes the engines to host events.
//!
//! Hype and combat engagement hold disjoint state and run concurrently on a
//! shared encounter event. Each engine serializes its own transitions.

use std::sync::Arc;

use maestro_combat::application::command_handlers::CombatEngine;
use maestro_combat::domain::commands::{EncounterDeleted, EncounterUpdated};
use maestro_core::authority::Authority;
use maestro_core::diagnostics::EngineStatus;
use maestro_core::documents::{ChatMessage, Combat, Playlist};
use maestro_core::host::{SoundEndRegistry, SoundKey};
use maestro_core::selection::Selection;
use maestro_critical::application::command_handlers::CriticalTrigger;
use maestro_critical::domain::commands::{ChatMessageCreating, ChatMessageRendered};
use maestro_critical::domain::outcome::CriticalOutcome;
use maestro_hype::application::command_handlers::HypeEngine;
use maestro_hype::domain::commands::{EncounterEnded, TurnChanged};
use maestro_item::application::command_handlers::ItemTrackPlayer;
use maestro_item::domain::commands::{ItemCardRendered, ItemDeleted};
use maestro_playback::application::command_handlers::PlaybackDriver;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// What an encounter update set in motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterOutcome {
    /// A hype track started and its end is being watched.
    pub hype_watching: bool,
    /// Encounter music started.
    pub combat_started: bool,
}

/// What a rendered chat message set in motion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutcome {
    /// Critical stingers played.
    pub criticals: Vec<CriticalOutcome>,
    /// Item track played, if any.
    pub item_track: Option<Selection>,
}

/// Playlists ensured when the session became ready.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionReport {
    /// Hype playlist.
    pub hype: Option<Playlist>,
    /// Combat playlist.
    pub combat: Option<Playlist>,
    /// Item playlist.
    pub item: Option<Playlist>,
    /// Critical success and failure playlists.
    pub critical: Vec<Playlist>,
}

/// Diagnostics snapshot of the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Hype engine record and stack.
    pub hype: EngineStatus,
    /// Combat engine record and stack.
    pub combat: EngineStatus,
    /// Host failures absorbed so far.
    pub errors: u64,
}

/// Owns every engine of one session.
pub struct Conductor {
    driver: PlaybackDriver,
    sound_end: Arc<SoundEndRegistry>,
    hype: Arc<HypeEngine>,
    combat: CombatEngine,
    critical: CriticalTrigger,
    item: ItemTrackPlayer,
}

impl Conductor {
    /// Wires the engines over a shared driver and authority rule.
    #[must_use]
    pub fn new(
        driver: PlaybackDriver,
        authority: &Arc<dyn Authority>,
        sound_end: Arc<SoundEndRegistry>,
    ) -> Self {
        Self {
            hype: Arc::new(HypeEngine::new(driver.clone(), Arc::clone(authority))),
            combat: CombatEngine::new(driver.clone(), Arc::clone(authority)),
            critical: CriticalTrigger::new(driver.clone(), Arc::clone(authority)),
            item: ItemTrackPlayer::new(driver.clone(), Arc::clone(authority)),
            driver,
            sound_end,
        }
    }

    /// The shared playback driver.
    #[must_use]
    pub fn driver(&self) -> &PlaybackDriver {
        &self.driver
    }

    /// The hype engine.
    #[must_use]
    pub fn hype(&self) -> &HypeEngine {
        &self.hype
    }

    /// The combat engine.
    #[must_use]
    pub fn combat(&self) -> &CombatEngine {
        &self.combat
    }

    /// The critical trigger.
    #[must_use]
    pub fn critical(&self) -> &CriticalTrigger {
        &self.critical
    }

    /// The item track player.
    #[must_use]
    pub fn item(&self) -> &ItemTrackPlayer {
        &self.item
    }

    /// Handles an encounter update. The hype engine only sees updates that
    /// changed the acting combatant.
    pub async fn on_encounter_updated(
        &self,
        correlation_id: Uuid,
        previous_round: u32,
        turn_changed: bool,
        combat: Combat,
    ) -> EncounterOutcome {
        let turn = TurnChanged {
            correlation_id,
            combat: combat.clone(),
        };
        let update = EncounterUpdated {
            correlation_id,
            previous_round,
            combat,
        };
        let hype = async {
            if turn_changed {
                self.hype.handle_turn_changed(&turn).await
            } else {
                None
            }
        };
        let (watch, combat_started) =
            tokio::join!(hype, self.combat.handle_encounter_updated(&update));

        let hype_watching = watch.is_some();
        if let Some(watch) = watch {
            let hype = Arc::clone(&self.hype);
            tokio::spawn(async move {
                hype.await_track_end(watch).await;
            });
        }
        EncounterOutcome {
            hype_watching,
            combat_started,
        }
    }

    /// Handles an encounter deletion in both engines.
    pub async fn on_encounter_deleted(&self, correlation_id: Uuid, combat: Combat) {
        let ended = EncounterEnded {
            correlation_id,
            combat_id: combat.id.clone(),
        };
        let deleted = EncounterDeleted {
            correlation_id,
            combat,
        };
        tokio::join!(
            self.hype.handle_encounter_ended(&ended),
            self.combat.handle_encounter_deleted(&deleted)
        );
    }

    /// Handles a rendered chat message: critical stingers and item cards.
    pub async fn on_chat_message(&self, correlation_id: Uuid, message: ChatMessage) -> ChatOutcome {
        let rendered = ChatMessageRendered {
            correlation_id,
            message: message.clone(),
        };
        let card = ItemCardRendered {
            correlation_id,
            message,
        };
        let (criticals, item_track) = tokio::join!(
            self.critical.handle_chat_message(&rendered),
            self.item.handle_card_rendered(&card)
        );
        ChatOutcome {
            criticals,
            item_track,
        }
    }

    /// Returns `true` when a message about to be created should lose its
    /// default dice sound.
    pub async fn on_chat_message_creating(&self, correlation_id: Uuid, message: ChatMessage) -> bool {
        self.critical
            .handle_chat_message_creating(&ChatMessageCreating {
                correlation_id,
                message,
            })
            .await
    }

    /// Handles an item deletion.
    pub async fn on_item_deleted(&self, command: &ItemDeleted) -> bool {
        self.item.handle_item_deleted(command).await
    }

    /// Delivers a host "sound ended" event. Returns how many watches woke.
    #[must_use]
    pub fn on_sound_ended(&self, key: &SoundKey) -> usize {
        let woken = self.sound_end.notify(key);
        debug!(sound = %key, woken, "sound ended");
        woken
    }

    /// Ensures every configured playlist exists. Failures are absorbed.
    pub async fn on_ready(&self) -> ProvisionReport {
        let errors = self.driver.errors();
        let report = ProvisionReport {
            hype: errors
                .absorb("provision hype playlist", self.hype.provision().await)
                .flatten(),
            combat: errors
                .absorb("provision combat playlist", self.combat.provision().await)
                .flatten(),
            item: errors
                .absorb("provision item playlist", self.item.provision().await)
                .flatten(),
            critical: errors
                .absorb("provision critical playlists", self.critical.provision().await)
                .unwrap_or_default(),
        };
        info!("session ready");
        report
    }

    /// Resumes everything both engines still hold paused.
    pub async fn teardown(&self) -> usize {
        let (hype, combat) = tokio::join!(self.hype.teardown(), self.combat.teardown());
        info!(resumed = hype + combat, "session torn down");
        hype + combat
    }

    /// Current diagnostics.
    pub async fn status(&self) -> SessionStatus {
        let (hype, combat) = tokio::join!(self.hype.status(), self.combat.status());
        SessionStatus {
            hype,
            combat,
            errors: self.driver.errors().count(),
        }
    }
}

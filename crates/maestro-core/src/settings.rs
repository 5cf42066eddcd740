//! Host-persisted arbitration settings.
//!
//! The host stores settings as an untyped JSON document. Engines read it
//! fresh on every trigger and deserialize it into [`MaestroSettings`]; every
//! field has a default so partial or missing documents are fine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::resolver::TrackOverride;

/// The complete settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaestroSettings {
    /// Hype track (per-actor turn music) settings.
    pub hype: HypeSettings,
    /// Combat track (per-encounter music) settings.
    pub combat: CombatSettings,
    /// Item track (chat item card) settings.
    pub item: ItemSettings,
    /// Critical success/failure sting settings.
    pub critical: CriticalSettings,
    /// Strip the host's default dice sound from new chat messages.
    pub disable_dice_sound: bool,
}

impl MaestroSettings {
    /// Deserializes a settings document, degrading to defaults on malformed
    /// input.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "malformed settings document, using defaults");
            Self::default()
        })
    }

    /// Serializes the settings for storage on the host.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Hype track settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HypeSettings {
    /// Whether turn-change music is active.
    pub enabled: bool,
    /// Pause other playing sounds while a hype track plays.
    pub pause_others: bool,
    /// Default playlist when an actor has no override.
    pub default_playlist: String,
    /// Default track when an actor has no override.
    pub default_track: String,
}

impl HypeSettings {
    /// The configured default selection fields.
    #[must_use]
    pub fn defaults(&self) -> TrackOverride {
        TrackOverride::new(&self.default_playlist, &self.default_track)
    }
}

/// Combat track settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CombatSettings {
    /// Whether encounter music is active.
    pub enabled: bool,
    /// Create the "Combat Tracks" playlist on ready.
    pub create_playlist: bool,
    /// Pause other playing sounds while encounter music plays.
    pub pause_others: bool,
    /// Default playlist when an encounter has no override.
    pub default_playlist: String,
    /// Default track when an encounter has no override.
    pub default_track: String,
}

impl CombatSettings {
    /// The configured default selection fields.
    #[must_use]
    pub fn defaults(&self) -> TrackOverride {
        TrackOverride::new(&self.default_playlist, &self.default_track)
    }
}

/// Item track settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemSettings {
    /// Whether item cards trigger music.
    pub enabled: bool,
    /// Create the "Item Tracks" playlist on ready.
    pub create_playlist: bool,
    /// Chat card attribute carrying the item id.
    pub item_id_attribute: String,
    /// Overrides of owned items that have since been deleted, keyed by item id.
    pub deleted_items: BTreeMap<String, TrackOverride>,
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            create_playlist: false,
            item_id_attribute: "data-item-id".to_owned(),
            deleted_items: BTreeMap::new(),
        }
    }
}

/// Critical success/failure settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CriticalSettings {
    /// Whether roll outcomes trigger stings.
    pub enabled: bool,
    /// Create the "Critical Success Tracks" playlist on ready.
    pub create_success_playlist: bool,
    /// Create the "Critical Failure Tracks" playlist on ready.
    pub create_failure_playlist: bool,
    /// Face count of the die that qualifies (20 for a d20).
    pub die_faces: u32,
    /// Explicit success threshold; `None` defers to the roll's own metadata.
    pub success_threshold: Option<i64>,
    /// Explicit failure threshold; `None` defers to the roll's own metadata.
    pub failure_threshold: Option<i64>,
    /// Playlist played on a critical success.
    pub success_playlist: String,
    /// Track played on a critical success.
    pub success_sound: String,
    /// Playlist played on a critical failure.
    pub failure_playlist: String,
    /// Track played on a critical failure.
    pub failure_sound: String,
}

impl Default for CriticalSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            create_success_playlist: false,
            create_failure_playlist: false,
            die_faces: 20,
            success_threshold: Some(20),
            failure_threshold: Some(1),
            success_playlist: String::new(),
            success_sound: String::new(),
            failure_playlist: String::new(),
            failure_sound: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_document_yields_defaults() {
        let settings = MaestroSettings::from_value(&Value::Null);
        assert_eq!(settings, MaestroSettings::default());
        assert_eq!(settings.critical.die_faces, 20);
        assert_eq!(settings.item.item_id_attribute, "data-item-id");
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let settings = MaestroSettings::from_value(&serde_json::json!({
            "hype": { "enabled": true, "pauseOthers": true }
        }));
        assert!(settings.hype.enabled);
        assert!(settings.hype.pause_others);
        assert!(!settings.combat.enabled);
        assert_eq!(settings.critical.success_threshold, Some(20));
    }

    #[test]
    fn test_explicit_null_threshold_defers_to_roll() {
        let settings = MaestroSettings::from_value(&serde_json::json!({
            "critical": { "successThreshold": null }
        }));
        assert_eq!(settings.critical.success_threshold, None);
        assert_eq!(settings.critical.failure_threshold, Some(1));
    }

    #[test]
    fn test_malformed_document_degrades_to_defaults() {
        let settings = MaestroSettings::from_value(&serde_json::json!({ "hype": "yes" }));
        assert_eq!(settings, MaestroSettings::default());
    }

    #[test]
    fn test_defaults_drop_blank_fields() {
        let hype = HypeSettings {
            default_playlist: "pl".to_owned(),
            ..HypeSettings::default()
        };
        let defaults = hype.defaults();
        assert_eq!(defaults.playlist.as_deref(), Some("pl"));
        assert_eq!(defaults.track, None);
    }
}

//! Query handlers for the Combat Engagement context.

use maestro_core::error::DomainError;
use maestro_core::host::Host;
use maestro_core::resolver::resolve;
use maestro_core::selection::Selection;
use maestro_core::settings::MaestroSettings;
use serde::Serialize;

/// Read-only view of the default combat selection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatDefaultsView {
    /// Whether combat tracks are enabled.
    pub enabled: bool,
    /// Default playlist, if configured.
    pub playlist: Option<String>,
    /// Default track or mode token, if configured.
    pub track: Option<String>,
    /// The selection an encounter without an override resolves to.
    pub resolved: Option<Selection>,
}

/// Retrieves the configured combat defaults.
///
/// # Errors
///
/// Returns `DomainError` if the settings cannot be read.
pub async fn get_combat_defaults(host: &dyn Host) -> Result<CombatDefaultsView, DomainError> {
    let settings = MaestroSettings::from_value(&host.settings().await?);
    let defaults = settings.combat.defaults();
    let resolved = resolve(None, &defaults);
    Ok(CombatDefaultsView {
        enabled: settings.combat.enabled,
        playlist: defaults.playlist,
        track: defaults.track,
        resolved,
    })
}

#[cfg(test)]
mod tests {
    use maestro_core::selection::Selection;
    use maestro_test_support::{FailingHost, InMemoryHost};
    use serde_json::json;

    use super::get_combat_defaults;

    #[tokio::test]
    async fn test_get_combat_defaults_resolves_configured_pair() {
        let host = InMemoryHost::default().with_settings(json!({
            "combat": { "enabled": true, "defaultPlaylist": "battle", "defaultTrack": "drums" }
        }));

        let view = get_combat_defaults(&host).await.unwrap();

        assert!(view.enabled);
        assert_eq!(view.resolved, Some(Selection::sound("battle", "drums")));
    }

    #[tokio::test]
    async fn test_get_combat_defaults_with_half_configuration_resolves_nothing() {
        let host = InMemoryHost::default()
            .with_settings(json!({ "combat": { "defaultPlaylist": "battle" } }));

        let view = get_combat_defaults(&host).await.unwrap();

        assert_eq!(view.playlist.as_deref(), Some("battle"));
        assert_eq!(view.resolved, None);
    }

    #[tokio::test]
    async fn test_get_combat_defaults_propagates_host_failure() {
        let result = get_combat_defaults(&FailingHost::default()).await;

        assert!(result.is_err());
    }
}

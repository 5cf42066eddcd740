//! Query handlers for the Hype Track context.

use maestro_core::error::DomainError;
use maestro_core::host::Host;
use maestro_core::resolver::parse_override;
use serde::Serialize;

/// Read-only view of an actor's hype override.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorHypeView {
    /// The actor identifier.
    pub actor_id: String,
    /// The actor's display name.
    pub name: String,
    /// Overridden playlist, if set.
    pub playlist: Option<String>,
    /// Overridden track or mode token, if set.
    pub track: Option<String>,
}

/// Retrieves an actor's hype override.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the actor does not exist, or any host
/// failure.
pub async fn get_actor_hype(host: &dyn Host, actor_id: &str) -> Result<ActorHypeView, DomainError> {
    let actor = host
        .actor(actor_id)
        .await?
        .ok_or_else(|| DomainError::not_found("actor", actor_id))?;
    let flags = parse_override(&actor.flags).unwrap_or_default();
    Ok(ActorHypeView {
        actor_id: actor.id,
        name: actor.name,
        playlist: flags.playlist,
        track: flags.track,
    })
}

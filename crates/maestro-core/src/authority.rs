//! Which session is allowed to arbitrate playback.
//!
//! Exactly one connected session should drive transitions: the one running
//! as the active game master with the lowest-sorting user id. Other sessions
//! observe passively. Two sessions can briefly both consider themselves
//! authoritative while user presence propagates (reconnects, ties on
//! stale presence data); double execution in that window is an accepted
//! risk, mitigated only by the engines' own idempotence.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::documents::User;
use crate::host::Host;

/// Predicate deciding whether this session may run arbitration transitions.
#[async_trait]
pub trait Authority: Send + Sync {
    /// Returns `true` if this session is the authoritative controller.
    async fn is_authoritative(&self) -> bool;
}

/// Returns the active game master with the lowest-sorting id.
#[must_use]
pub fn first_active_gm(users: &[User]) -> Option<&User> {
    users
        .iter()
        .filter(|u| u.is_gm && u.active)
        .min_by(|a, b| a.id.cmp(&b.id))
}

/// Authority rule: this session is authoritative iff it runs as the first
/// active game master.
pub struct FirstActiveGm {
    host: Arc<dyn Host>,
}

impl FirstActiveGm {
    /// Creates the rule over the given host.
    #[must_use]
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl Authority for FirstActiveGm {
    async fn is_authoritative(&self) -> bool {
        match self.host.users().await {
            Ok(users) => first_active_gm(&users)
                .is_some_and(|gm| gm.id == self.host.current_user_id()),
            Err(e) => {
                warn!(error = %e, "could not list users, assuming not authoritative");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, is_gm: bool, active: bool) -> User {
        User {
            id: id.to_owned(),
            is_gm,
            active,
        }
    }

    #[test]
    fn test_first_active_gm_picks_lowest_id() {
        let users = vec![
            user("zeta", true, true),
            user("alpha", true, true),
            user("aaa-player", false, true),
        ];
        assert_eq!(first_active_gm(&users).unwrap().id, "alpha");
    }

    #[test]
    fn test_first_active_gm_ignores_inactive_gms() {
        let users = vec![user("alpha", true, false), user("beta", true, true)];
        assert_eq!(first_active_gm(&users).unwrap().id, "beta");
    }

    #[test]
    fn test_first_active_gm_none_without_gms() {
        let users = vec![user("alpha", false, true)];
        assert!(first_active_gm(&users).is_none());
    }
}

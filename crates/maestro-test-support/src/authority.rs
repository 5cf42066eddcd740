//! Test authority — a fixed answer to "may this session arbitrate?".

use async_trait::async_trait;
use maestro_core::authority::Authority;

/// An authority predicate with a constant answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAuthority(pub bool);

#[async_trait]
impl Authority for FixedAuthority {
    async fn is_authoritative(&self) -> bool {
        self.0
    }
}

//! Shared test mocks and utilities for the Maestro conductor.

mod authority;
mod clock;
mod host;
mod rng;

pub use authority::FixedAuthority;
pub use clock::{FixedClock, fixed_clock};
pub use host::{FailingHost, HostCall, InMemoryHost, playlist, sound};
pub use rng::{MockRng, SequenceRng};

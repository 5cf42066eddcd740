//! Wall-clock source for timestamps on paused sounds and active selections.

use chrono::{DateTime, Utc};

/// Supplies "now" to the engines so recorded timestamps are reproducible in
/// tests.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

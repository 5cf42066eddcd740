//! Per-session error accounting.
//!
//! Host mutation failures never abort an event-handling cycle. They are
//! logged, counted here, and the transition carries on with its remaining
//! steps.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::warn;

use crate::error::DomainError;
use crate::selection::ActiveSelection;

/// Point-in-time view of one arbitration engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    /// The engine's active selection record, if any.
    pub active: Option<ActiveSelection>,
    /// Number of sounds the engine holds paused.
    pub paused: usize,
}

/// Non-fatal error counter for one session.
#[derive(Debug, Default)]
pub struct SessionErrors {
    count: AtomicU64,
}

impl SessionErrors {
    /// Creates a zeroed counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one failure.
    pub fn record(&self, context: &str, error: &DomainError) {
        let total = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(context, error = %error, total, "host call failed");
    }

    /// Unwraps `result`, recording the error and returning `None` on failure.
    pub fn absorb<T>(&self, context: &str, result: Result<T, DomainError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.record(context, &e);
                None
            }
        }
    }

    /// Failures recorded so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

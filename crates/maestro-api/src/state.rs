//! Shared application state.

use std::sync::{Arc, Mutex};

use maestro_core::authority::{Authority, FirstActiveGm};
use maestro_core::clock::Clock;
use maestro_core::diagnostics::SessionErrors;
use maestro_core::host::{Host, SoundEndRegistry};
use maestro_core::rng::DeterministicRng;
use maestro_playback::application::command_handlers::PlaybackDriver;

use crate::conductor::Conductor;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The tabletop host.
    pub host: Arc<dyn Host>,
    /// Engines of this session.
    pub conductor: Arc<Conductor>,
}

impl AppState {
    /// Create new application state. Authority follows the first active
    /// game master as reported by `host`.
    #[must_use]
    pub fn new(
        host: Arc<dyn Host>,
        sound_end: Arc<SoundEndRegistry>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    ) -> Self {
        let authority: Arc<dyn Authority> = Arc::new(FirstActiveGm::new(Arc::clone(&host)));
        Self::with_authority(host, sound_end, clock, rng, &authority)
    }

    /// Create new application state with an explicit authority rule.
    #[must_use]
    pub fn with_authority(
        host: Arc<dyn Host>,
        sound_end: Arc<SoundEndRegistry>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        authority: &Arc<dyn Authority>,
    ) -> Self {
        let driver = PlaybackDriver::new(
            Arc::clone(&host),
            rng,
            clock,
            Arc::new(SessionErrors::new()),
        );
        let conductor = Arc::new(Conductor::new(driver, authority, sound_end));
        Self { host, conductor }
    }
}

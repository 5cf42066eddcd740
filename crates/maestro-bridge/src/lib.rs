//! Maestro — host bridge.
//!
//! Implements the [`maestro_core::host::Host`] capability over the REST
//! bridge exposed by the tabletop host. "Sound ended" notifications arrive
//! out of band (the host posts them to the API) and are fanned out through a
//! shared [`maestro_core::host::SoundEndRegistry`].

pub mod http_host;
pub mod paths;

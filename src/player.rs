//! Playback core: the queue/transport controller and the media primitive it drives.
//!
//! The controller never talks to an audio device directly. It is handed a
//! [`MediaBackend`] at construction (the rodio-backed `AudioBackend` at
//! runtime, a scripted fake in tests) and is fed the backend's
//! [`MediaEvent`]s by whoever owns the event loop.

mod controller;
mod media;
mod types;

pub use controller::PlaybackController;
pub use media::{MediaBackend, MediaEvent, MediaEventKind};
pub use types::{LoadToken, PlaybackHandle, PlaybackSnapshot, TransportState};

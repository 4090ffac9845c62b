//! The media primitive the controller drives.
//!
//! Calls are fire-and-forget. Whatever the backend finds out later (playback
//! started or was refused, the length is known, the track ended or failed)
//! comes back as a [`MediaEvent`] tagged with the token of the load it
//! belongs to, and is fed into `PlaybackController::handle_media_event`.

use std::time::Duration;

use super::types::LoadToken;

pub trait MediaBackend {
    /// Stop and release the current media, then start loading `url`.
    fn load(&mut self, token: LoadToken, url: &str);
    /// Attempt to start or resume playback of the media loaded under `token`.
    /// Answered by `Playing` or `PlayRejected`.
    fn play(&mut self, token: LoadToken);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    /// `volume` is already clamped to `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
    /// Stop and release the current media without loading anything else.
    fn unload(&mut self);
    /// Release the backend for good, fading out over `fade_out` if it can.
    fn shutdown(&mut self, _fade_out: Duration) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub token: LoadToken,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(token: LoadToken, kind: MediaEventKind) -> Self {
        Self { token, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// A play attempt succeeded.
    Playing,
    /// A play attempt was refused; the media stays loaded.
    PlayRejected(String),
    LoadedMetadata { duration: Duration },
    TimeUpdate { elapsed: Duration },
    Ended,
    /// The media could not be read or decoded.
    Error(String),
}

//! Audio playback on a dedicated thread.
//!
//! The thread owns the rodio output stream and at most one sink. It is driven
//! by [`MediaCmd`](types::MediaCmd)s and answers with `MediaEvent`s, so the
//! `PlaybackController` never blocks on I/O or decoding.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioBackend;

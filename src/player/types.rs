//! Observable playback state and the token used to tell loads apart.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::Track;

/// Identifies one load of one track. Every media event carries the token of
/// the load it belongs to; events for anything but the latest load are stale.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse transport state, derived from the snapshot fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Nothing loaded.
    #[default]
    Empty,
    Paused,
    Playing,
}

#[derive(Debug, Clone)]
/// Read-only view of the controller published after every change.
pub struct PlaybackSnapshot {
    pub queue: Arc<[Track]>,
    /// Position in `queue`, always in bounds when set.
    pub index: Option<usize>,
    pub playing: bool,
    pub elapsed: Duration,
    /// Zero until the media reports its length.
    pub duration: Duration,
    pub volume: f32,
}

impl PlaybackSnapshot {
    pub fn current_track(&self) -> Option<&Track> {
        self.index.and_then(|i| self.queue.get(i))
    }

    pub fn state(&self) -> TransportState {
        match (self.index, self.playing) {
            (None, _) => TransportState::Empty,
            (Some(_), false) => TransportState::Paused,
            (Some(_), true) => TransportState::Playing,
        }
    }

    /// Known track length, if the media has reported one.
    pub fn known_duration(&self) -> Option<Duration> {
        (!self.duration.is_zero()).then_some(self.duration)
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            queue: Arc::from(Vec::new()),
            index: None,
            playing: false,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 1.0,
        }
    }
}

/// Shared handle the UI polls for the latest snapshot.
pub type PlaybackHandle = Arc<Mutex<PlaybackSnapshot>>;

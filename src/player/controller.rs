use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::catalog::Track;

use super::media::{MediaBackend, MediaEvent, MediaEventKind};
use super::types::{LoadToken, PlaybackHandle, PlaybackSnapshot};

/// Owns the play queue, the position in it, the transport state, and the
/// one media backend everything is played through.
///
/// All methods run to completion on the caller's thread. Starting playback is
/// the only asynchronous step: the backend answers later with a `MediaEvent`,
/// and only answers carrying the current load token are applied.
pub struct PlaybackController<M: MediaBackend> {
    media: M,

    queue: Arc<[Track]>,
    index: Option<usize>,

    playing: bool,
    // A play attempt was issued and has not been answered yet.
    awaiting_play: bool,
    elapsed: Duration,
    duration: Duration,
    volume: f32,

    token: LoadToken,

    handle: PlaybackHandle,
    subscribers: Vec<Sender<PlaybackSnapshot>>,
}

impl<M: MediaBackend> PlaybackController<M> {
    pub fn new(mut media: M, volume: f32) -> Self {
        let volume = if volume.is_nan() { 1.0 } else { volume.clamp(0.0, 1.0) };
        media.set_volume(volume);

        let snapshot = PlaybackSnapshot {
            volume,
            ..PlaybackSnapshot::default()
        };

        Self {
            media,
            queue: snapshot.queue.clone(),
            index: None,
            playing: false,
            awaiting_play: false,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
            volume,
            token: LoadToken::default(),
            handle: Arc::new(Mutex::new(snapshot)),
            subscribers: Vec::new(),
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.index.and_then(|i| self.queue.get(i))
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Zero until the backend reports the length of the loaded media.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            queue: self.queue.clone(),
            index: self.index,
            playing: self.playing,
            elapsed: self.elapsed,
            duration: self.duration,
            volume: self.volume,
        }
    }

    /// Shared handle that always holds the latest snapshot.
    pub fn handle(&self) -> PlaybackHandle {
        self.handle.clone()
    }

    /// Receive a snapshot after every state change. Dropped receivers are pruned.
    pub fn subscribe(&mut self) -> Receiver<PlaybackSnapshot> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Play `track` now.
    ///
    /// With a `queue`, the track is looked up there by id (first match) and the
    /// queue is adopted as is; a track missing from it is put in front of it.
    /// Without one, the queue becomes just this track.
    pub fn play_track(&mut self, track: Track, queue: Option<Vec<Track>>) {
        let (queue, index) = match queue {
            Some(queue) => match queue.iter().position(|t| t.id == track.id) {
                Some(pos) => (queue, pos),
                None => {
                    let mut prepended = Vec::with_capacity(queue.len() + 1);
                    prepended.push(track);
                    prepended.extend(queue);
                    (prepended, 0)
                }
            },
            None => (vec![track], 0),
        };

        self.queue = Arc::from(queue);
        self.load_index(index);
    }

    /// Replace the queue and play from `start_index` (clamped). An empty queue is ignored.
    pub fn play_queue(&mut self, tracks: Vec<Track>, start_index: usize) {
        if tracks.is_empty() {
            debug!("play_queue called with an empty queue, ignoring");
            return;
        }

        let index = start_index.min(tracks.len() - 1);
        self.queue = Arc::from(tracks);
        self.load_index(index);
    }

    /// Replace the queue without starting, stopping or reloading anything.
    ///
    /// The loaded track keeps being addressed by id when the new queue still
    /// contains it. If it is gone, the media is unloaded so `current_track()`
    /// never names something other than what the backend holds.
    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        let current_id = self.current_track().map(|t| t.id.clone());
        self.queue = Arc::from(tracks);

        if let Some(id) = current_id {
            match self.queue.iter().position(|t| t.id == id) {
                Some(pos) => self.index = Some(pos),
                None => {
                    warn!(%id, len = self.queue.len(), "loaded track left the queue, unloading");
                    self.unload();
                    return;
                }
            }
        }

        self.publish();
    }

    pub fn toggle_play(&mut self) {
        if self.index.is_none() {
            return;
        }
        if self.playing || self.awaiting_play {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Attempt to start or resume the loaded track. `is_playing` flips once the
    /// backend confirms.
    pub fn play(&mut self) {
        if self.index.is_none() || self.playing || self.awaiting_play {
            return;
        }
        debug!(token = %self.token, "play attempt");
        self.awaiting_play = true;
        self.media.play(self.token);
    }

    pub fn pause(&mut self) {
        if self.index.is_none() {
            return;
        }
        self.media.pause();
        self.playing = false;
        self.awaiting_play = false;
        self.publish();
    }

    /// Seek to `seconds`, clamped to `[0, duration]` once the duration is known.
    pub fn seek_to(&mut self, seconds: f64) {
        if self.index.is_none() {
            return;
        }

        // `max` also maps NaN to 0.
        let secs = seconds.max(0.0);
        let mut target = match Duration::try_from_secs_f64(secs) {
            Ok(d) => d,
            Err(_) if !self.duration.is_zero() => self.duration,
            Err(_) => {
                debug!(seconds, "unrepresentable seek target with unknown duration, ignoring");
                return;
            }
        };
        if !self.duration.is_zero() {
            target = target.min(self.duration);
        }

        self.elapsed = target;
        self.media.seek(target);
        self.publish();
    }

    /// Set the volume (clamped to `0.0..=1.0`); kept for every later load.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.media.set_volume(self.volume);
        self.publish();
    }

    /// Advance one track. At the end of the queue playback stops and the last
    /// track stays loaded.
    pub fn next(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        match self.index {
            None => self.load_index(0),
            Some(i) if i + 1 < self.queue.len() => self.load_index(i + 1),
            Some(i) => {
                info!(index = i, "end of queue");
                self.media.pause();
                self.playing = false;
                self.awaiting_play = false;
                self.publish();
            }
        }
    }

    /// Go back one track; at the start the first track is reloaded.
    pub fn prev(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        match self.index {
            None => self.load_index(0),
            Some(i) => self.load_index(i.saturating_sub(1)),
        }
    }

    /// Apply something the media backend reported. Events from superseded loads are dropped.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if event.token != self.token || self.index.is_none() {
            trace!(event = ?event, current = %self.token, "dropping stale media event");
            return;
        }

        match event.kind {
            MediaEventKind::Playing => {
                if !self.awaiting_play {
                    debug!(token = %event.token, "play confirmed after pause, ignoring");
                    return;
                }
                self.awaiting_play = false;
                self.playing = true;
                self.publish();
            }
            MediaEventKind::PlayRejected(reason) => {
                info!(token = %event.token, %reason, "play attempt rejected, track stays loaded");
                self.awaiting_play = false;
                self.playing = false;
                self.publish();
            }
            MediaEventKind::LoadedMetadata { duration } => {
                self.duration = duration;
                if !duration.is_zero() {
                    self.elapsed = self.elapsed.min(duration);
                }
                self.publish();
            }
            MediaEventKind::TimeUpdate { elapsed } => {
                self.elapsed = if self.duration.is_zero() {
                    elapsed
                } else {
                    elapsed.min(self.duration)
                };
                self.publish();
            }
            MediaEventKind::Ended => {
                debug!(token = %event.token, "track ended");
                self.next();
            }
            MediaEventKind::Error(reason) => {
                let id = self.current_track().map(|t| t.id.clone()).unwrap_or_default();
                warn!(token = %event.token, track = %id, %reason, "media error, skipping track");
                self.next();
            }
        }
    }

    /// Release the media backend. Nothing is loaded afterwards.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.token = self.token.next();
        self.media.shutdown(fade_out);
        self.index = None;
        self.playing = false;
        self.awaiting_play = false;
        self.elapsed = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.publish();
    }

    fn load_index(&mut self, index: usize) {
        let Some(track) = self.queue.get(index) else {
            warn!(index, len = self.queue.len(), "load of out-of-range index, unloading");
            self.unload();
            return;
        };

        self.token = self.token.next();
        self.index = Some(index);
        self.playing = false;
        self.awaiting_play = true;
        self.elapsed = Duration::ZERO;
        self.duration = Duration::ZERO;

        info!(token = %self.token, index, id = %track.id, title = %track.title, "loading track");
        self.media.unload();
        self.media.load(self.token, &track.media_url);
        self.media.set_volume(self.volume);
        self.media.play(self.token);
        self.publish();
    }

    fn unload(&mut self) {
        self.token = self.token.next();
        self.media.unload();
        self.index = None;
        self.playing = false;
        self.awaiting_play = false;
        self.elapsed = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.publish();
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        if let Ok(mut shared) = self.handle.lock() {
            *shared = snapshot.clone();
        }
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

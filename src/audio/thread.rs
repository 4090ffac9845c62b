use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::player::{LoadToken, MediaEvent, MediaEventKind};

use super::sink::{create_sink_at, inspect, read_media};
use super::types::MediaCmd;

/// Whatever is loaded right now. At most one exists at a time.
struct Loaded {
    token: LoadToken,
    bytes: Arc<[u8]>,
    /// `None` when no output device is available.
    sink: Option<Sink>,
    duration: Option<Duration>,
    paused: bool,
    // Elapsed time is `accumulated` plus the time since `started_at`.
    started_at: Option<Instant>,
    accumulated: Duration,
    // `Ended` has been reported for this load.
    ended: bool,
}

impl Loaded {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn stop(&self) {
        if let Some(s) = self.sink.as_ref() {
            s.stop();
        }
    }

    /// Start the clock. Media that already ended starts over from zero; the
    /// caller rebuilds the sink for that case.
    fn resume(&mut self) {
        if self.ended {
            self.ended = false;
            self.accumulated = Duration::ZERO;
            self.started_at = None;
            self.paused = true;
        }
        if self.paused {
            self.paused = false;
            self.started_at = Some(Instant::now());
        }
    }

    /// Progress for one tick: the position to report and whether the media
    /// just ended. `None` while paused or after the end was reported.
    fn tick(&mut self, drained: bool) -> Option<(Duration, bool)> {
        if self.paused || self.ended {
            return None;
        }
        let mut elapsed = self.elapsed();
        if let Some(d) = self.duration {
            elapsed = elapsed.min(d);
        }
        if drained {
            self.ended = true;
            self.paused = true;
            self.accumulated = elapsed;
            self.started_at = None;
        }
        Some((elapsed, drained))
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<MediaCmd>,
    events: Sender<MediaEvent>,
    client: reqwest::blocking::Client,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // Without an output device we still load and inspect media; play attempts get rejected.
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which would
                // scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device, playback will be rejected");
                None
            }
        };

        let tick = Duration::from_millis(audio_settings.tick_ms.max(10));
        let mut volume: f32 = 1.0;
        let mut current: Option<Loaded> = None;

        let emit = |token: LoadToken, kind: MediaEventKind| {
            // The receiver only goes away while the app shuts down.
            let _ = events.send(MediaEvent::new(token, kind));
        };

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    MediaCmd::Load { token, url } => {
                        if let Some(old) = current.take() {
                            old.stop();
                        }
                        match load(stream.as_ref(), &client, token, &url, volume) {
                            Ok(loaded) => {
                                if let Some(duration) = loaded.duration {
                                    emit(token, MediaEventKind::LoadedMetadata { duration });
                                }
                                current = Some(loaded);
                            }
                            Err(reason) => {
                                warn!(token = %token, %url, %reason, "failed to load media");
                                emit(token, MediaEventKind::Error(reason));
                            }
                        }
                    }

                    MediaCmd::Play(token) => {
                        let Some(cur) = current.as_mut().filter(|c| c.token == token) else {
                            emit(token, MediaEventKind::PlayRejected("nothing loaded".into()));
                            continue;
                        };
                        let Some(stream) = stream.as_ref().filter(|_| cur.sink.is_some()) else {
                            emit(token, MediaEventKind::PlayRejected("no audio output device".into()));
                            continue;
                        };
                        if cur.ended {
                            // The drained sink has nothing left; start over.
                            match create_sink_at(stream, &cur.bytes, Duration::ZERO) {
                                Ok(new_sink) => {
                                    cur.stop();
                                    new_sink.set_volume(volume);
                                    cur.sink = Some(new_sink);
                                }
                                Err(reason) => {
                                    warn!(token = %token, %reason, "restart failed");
                                    emit(token, MediaEventKind::PlayRejected(reason));
                                    continue;
                                }
                            }
                            debug!(token = %token, "restarting ended media");
                        }
                        cur.resume();
                        if let Some(s) = cur.sink.as_ref() {
                            s.play();
                        }
                        emit(token, MediaEventKind::Playing);
                    }

                    MediaCmd::Pause => {
                        if let Some(cur) = current.as_mut() {
                            if let Some(s) = cur.sink.as_ref() {
                                s.pause();
                            }
                            if let Some(st) = cur.started_at.take() {
                                cur.accumulated += st.elapsed();
                            }
                            cur.paused = true;
                        }
                    }

                    MediaCmd::Seek(target) => {
                        let Some(cur) = current.as_mut() else {
                            continue;
                        };
                        let target = cur.duration.map_or(target, |d| target.min(d));
                        if let Some(stream) = stream.as_ref() {
                            // Rebuild the sink and skip into the retained bytes.
                            match create_sink_at(stream, &cur.bytes, target) {
                                Ok(new_sink) => {
                                    cur.stop();
                                    new_sink.set_volume(volume);
                                    if !cur.paused {
                                        new_sink.play();
                                    }
                                    cur.sink = Some(new_sink);
                                }
                                Err(reason) => {
                                    warn!(token = %cur.token, %reason, "seek failed");
                                    continue;
                                }
                            }
                        }
                        cur.accumulated = target;
                        cur.started_at = (!cur.paused).then(Instant::now);
                        cur.ended = false;
                        debug!(token = %cur.token, position = ?target, "seeked");
                        emit(cur.token, MediaEventKind::TimeUpdate { elapsed: target });
                    }

                    MediaCmd::SetVolume(v) => {
                        volume = v;
                        if let Some(s) = current.as_ref().and_then(|c| c.sink.as_ref()) {
                            s.set_volume(v);
                        }
                    }

                    MediaCmd::Unload => {
                        if let Some(old) = current.take() {
                            old.stop();
                        }
                    }

                    MediaCmd::Quit { fade_out_ms } => {
                        if let Some(cur) = current.take() {
                            if let Some(s) = cur.sink.as_ref() {
                                if !cur.paused {
                                    fade_out_sink(s, volume, fade_out_ms);
                                }
                                s.stop();
                            }
                        }
                        info!("audio thread exiting");
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic progress report and end-of-track check.
                    let Some(cur) = current.as_mut() else {
                        continue;
                    };
                    let drained = cur.sink.as_ref().is_some_and(Sink::empty);
                    let Some((elapsed, ended)) = cur.tick(drained) else {
                        continue;
                    };
                    emit(cur.token, MediaEventKind::TimeUpdate { elapsed });
                    if ended {
                        debug!(token = %cur.token, "sink drained");
                        emit(cur.token, MediaEventKind::Ended);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn load(
    stream: Option<&OutputStream>,
    client: &reqwest::blocking::Client,
    token: LoadToken,
    url: &str,
    volume: f32,
) -> Result<Loaded, String> {
    let bytes = read_media(url, client)?;
    let duration = inspect(&bytes)?;

    let sink = match stream {
        Some(stream) => {
            let s = create_sink_at(stream, &bytes, Duration::ZERO)?;
            s.set_volume(volume);
            Some(s)
        }
        None => None,
    };

    debug!(token = %token, %url, size = bytes.len(), duration = ?duration, "media loaded");
    Ok(Loaded {
        token,
        bytes,
        sink,
        duration,
        paused: true,
        started_at: None,
        accumulated: Duration::ZERO,
        ended: false,
    })
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(duration: Duration) -> Loaded {
        Loaded {
            token: LoadToken::default().next(),
            bytes: Arc::from(Vec::new()),
            sink: None,
            duration: Some(duration),
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            ended: false,
        }
    }

    #[test]
    fn paused_media_reports_nothing() {
        let mut cur = loaded(Duration::from_secs(3));
        assert_eq!(cur.tick(false), None);
    }

    #[test]
    fn drained_media_ends_once() {
        let mut cur = loaded(Duration::from_secs(3));
        cur.resume();
        assert!(matches!(cur.tick(false), Some((_, false))));

        cur.accumulated = Duration::from_secs(10);
        assert_eq!(cur.tick(true), Some((Duration::from_secs(3), true)));
        assert!(cur.ended && cur.paused);
        assert_eq!(cur.tick(true), None);
    }

    #[test]
    fn playing_after_the_end_starts_over_and_can_end_again() {
        let mut cur = loaded(Duration::from_secs(3));
        cur.resume();
        cur.accumulated = Duration::from_secs(3);
        assert_eq!(cur.tick(true), Some((Duration::from_secs(3), true)));

        cur.resume();
        assert!(!cur.ended && !cur.paused);
        let (elapsed, ended) = cur.tick(false).unwrap();
        assert!(elapsed < Duration::from_secs(1), "restarted from zero, got {elapsed:?}");
        assert!(!ended);

        assert!(matches!(cur.tick(true), Some((_, true))));
    }

    #[test]
    fn resume_while_running_keeps_the_clock() {
        let mut cur = loaded(Duration::from_secs(300));
        cur.resume();
        cur.accumulated = Duration::from_secs(42);
        cur.resume();
        assert!(cur.elapsed() >= Duration::from_secs(42));
    }
}

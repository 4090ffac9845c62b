use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::AudioSettings;
use crate::player::{LoadToken, MediaBackend, MediaEvent};

use super::thread::spawn_audio_thread;
use super::types::MediaCmd;

/// Handle to the audio thread. Implements [`MediaBackend`] by forwarding
/// every call as a [`MediaCmd`]; outcomes arrive on the event receiver
/// returned by [`AudioBackend::spawn`].
pub struct AudioBackend {
    tx: Sender<MediaCmd>,
    join: Option<JoinHandle<()>>,
}

impl AudioBackend {
    pub fn spawn(audio_settings: AudioSettings, http_timeout: Duration) -> crate::Result<(Self, Receiver<MediaEvent>)> {
        let client = reqwest::blocking::Client::builder().timeout(http_timeout).build()?;
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let (events_tx, events_rx) = mpsc::channel::<MediaEvent>();

        let audio_handle = spawn_audio_thread(rx, events_tx, client, audio_settings);

        Ok((
            Self {
                tx,
                join: Some(audio_handle),
            },
            events_rx,
        ))
    }

    fn send(&self, cmd: MediaCmd) {
        if let Err(e) = self.tx.send(cmd) {
            debug!(cmd = ?e.0, "audio thread gone, dropping command");
        }
    }

    /// Fade out, stop the thread and wait for it.
    pub fn quit_softly(&mut self, fade_out: Duration) {
        self.send(MediaCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl MediaBackend for AudioBackend {
    fn load(&mut self, token: LoadToken, url: &str) {
        self.send(MediaCmd::Load {
            token,
            url: url.to_string(),
        });
    }

    fn play(&mut self, token: LoadToken) {
        self.send(MediaCmd::Play(token));
    }

    fn pause(&mut self) {
        self.send(MediaCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(MediaCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(MediaCmd::SetVolume(volume));
    }

    fn unload(&mut self) {
        self.send(MediaCmd::Unload);
    }

    fn shutdown(&mut self, fade_out: Duration) {
        self.quit_softly(fade_out);
    }
}

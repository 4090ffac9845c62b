//! Commands understood by the audio thread.

use std::time::Duration;

use crate::player::LoadToken;

#[derive(Debug)]
pub enum MediaCmd {
    /// Drop the current sink and load `url` under `token`, paused.
    Load { token: LoadToken, url: String },
    /// Start or resume the media loaded under the token.
    Play(LoadToken),
    Pause,
    /// Jump to an absolute position in the current media.
    Seek(Duration),
    SetVolume(f32),
    /// Drop the current sink without loading anything.
    Unload,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

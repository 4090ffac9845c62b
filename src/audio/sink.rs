//! Reading media bytes and turning them into `rodio` sinks.
//!
//! Media is read fully into memory once per load. Seeking rebuilds the sink
//! from the same bytes and skips into them.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};

/// Fetch the raw bytes behind a track's media URL.
///
/// Accepts plain filesystem paths, `file://` URLs and `http(s)://` URLs.
pub(super) fn read_media(url: &str, client: &reqwest::blocking::Client) -> Result<Arc<[u8]>, String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        let resp = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| format!("failed to fetch {url}: {e}"))?;
        let bytes = resp.bytes().map_err(|e| format!("failed to read body of {url}: {e}"))?;
        return Ok(Arc::from(bytes.as_ref()));
    }

    let path = url.strip_prefix("file://").unwrap_or(url);
    std::fs::read(path)
        .map(Arc::from)
        .map_err(|e| format!("failed to open {path:?}: {e}"))
}

/// Check that `bytes` decode and work out their length.
///
/// The decoder's own estimate wins; formats that do not report one are probed
/// with `lofty`.
pub(super) fn inspect(bytes: &Arc<[u8]>) -> Result<Option<Duration>, String> {
    let decoder = Decoder::new(Cursor::new(bytes.clone())).map_err(|e| format!("failed to decode: {e}"))?;
    Ok(decoder.total_duration().or_else(|| probe_duration(bytes)))
}

fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes)).guess_file_type().ok()?.read().ok()?;
    let duration = tagged.properties().duration();
    (!duration.is_zero()).then_some(duration)
}

/// Create a paused `Sink` over `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(stream: &OutputStream, bytes: &Arc<[u8]>, start_at: Duration) -> Result<Sink, String> {
    let source = Decoder::new(Cursor::new(bytes.clone()))
        .map_err(|e| format!("failed to decode: {e}"))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.append(source);
    Ok(sink)
}

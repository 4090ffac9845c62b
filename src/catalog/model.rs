/// A playable unit as handed to the player.
///
/// Only `id` and `media_url` mean anything to playback; the rest is display
/// metadata carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Identifier used for first-match lookups inside a queue.
    pub id: String,
    /// Filesystem path, `file://` URL or `http(s)://` URL.
    pub media_url: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
    /// Human-readable length such as `3:45`, as supplied by the source.
    pub duration_label: Option<String>,
    /// Precomputed list label.
    pub display: String,
}

impl Track {
    /// A track with only the fields playback needs; `display` falls back to `title`.
    pub fn new(id: impl Into<String>, media_url: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            media_url: media_url.into(),
            display: title.clone(),
            title,
            artist: None,
            album: None,
            genre: None,
            cover_url: None,
            duration_label: None,
        }
    }
}

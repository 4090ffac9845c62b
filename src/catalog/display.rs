use std::path::Path;
use std::time::Duration;

use crate::config::TrackDisplayField;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes metadata fields (artist, title, album, filename, url) in the
/// configured order and falls back to `title` when no parts were produced.
pub fn display_from_fields(
    media_url: &str,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                // "display" in a field list means "artist, title".
                if let Some(a) = non_blank(artist) {
                    parts.push(a.to_string());
                }
                if !title.trim().is_empty() {
                    parts.push(title.trim().to_string());
                }
            }
            TrackDisplayField::Title => {
                if !title.trim().is_empty() {
                    parts.push(title.trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if let Some(a) = non_blank(artist) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Album => {
                if let Some(a) = non_blank(album) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = file_stem(media_url) {
                    parts.push(stem.to_string());
                }
            }
            TrackDisplayField::Url => {
                parts.push(media_url.to_string());
            }
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}

/// Last path segment of a path or URL without its extension (and query string).
pub(crate) fn file_stem(media_url: &str) -> Option<&str> {
    let without_query = media_url.split(['?', '#']).next().unwrap_or(media_url);
    Path::new(without_query)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
}

/// Format a duration as a `m:ss` label, rounding partial seconds down.
pub fn format_label(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

//! REST-style JSON data store.
//!
//! The store is a document with `songs`, `artists`, `albums` and `genres`
//! collections, the shape a json-server style backend exposes both as a single
//! `db.json` file and as one endpoint per collection. Songs reference the other
//! collections by id and are joined against them in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::display::{display_from_fields, format_label};
use super::model::Track;

/// Ids show up both as JSON numbers and as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    RawId::deserialize(d).map(Into::into)
}

fn opt_id_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(Into::into))
}

/// Either a ready-made label (`"3:45"`) or a number of seconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Label(String),
    Seconds(f64),
}

fn opt_duration_label<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Option::<RawDuration>::deserialize(d)? {
        Some(RawDuration::Label(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(RawDuration::Seconds(secs)) => Duration::try_from_secs_f64(secs).ok().map(format_label),
        _ => None,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub artist_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub album_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub genre_id: Option<String>,
    #[serde(default, alias = "audioUrl", alias = "audio", alias = "url", alias = "fileUrl")]
    pub media_url: Option<String>,
    #[serde(default, alias = "coverImage", alias = "image")]
    pub cover_url: Option<String>,
    #[serde(default, deserialize_with = "opt_duration_label")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default, alias = "coverImage", alias = "image")]
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

/// Where relative media URLs are resolved from.
#[derive(Debug, Clone, PartialEq)]
enum Origin {
    Dir(PathBuf),
    Remote(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataStore {
    pub songs: Vec<SongRecord>,
    pub artists: Vec<ArtistRecord>,
    pub albums: Vec<AlbumRecord>,
    pub genres: Vec<GenreRecord>,
    #[serde(skip)]
    origin: Option<Origin>,
}

impl DataStore {
    /// Parse a whole store document. Relative media URLs stay as they are.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a `db.json`-style document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut store = Self::from_json(&json)?;
        store.origin = path.parent().map(|p| Origin::Dir(p.to_path_buf()));
        info!(path = %path.display(), songs = store.songs.len(), "loaded data store");
        Ok(store)
    }

    /// Fetch a store over HTTP.
    ///
    /// A URL ending in `.json` is fetched as one document; anything else is
    /// treated as a base URL exposing one endpoint per collection. Only
    /// `songs` is required, missing side collections are treated as empty.
    pub fn fetch(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;

        let mut store = if url.ends_with(".json") {
            client.get(url).send()?.error_for_status()?.json::<DataStore>()?
        } else {
            let base = url.trim_end_matches('/');
            DataStore {
                songs: fetch_collection(&client, base, "songs", true)?,
                artists: fetch_collection(&client, base, "artists", false)?,
                albums: fetch_collection(&client, base, "albums", false)?,
                genres: fetch_collection(&client, base, "genres", false)?,
                origin: None,
            }
        };

        let base = match url.rsplit_once('/') {
            Some((dir, last)) if last.ends_with(".json") => dir,
            _ => url.trim_end_matches('/'),
        };
        store.origin = Some(Origin::Remote(base.to_string()));
        info!(url, songs = store.songs.len(), "fetched data store");
        Ok(store)
    }

    /// Join songs against artists, albums and genres, in store order.
    ///
    /// Songs without a media URL cannot be played and are skipped.
    pub fn tracks(&self, settings: &LibrarySettings) -> Vec<Track> {
        let artists: HashMap<&str, &ArtistRecord> =
            self.artists.iter().map(|a| (a.id.as_str(), a)).collect();
        let albums: HashMap<&str, &AlbumRecord> =
            self.albums.iter().map(|a| (a.id.as_str(), a)).collect();
        let genres: HashMap<&str, &GenreRecord> =
            self.genres.iter().map(|g| (g.id.as_str(), g)).collect();

        let mut tracks = Vec::with_capacity(self.songs.len());
        for song in &self.songs {
            let Some(url) = song.media_url.as_deref().filter(|u| !u.trim().is_empty()) else {
                warn!(song = %song.id, title = %song.title, "song has no media url, skipping");
                continue;
            };

            let artist = song
                .artist_id
                .as_deref()
                .and_then(|id| artists.get(id))
                .map(|a| a.name.clone());
            let album = song.album_id.as_deref().and_then(|id| albums.get(id)).copied();
            let genre = song
                .genre_id
                .as_deref()
                .and_then(|id| genres.get(id))
                .map(|g| g.name.clone());

            let mut track = Track::new(song.id.clone(), self.resolve(url.trim()), song.title.clone());
            track.artist = artist;
            track.album = album.map(|a| a.title.clone());
            track.genre = genre;
            track.cover_url = song
                .cover_url
                .clone()
                .or_else(|| album.and_then(|a| a.cover_url.clone()));
            track.duration_label = song.duration.clone();
            track.display = display_from_fields(
                &track.media_url,
                &track.title,
                track.artist.as_deref(),
                track.album.as_deref(),
                &settings.display_fields,
                &settings.display_separator,
            );
            tracks.push(track);
        }

        debug!(songs = self.songs.len(), tracks = tracks.len(), "joined data store");
        tracks
    }

    fn resolve(&self, url: &str) -> String {
        if url.contains("://") || Path::new(url).is_absolute() {
            return url.to_string();
        }
        match &self.origin {
            Some(Origin::Dir(dir)) => dir.join(url).display().to_string(),
            Some(Origin::Remote(base)) => format!("{}/{}", base, url.trim_start_matches('/')),
            None => url.to_string(),
        }
    }
}

fn fetch_collection<T: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    base: &str,
    name: &str,
    required: bool,
) -> Result<Vec<T>> {
    let url = format!("{base}/{name}");
    let resp = client.get(&url).send()?;
    if !required && resp.status() == reqwest::StatusCode::NOT_FOUND {
        debug!(%url, "collection not exposed, treating as empty");
        return Ok(Vec::new());
    }
    if required && !resp.status().is_success() {
        return Err(Error::Catalog(format!("failed to fetch {url}: {}", resp.status())));
    }
    Ok(resp.error_for_status()?.json()?)
}

use super::display::file_stem;
use super::*;
use crate::config::{CatalogSettings, LibrarySettings, TrackDisplayField};
use std::time::Duration;

const DB: &str = r#"
{
  "songs": [
    { "id": 1, "title": "Blue Hour", "artistId": 10, "albumId": "a1", "genreId": 3,
      "audioUrl": "media/blue-hour.mp3", "duration": 215 },
    { "id": "2", "title": "No Audio Yet", "artistId": 10 },
    { "id": 3, "title": "Night Drive", "artistId": 11, "albumId": "a1",
      "audioUrl": "https://cdn.example.com/night.ogg", "coverImage": "night.png",
      "duration": "4:02" }
  ],
  "artists": [
    { "id": 10, "name": "Lumen" },
    { "id": 11, "name": "Vesper" }
  ],
  "albums": [
    { "id": "a1", "title": "Afterglow", "coverImage": "afterglow.png" }
  ],
  "genres": [
    { "id": 3, "name": "Ambient" }
  ]
}
"#;

fn artist_title() -> LibrarySettings {
    LibrarySettings {
        display_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
        display_separator: " - ".to_string(),
        ..LibrarySettings::default()
    }
}

#[test]
fn display_from_fields_can_format_artist_title() {
    let fields = [TrackDisplayField::Artist, TrackDisplayField::Title];
    assert_eq!(
        display_from_fields("/tmp/Song.mp3", "Song", Some("Artist"), None, &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields("/tmp/Song.mp3", "Song", Some("  Artist  "), None, &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields("/tmp/Song.mp3", "Song", None, None, &fields, " - "),
        "Song"
    );
}

#[test]
fn file_stem_strips_query_and_extension() {
    assert_eq!(file_stem("https://cdn.example.com/a/track.mp3?sig=abc"), Some("track"));
    assert_eq!(file_stem("/music/b.flac"), Some("b"));
    assert_eq!(file_stem(""), None);
}

#[test]
fn format_label_renders_minutes_and_seconds() {
    assert_eq!(format_label(Duration::from_secs(215)), "3:35");
    assert_eq!(format_label(Duration::from_millis(59_900)), "0:59");
}

#[test]
fn store_joins_songs_against_artists_albums_and_genres() {
    let store = DataStore::from_json(DB).unwrap();
    let tracks = store.tracks(&artist_title());

    assert_eq!(tracks.len(), 2, "song without media url is skipped");

    let blue = &tracks[0];
    assert_eq!(blue.id, "1");
    assert_eq!(blue.artist.as_deref(), Some("Lumen"));
    assert_eq!(blue.album.as_deref(), Some("Afterglow"));
    assert_eq!(blue.genre.as_deref(), Some("Ambient"));
    assert_eq!(blue.cover_url.as_deref(), Some("afterglow.png"));
    assert_eq!(blue.duration_label.as_deref(), Some("3:35"));
    assert_eq!(blue.display, "Lumen - Blue Hour");

    let night = &tracks[1];
    assert_eq!(night.id, "3");
    assert_eq!(night.media_url, "https://cdn.example.com/night.ogg");
    assert_eq!(night.cover_url.as_deref(), Some("night.png"));
    assert_eq!(night.duration_label.as_deref(), Some("4:02"));
}

#[test]
fn store_file_resolves_relative_media_against_its_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, DB).unwrap();

    let tracks = DataStore::from_path(&path).unwrap().tracks(&artist_title());
    assert_eq!(
        tracks[0].media_url,
        dir.path().join("media/blue-hour.mp3").display().to_string()
    );
    // Absolute URLs are left alone.
    assert_eq!(tracks[1].media_url, "https://cdn.example.com/night.ogg");
}

#[test]
fn store_tolerates_missing_collections() {
    let store = DataStore::from_json(r#"{ "songs": [ { "id": 7, "title": "Solo", "url": "solo.wav" } ] }"#)
        .unwrap();
    let tracks = store.tracks(&artist_title());
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].artist, None);
    assert_eq!(tracks[0].display, "Solo");
}

#[test]
fn store_drops_numeric_durations_that_do_not_fit() {
    let store = DataStore::from_json(
        r#"{ "songs": [
            { "id": 1, "title": "Forever", "url": "a.wav", "duration": 1e300 },
            { "id": 2, "title": "Backwards", "url": "b.wav", "duration": -4 },
            { "id": 3, "title": "Short", "url": "c.wav", "duration": 61.4 }
        ] }"#,
    )
    .unwrap();
    let tracks = store.tracks(&artist_title());

    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[0].duration_label, None);
    assert_eq!(tracks[1].duration_label, None);
    assert_eq!(tracks[2].duration_label.as_deref(), Some("1:01"));
}

#[test]
fn open_source_picks_scan_for_directories_and_store_for_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one.mp3"), b"not real").unwrap();
    let db = dir.path().join("db.json");
    std::fs::write(&db, DB).unwrap();

    let library = LibrarySettings::default();
    let catalog = CatalogSettings::default();

    let scanned = open_source(dir.path().to_str().unwrap(), &library, &catalog).unwrap();
    assert_eq!(scanned.len(), 1);

    let stored = open_source(db.to_str().unwrap(), &library, &catalog).unwrap();
    assert_eq!(stored.len(), 2);

    let missing = dir.path().join("nope");
    assert!(open_source(missing.to_str().unwrap(), &library, &catalog).is_err());
}

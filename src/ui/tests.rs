use std::sync::Arc;
use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend};

use super::*;
use crate::config::TrackDisplayField;

fn track(id: &str, artist: &str) -> Track {
    let mut t = Track::new(id, format!("https://cdn.example/{id}.mp3"), format!("Title {id}"));
    t.artist = Some(artist.to_string());
    t.display = format!("{artist} - Title {id}");
    t
}

fn snapshot(queue: Vec<Track>, index: Option<usize>, playing: bool) -> PlaybackSnapshot {
    PlaybackSnapshot {
        queue: Arc::from(queue),
        index,
        playing,
        elapsed: Duration::from_secs(65),
        duration: Duration::from_secs(200),
        volume: 0.5,
    }
}

fn rendered(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn time_text_follows_configured_fields() {
    let ui = UiSettings::default();
    let text = now_playing_time_text(Duration::from_secs(65), Some(Duration::from_secs(200)), &ui);
    assert_eq!(text.as_deref(), Some("01:05 / 03:20 / -02:15"));

    // Unknown length leaves only the elapsed part.
    let text = now_playing_time_text(Duration::from_secs(5), None, &ui);
    assert_eq!(text.as_deref(), Some("00:05"));

    let ui = UiSettings {
        now_playing_time_fields: vec![TimeField::Total],
        ..UiSettings::default()
    };
    assert_eq!(now_playing_time_text(Duration::ZERO, None, &ui), None);
}

#[test]
fn status_shows_song_transport_and_volume() {
    let mut app = App::new(vec![track("1", "Low")]);
    app.set_source("db.json".to_string());
    let ui = UiSettings {
        now_playing_track_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
        ..UiSettings::default()
    };

    let s = snapshot(vec![track("1", "Low"), track("2", "Sade")], Some(1), true);
    let text = status_text(&app, Some(&s), &ui);
    assert!(text.contains("Song: Sade - Title 2 [01:05 / 03:20 / -02:15]"), "{text}");
    assert!(text.contains("Playing (2/2)"), "{text}");
    assert!(text.contains("Vol: 50%"), "{text}");
    assert!(text.contains("Source: db.json"), "{text}");

    let s = snapshot(vec![track("1", "Low")], Some(0), false);
    assert!(status_text(&app, Some(&s), &ui).contains("Paused (1/1)"));

    let s = snapshot(Vec::new(), None, false);
    assert!(status_text(&app, Some(&s), &ui).contains("Stopped"));
}

#[test]
fn status_shows_filter_and_cursor_mode() {
    let mut app = App::new(vec![track("1", "Low")]);
    app.enter_filter_mode();
    app.push_filter_char('l');
    let text = status_text(&app, None, &UiSettings::default());
    assert!(text.contains("CURSOR: Free-roam"), "{text}");
    assert!(text.contains("FILTER: l"), "{text}");
}

#[test]
fn metadata_lists_catalog_fields() {
    let mut t = track("7", "Björk");
    t.genre = Some("Electronic".into());
    t.duration_label = Some("4:01".into());
    let text = metadata_text(Some(&t));
    assert!(text.contains("Artist: Björk"));
    assert!(text.contains("Genre: Electronic"));
    assert!(text.contains("Duration: 4:01"));
    assert!(text.contains("Media: https://cdn.example/7.mp3"));
    assert!(text.contains("Cover: -"));

    assert_eq!(metadata_text(None), "No track selected");
}

#[test]
fn controls_text_includes_seek_step() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] seek -/+7s"));
    assert!(text.starts_with("[j/k] up/down"));
}

#[test]
fn draw_renders_list_and_popup() {
    let mut app = App::new(vec![track("1", "Low"), track("2", "Sade")]);
    app.set_selected(1);
    app.toggle_metadata_window();
    let s = snapshot(vec![track("1", "Low")], Some(0), true);
    let display = app.display_indices();

    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal
        .draw(|f| {
            draw(
                f,
                &app,
                Some(&s),
                &display,
                &UiSettings::default(),
                &ControlsSettings::default(),
            )
        })
        .unwrap();

    let screen = rendered(&terminal);
    assert!(screen.contains("playdeck"));
    assert!(screen.contains("Low - Title 1"));
    assert!(screen.contains("metadata (K closes)"));
    assert!(screen.contains("Artist: Sade"));
}

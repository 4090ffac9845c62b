use super::*;
use crate::catalog::Track;
use crate::player::PlaybackSnapshot;
use std::sync::{Arc, Mutex};

fn t(label: &str) -> Track {
    Track::new(label, format!("/music/{label}.mp3"), label)
}

fn playing(queue: Vec<Track>, index: usize) -> PlaybackSnapshot {
    PlaybackSnapshot {
        queue: Arc::from(queue),
        index: Some(index),
        playing: true,
        ..PlaybackSnapshot::default()
    }
}

#[test]
fn fuzzy_match_simple() {
    let label = "Hello World";
    assert!(App::fuzzy_match_positions(label, "hw").is_some());
    assert!(App::fuzzy_match_positions(label, "ello").is_some());
    assert!(App::fuzzy_match_positions(label, "xyz").is_none());
    assert_eq!(App::fuzzy_match_positions(label, "HW"), Some(vec![0, 6]));
}

#[test]
fn display_indices_respects_filter_query() {
    let mut app = App::new(vec![t("Alpha"), t("Beta"), t("Gamma"), t("Delta")]);
    app.push_filter_char('e');
    app.push_filter_char('t');
    assert_eq!(app.display_indices(), vec![1, 3]);

    app.pop_filter_char();
    app.pop_filter_char();
    assert_eq!(app.display_indices(), vec![0, 1, 2, 3]);
}

#[test]
fn display_indices_uses_fuzzy_not_substring_only() {
    let mut app = App::new(vec![t("Metallica - Blackened"), t("Black Sabbath - Paranoid")]);
    app.filter_query = "mtbk".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn trimming_filter_query_affects_matching() {
    let mut app = App::new(vec![t("Black Sabbath - Paranoid")]);
    app.filter_query = "Black ".into();
    assert_eq!(app.display_indices(), vec![0]);

    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn large_catalogs_filter_through_precomputed_labels() {
    let tracks: Vec<Track> = (0..150).map(|i| t(&format!("Song {i:03}"))).collect();
    let mut app = App::new(tracks);
    assert!(app.uses_lower_labels());

    app.filter_query = "SONG 149".into();
    assert_eq!(app.display_indices(), vec![149]);
    assert_eq!(
        app.fuzzy_match_positions_for_track_lower(149, "song 149"),
        Some((0..8).collect::<Vec<_>>())
    );
    assert_eq!(app.fuzzy_match_positions_for_track_lower(148, "song 149"), None);
}

#[test]
fn next_prev_in_view_helpers_work() {
    let mut app = App::new(vec![t("Alpha"), t("Beta"), t("Gamma")]);
    app.filter_query = "et".into(); // only Beta is visible

    assert_eq!(app.next_in_view_from(0), Some(1));
    assert_eq!(app.prev_in_view_from(0), Some(1));
    assert_eq!(app.next_in_view_from(1), Some(1));
    assert_eq!(app.prev_in_view_from(1), Some(1));
}

#[test]
fn cursor_moves_wrap_and_jump_to_ends() {
    let mut app = App::new(vec![t("A"), t("B"), t("C")]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);

    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn filtering_moves_selection_into_view() {
    let mut app = App::new(vec![t("Alpha"), t("Beta"), t("Gamma")]);
    app.enter_filter_mode();
    assert!(!app.follow_playback);

    app.push_filter_char('g');
    assert_eq!(app.selected, 2);

    app.push_filter_char('z');
    assert!(app.display_indices().is_empty());
    assert_eq!(app.selected, 0);

    app.clear_filter();
    assert!(!app.filter_mode);
    assert_eq!(app.display_indices().len(), 3);
}

#[test]
fn visible_tracks_follow_the_filter() {
    let mut app = App::new(vec![t("Alpha"), t("Beta"), t("Gamma")]);
    app.filter_query = "a".into();
    let ids: Vec<String> = app.visible_tracks().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["Alpha", "Beta", "Gamma"]);

    app.filter_query = "mm".into();
    let ids: Vec<String> = app.visible_tracks().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["Gamma"]);
}

#[test]
fn follow_moves_cursor_to_playing_track_by_id() {
    let tracks = vec![t("A"), t("B"), t("C")];
    let mut app = App::new(tracks.clone());

    // The queue is a filtered view, so its positions differ from the list's.
    app.follow(&playing(vec![tracks[1].clone(), tracks[2].clone()], 1));
    assert_eq!(app.selected, 2);

    app.follow_playback_off();
    app.follow(&playing(tracks.clone(), 0));
    assert_eq!(app.selected, 2);

    app.follow_playback_on();
    app.filter_mode = true;
    app.follow(&playing(tracks, 0));
    assert_eq!(app.selected, 2);
}

#[test]
fn follow_ignores_tracks_outside_the_list() {
    let mut app = App::new(vec![t("A"), t("B")]);
    app.set_selected(1);
    app.follow(&playing(vec![t("Z")], 0));
    assert_eq!(app.selected, 1);
}

#[test]
fn jump_to_playing_reads_the_shared_handle() {
    let tracks = vec![t("A"), t("B"), t("C")];
    let mut app = App::new(tracks.clone());
    app.follow_playback_off();

    // Without a handle there is nothing to jump to.
    app.jump_to_playing();
    assert_eq!(app.selected, 0);

    app.set_playback_handle(Arc::new(Mutex::new(playing(tracks, 2))));
    app.jump_to_playing();
    assert_eq!(app.selected, 2);
    assert!(app.follow_playback);
    assert_eq!(app.playback().and_then(|s| s.index), Some(2));
}

#[test]
fn metadata_window_toggles() {
    let mut app = App::new(vec![t("A")]);
    assert!(!app.metadata_window);
    app.toggle_metadata_window();
    assert!(app.metadata_window);
    assert_eq!(app.selected_track().map(|t| t.id.as_str()), Some("A"));
}

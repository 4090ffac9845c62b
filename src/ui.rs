//! UI rendering for the terminal user interface.
//!
//! Everything shown about playback comes from a `PlaybackSnapshot`; the UI
//! never talks to the controller directly.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::App;
use crate::catalog::{Track, display_from_fields};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::player::{PlaybackSnapshot, TransportState};

/// Key bindings in the order they are listed in the footer.
const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("h/l", "prev/next song"),
    ("H/L", ""), // filled from config
    ("enter", "play selected song"),
    ("space/p", "play/pause"),
    ("+/-", "volume"),
    ("gg/G", "top/bottom"),
    ("zz", "jump to playing"),
    ("K", "metadata"),
    ("/", "filter"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating the seek step.
fn controls_text(seek_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| {
            if *k == "H/L" {
                format!("[H/L] seek -/+{seek_seconds}s")
            } else {
                format!("[{k}] {v}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the "now playing" track text according to `ui` settings.
fn now_playing_track_text(track: &Track, ui: &UiSettings) -> String {
    display_from_fields(
        &track.media_url,
        &track.title,
        track.artist.as_deref(),
        track.album.as_deref(),
        &ui.now_playing_track_fields,
        &ui.now_playing_track_separator,
    )
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(elapsed: Duration, total: Option<Duration>, ui: &UiSettings) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    parts.push(format!("-{}", format_mmss(t.saturating_sub(elapsed))));
                }
            }
        }
    }

    (!parts.is_empty()).then(|| parts.join(&ui.now_playing_time_separator))
}

/// The status box line: cursor mode, filter, transport, song, volume and source.
fn status_text(app: &App, snapshot: Option<&PlaybackSnapshot>, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    if app.follow_playback {
        parts.push(" CURSOR: Follow".to_string());
    } else {
        parts.push(" CURSOR: Free-roam".to_string());
    }

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        let mut filter_part = String::from("FILTER:");
        if !q.is_empty() {
            filter_part.push(' ');
            filter_part.push_str(q);
        }
        parts.push(filter_part);
    }

    if let Some(s) = snapshot {
        match (s.state(), s.current_track()) {
            (TransportState::Empty, _) | (_, None) => parts.push("Stopped".to_string()),
            (state, Some(track)) => {
                let song = now_playing_track_text(track, ui);
                match now_playing_time_text(s.elapsed, s.known_duration(), ui) {
                    Some(time) => parts.push(format!("Song: {song} [{time}]")),
                    None => parts.push(format!("Song: {song}")),
                }
                let position = format!("{}/{}", s.index.map_or(0, |i| i + 1), s.queue.len());
                let state = if state == TransportState::Playing {
                    "Playing"
                } else {
                    "Paused"
                };
                parts.push(format!("{state} ({position})"));
            }
        }
        parts.push(format!("Vol: {:.0}%", s.volume * 100.0));
    }

    if let Some(source) = &app.source {
        parts.push(format!("Source: {source}"));
    }

    parts.join(" • ")
}

/// Text of the metadata popup for `track`.
fn metadata_text(track: Option<&Track>) -> String {
    let Some(track) = track else {
        return "No track selected".to_string();
    };
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nGenre: {}\nDuration: {}\nId: {}\nMedia: {}\nCover: {}",
        track.title,
        or_dash(track.artist.as_deref()),
        or_dash(track.album.as_deref()),
        or_dash(track.genre.as_deref()),
        or_dash(track.duration_label.as_deref()),
        track.id,
        track.media_url,
        or_dash(track.cover_url.as_deref()),
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect { x, y, width, height }
}

fn left_padding() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    snapshot: Option<&PlaybackSnapshot>,
    display: &[usize],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" playdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app, snapshot, ui_settings))
        .block(Block::bordered().padding(left_padding()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let q = app.filter_query.trim();
        let query_lower = if !q.is_empty() && app.uses_lower_labels() {
            Some(q.to_ascii_lowercase())
        } else {
            None
        };
        let playing_idx = snapshot.and_then(|s| app.track_index_of(s));

        // Only build ListItems for the visible window, centered on the selection when possible.
        let total = display.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = display[start..end]
            .iter()
            .map(|&i| {
                let label = &app.tracks[i].display;
                let marker = if playing_idx == Some(i) { "♪ " } else { "  " };

                let positions = if q.is_empty() {
                    None
                } else {
                    match query_lower.as_deref() {
                        Some(ql) => app.fuzzy_match_positions_for_track_lower(i, ql),
                        None => App::fuzzy_match_positions(label, q),
                    }
                };

                let Some(positions) = positions else {
                    return ListItem::new(format!("{marker}{label}"));
                };

                // Upper-case the matched characters.
                let mut rendered = String::from(marker);
                let mut pos_iter = positions.into_iter();
                let mut next_pos = pos_iter.next();
                for (ci, ch) in label.chars().enumerate() {
                    if next_pos == Some(ci) {
                        rendered.extend(ch.to_uppercase());
                        next_pos = pos_iter.next();
                    } else {
                        rendered.push(ch);
                    }
                }
                ListItem::new(rendered)
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Overlay metadata popup, kept inside the list area.
    if app.metadata_window {
        let popup_area = centered_rect_sized(80, 10, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let meta_paragraph = Paragraph::new(metadata_text(app.selected_track()))
            .block(
                Block::default()
                    .padding(left_padding())
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padding()),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests;

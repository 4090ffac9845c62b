//! Application model: the browsable track list and cursor state.
//!
//! Playback state is not duplicated here; the `App` only keeps the
//! controller's shared snapshot handle and reads it when it needs to.

use crate::catalog::Track;
use crate::player::{PlaybackHandle, PlaybackSnapshot};

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    /// Index into `tracks` of the highlighted row.
    pub selected: usize,
    pub playback_handle: Option<PlaybackHandle>,

    lower_labels: Option<Vec<String>>,

    /// Keep the cursor on whatever is playing.
    pub follow_playback: bool,

    pub filter_mode: bool,
    pub filter_query: String,
    /// Where the tracks came from, shown in the header.
    pub source: Option<String>,
    pub metadata_window: bool,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        // For larger catalogs, precompute lowercase labels so filtering does
        // not lowercase every label on every keystroke.
        let lower_labels = if tracks.len() > 100 {
            Some(tracks.iter().map(|t| t.display.to_ascii_lowercase()).collect())
        } else {
            None
        };

        Self {
            tracks,
            selected: 0,
            playback_handle: None,
            lower_labels,
            follow_playback: true,
            filter_mode: false,
            filter_query: String::new(),
            source: None,
            metadata_window: false,
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }
    /// Attach the controller's snapshot handle.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }
    pub fn set_source(&mut self, source: String) {
        self.source = Some(source);
    }

    /// Latest published playback snapshot, if a controller is attached.
    pub fn playback(&self) -> Option<PlaybackSnapshot> {
        self.playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|s| s.clone()))
    }

    /// Position in `tracks` of the snapshot's current track (first match by id).
    pub fn track_index_of(&self, snapshot: &PlaybackSnapshot) -> Option<usize> {
        let current = snapshot.current_track()?;
        self.tracks.iter().position(|t| t.id == current.id)
    }

    /// Move the cursor onto the playing track when following playback.
    ///
    /// Does nothing while filtering or when the playing track is not part of
    /// the browsable list (e.g. it came from an earlier catalog).
    pub fn follow(&mut self, snapshot: &PlaybackSnapshot) {
        if !self.follow_playback || self.filter_mode {
            return;
        }
        if let Some(idx) = self.track_index_of(snapshot) {
            if self.selected != idx {
                self.set_selected(idx);
            }
        }
    }

    /// Jump the cursor to the playing track and start following it again.
    pub fn jump_to_playing(&mut self) {
        let Some(snapshot) = self.playback() else {
            return;
        };
        if let Some(idx) = self.track_index_of(&snapshot) {
            self.follow_playback_on();
            self.set_selected(idx);
        }
    }

    /// Indices into `tracks` that are currently visible, in display order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        if query.is_empty() {
            return (0..self.tracks.len()).collect();
        }

        match self.lower_labels.as_deref() {
            Some(lower_labels) => {
                let query_lower = query.to_ascii_lowercase();
                (0..self.tracks.len())
                    .filter(|&i| Self::fuzzy_match_positions_lower(&lower_labels[i], &query_lower).is_some())
                    .collect()
            }
            None => (0..self.tracks.len())
                .filter(|&i| Self::fuzzy_match_positions(&self.tracks[i].display, query).is_some())
                .collect(),
        }
    }

    /// The visible tracks, cloned: this is the queue `Enter` plays in.
    pub fn visible_tracks(&self) -> Vec<Track> {
        self.display_indices()
            .into_iter()
            .map(|i| self.tracks[i].clone())
            .collect()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// Return true if this `App` uses precomputed lowercase labels.
    pub fn uses_lower_labels(&self) -> bool {
        self.lower_labels.is_some()
    }

    /// Fuzzy-match `query_lower` against a specific track by index.
    ///
    /// Returns the character positions that match, or `None` when there is no match.
    pub fn fuzzy_match_positions_for_track_lower(&self, track_index: usize, query_lower: &str) -> Option<Vec<usize>> {
        if query_lower.is_empty() {
            return Some(Vec::new());
        }

        match self.lower_labels.as_deref() {
            Some(lower_labels) => Self::fuzzy_match_positions_lower(&lower_labels[track_index], query_lower),
            None => Self::fuzzy_match_positions(&self.tracks[track_index].display, query_lower),
        }
    }

    /// Next visible index after `current`, wrapping around.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        match display.iter().position(|&i| i == current) {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Previous visible index before `current`, wrapping around.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        match display.iter().position(|&i| i == current) {
            Some(0) | None => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
        }
    }

    /// Set the selected track index and ensure it is visible in the display.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Fuzzy/subsequence match: return the character positions in `label`
    /// that match `query`, or `None` if not matched.
    pub fn fuzzy_match_positions(label: &str, query: &str) -> Option<Vec<usize>> {
        if query.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut label_iter = label.chars().enumerate();

        for qc in query.chars() {
            let qc_low = qc.to_ascii_lowercase();
            loop {
                match label_iter.next() {
                    Some((li, lc)) if lc.to_ascii_lowercase() == qc_low => {
                        positions.push(li);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    fn fuzzy_match_positions_lower(label_lower: &str, query_lower: &str) -> Option<Vec<usize>> {
        if query_lower.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut label_iter = label_lower.chars().enumerate();

        for qc in query_lower.chars() {
            loop {
                match label_iter.next() {
                    Some((li, lc)) if lc == qc => {
                        positions.push(li);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    /// Enter filter mode; the cursor stops following playback while typing.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.follow_playback_off();
        self.ensure_selected_visible();
    }
    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Ensure that `selected` is part of the current filtered view,
    /// otherwise move selection to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }
}

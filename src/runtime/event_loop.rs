use std::io::Stdout;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::player::{MediaBackend, MediaEvent, PlaybackController, PlaybackSnapshot};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Two-key prefix state used for `gg` handling.
    pending_gg: bool,
    /// Two-key prefix state used for `zz` handling.
    pending_zz: bool,
}

impl EventLoopState {
    fn clear_prefixes(&mut self) {
        self.pending_gg = false;
        self.pending_zz = false;
    }
}

/// Main terminal event loop: applies media events, keeps the cursor in sync
/// with playback, draws and handles input. Returns `Ok(())` when quit is requested.
pub fn run<M: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<M>,
    media_events: &Receiver<MediaEvent>,
    updates: &Receiver<PlaybackSnapshot>,
    state: &mut EventLoopState,
) -> crate::Result<()> {
    loop {
        // Outcomes of earlier media calls, in the order they happened.
        while let Ok(ev) = media_events.try_recv() {
            controller.handle_media_event(ev);
        }

        // Only the latest change matters for the cursor.
        if let Some(latest) = updates.try_iter().last() {
            app.follow(&latest);
        }

        let snapshot = controller.snapshot();
        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, Some(&snapshot), &display, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Play the selected track, using the visible list as the queue.
fn play_selected<M: MediaBackend>(app: &mut App, controller: &mut PlaybackController<M>) {
    let Some(track) = app.selected_track().cloned() else {
        return;
    };
    debug!(id = %track.id, "playing selection");
    app.follow_playback_on();
    controller.play_track(track, Some(app.visible_tracks()));
}

fn seek_by<M: MediaBackend>(controller: &mut PlaybackController<M>, seconds: i64) {
    let elapsed = controller.snapshot().elapsed.as_secs_f64();
    controller.seek_to(elapsed + seconds as f64);
}

/// Returns `true` when the user asked to quit.
pub(super) fn handle_key_event<M: MediaBackend>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<M>,
    state: &mut EventLoopState,
) -> bool {
    if app.filter_mode {
        state.clear_prefixes();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char('j' | 'n') if ctrl => app.next(),
            KeyCode::Char('k' | 'p') if ctrl => app.prev(),
            KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
            KeyCode::Enter => {
                if app.display_indices().is_empty() {
                    return false;
                }
                app.exit_filter_mode();
                play_selected(app, controller);
            }
            _ => {}
        }
        return false;
    }

    let seek = settings.controls.seek_seconds.min(i64::MAX as u64) as i64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('g') => {
            state.pending_zz = false;
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
            return false;
        }
        KeyCode::Char('z') => {
            state.pending_gg = false;
            if state.pending_zz {
                state.pending_zz = false;
                app.jump_to_playing();
            } else {
                state.pending_zz = true;
            }
            return false;
        }
        _ => state.clear_prefixes(),
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
        }
        KeyCode::Char('j') => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            let already_playing = controller.is_playing()
                && controller
                    .current_track()
                    .zip(app.selected_track())
                    .is_some_and(|(cur, sel)| cur.id == sel.id);
            if !already_playing {
                play_selected(app, controller);
            }
        }
        KeyCode::Char('p' | ' ') => {
            app.follow_playback_on();
            controller.toggle_play();
        }
        KeyCode::Char('l') => {
            app.follow_playback_on();
            controller.next();
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            controller.prev();
        }
        KeyCode::Char('L') => seek_by(controller, seek),
        KeyCode::Char('H') => seek_by(controller, -seek),
        KeyCode::Char('+' | '=') => controller.set_volume(controller.volume() + step),
        KeyCode::Char('-') => controller.set_volume(controller.volume() - step),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}

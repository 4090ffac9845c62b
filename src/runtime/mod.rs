use std::env;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioBackend;
use crate::catalog::open_source;
use crate::logging;
use crate::player::PlaybackController;

mod event_loop;
mod settings;


/// Track source: the first CLI argument, else `catalog.source`, else the current directory.
fn resolve_source(arg: Option<String>, configured: Option<&str>) -> String {
    arg.or_else(|| configured.map(str::to_string)).unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| ".".to_string())
    })
}

pub fn run() -> crate::Result<()> {
    let (settings, config_warning) = settings::load_settings();

    // Nothing is on screen yet, so a broken log file can still be reported plainly.
    match logging::init(&settings.log) {
        Ok(Some(path)) => info!(path = %path.display(), "logging started"),
        Ok(None) => {}
        Err(e) => eprintln!("playdeck: logging disabled: {e}"),
    }
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    let source = resolve_source(env::args().nth(1), settings.catalog.source.as_deref());
    let tracks = open_source(&source, &settings.library, &settings.catalog)?;
    info!(%source, tracks = tracks.len(), "catalog loaded");

    let (backend, media_events) = AudioBackend::spawn(
        settings.audio.clone(),
        Duration::from_millis(settings.catalog.http_timeout_ms),
    )?;
    let mut controller = PlaybackController::new(backend, settings.player.initial_volume);
    let updates = controller.subscribe();

    let mut app = App::new(tracks);
    app.follow_playback = settings.ui.follow_playback;
    app.set_source(source);
    app.set_playback_handle(controller.handle());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &media_events,
        &updates,
        &mut state,
    );

    // Fade out while the UI is still up.
    controller.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("shut down");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

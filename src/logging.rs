//! File-based `tracing` setup.
//!
//! The terminal belongs to the UI, so log output goes to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LogSettings, xdg_dir};
use crate::error::{Error, Result};

/// Environment variable holding a filter directive that overrides `log.level`.
pub const LOG_ENV: &str = "PLAYDECK_LOG";

/// Configured log file, else `$XDG_STATE_HOME/playdeck/playdeck.log`.
pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(|| {
        xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("playdeck").join("playdeck.log"))
    })
}

fn filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the file being written, if any.
pub fn init(settings: &LogSettings) -> Result<Option<PathBuf>> {
    let Some(path) = log_path(settings) else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(settings))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(Some(path))
}

use crate::config;
use crate::error::Error;

/// Read and validate settings.
pub(super) fn read_settings() -> crate::Result<config::Settings> {
    let settings = config::Settings::load()?;
    settings.validate().map_err(Error::Config)?;
    Ok(settings)
}

/// Load settings, falling back to defaults. The config file is optional, so
/// problems do not prevent startup; they come back as a message to log once
/// logging is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match read_settings() {
        Ok(s) => (s, None),
        Err(e) => (
            config::Settings::default(),
            Some(format!("using default settings: {e}")),
        ),
    }
}

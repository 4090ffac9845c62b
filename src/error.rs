//! Crate-wide error type.
//!
//! Playback itself never fails loudly (media problems become events that the
//! controller recovers from); these errors cover startup concerns such as
//! loading a catalog, talking to the terminal or opening the log file.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or did not validate.
    #[error("config error: {0}")]
    Config(String),

    /// A track source could not be opened or produced no usable records.
    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging error: {0}")]
    Logging(String),
}

impl From<::config::ConfigError> for Error {
    fn from(e: ::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use std::path::Path;
use std::time::Duration;

use crate::config::{CatalogSettings, LibrarySettings};
use crate::error::{Error, Result};

use super::model::Track;
use super::scan::scan;
use super::store::DataStore;

/// Open whatever `source` names: an HTTP data store, a JSON data store file,
/// or a directory of audio files.
pub fn open_source(
    source: &str,
    library: &LibrarySettings,
    catalog: &CatalogSettings,
) -> Result<Vec<Track>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let timeout = Duration::from_millis(catalog.http_timeout_ms);
        return Ok(DataStore::fetch(source, timeout)?.tracks(library));
    }

    let path = Path::new(source);
    if path.is_dir() {
        Ok(scan(path, library))
    } else if path.is_file() {
        Ok(DataStore::from_path(path)?.tracks(library))
    } else {
        Err(Error::Catalog(format!("no such track source: {source}")))
    }
}

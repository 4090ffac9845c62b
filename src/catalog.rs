//! Track sources: everything that hands ordered `Track` records to the player.
//!
//! Two sources exist. A REST-style JSON data store (a local file or an HTTP
//! base URL) whose songs are joined in memory against artists, albums and
//! genres, and a plain directory scan of local audio files.

mod display;
mod model;
mod scan;
mod source;
mod store;

pub use display::{display_from_fields, format_label};
pub use model::Track;
pub use scan::scan;
pub use source::open_source;
pub use store::DataStore;

#[cfg(test)]
mod tests;

mod app;
mod audio;
mod catalog;
mod config;
mod error;
mod logging;
mod player;
mod runtime;
mod ui;

#[cfg(test)]
mod test_support;

use error::Result;

fn main() -> Result<()> {
    runtime::run()
}

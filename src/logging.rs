use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Environment variable holding the log filter, e.g. `flappy_board=debug`.
pub const LOG_ENV: &str = "FLAPPY_BOARD_LOG";

/// Sends `tracing` output to `path`. The terminal belongs to the game, so
/// nothing is logged to stdout or stderr.
pub fn init(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

//! Error types shared by the library side of the game.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for fallible game operations outside the simulation.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong around the simulation: files, settings,
/// terminal. The simulation itself has no error states.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("invalid player name: {0}")]
    InvalidPlayerName(String),

    #[error("could not determine a home directory for data and config files")]
    NoProjectDirs,

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.into(),
            source,
        }
    }
}

//! The local best score, kept across sessions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Where the best score lives. Reads never fail: anything missing or
/// unreadable counts as 0.
pub trait HighScoreStore {
    fn load(&self) -> u32;

    fn store(&mut self, score: u32) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// `{"high_score": n}` on disk.
#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: PathBuf,
}

impl FileHighScore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<u32> {
        let text = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let file: HighScoreFile =
            serde_json::from_str(&text).map_err(|e| Error::json(&self.path, e))?;
        Ok(file.high_score)
    }
}

impl HighScoreStore for FileHighScore {
    fn load(&self) -> u32 {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no high score yet");
            return 0;
        }
        match self.read() {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable high score");
                0
            }
        }
    }

    fn store(&mut self, score: u32) -> Result<()> {
        let json = serde_json::to_string_pretty(&HighScoreFile { high_score: score })
            .map_err(|e| Error::json(&self.path, e))?;
        write_atomic(&self.path, json.as_bytes())?;
        debug!(score, path = %self.path.display(), "high score saved");
        Ok(())
    }
}

/// Writes to a sibling temp file and renames it over `path`, so a crash never
/// leaves a half-written file behind.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|e| Error::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(path, e))
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    score: u32,
}

impl MemoryHighScore {
    pub fn new(score: u32) -> Self {
        Self { score }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn load(&self) -> u32 {
        self.score
    }

    fn store(&mut self, score: u32) -> Result<()> {
        self.score = score;
        Ok(())
    }
}

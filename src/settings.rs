//! Tunable game constants, layered from defaults, an optional `config.yaml`
//! and `FLAPPY_BOARD__*` environment variables.

use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::leaderboard::DEFAULT_TOP_N;

pub const ENV_PREFIX: &str = "FLAPPY_BOARD";
const CONFIG_FILE: &str = "config.yaml";

// ── Sections ────────────────────────────────────────────────────────────────

/// Size of the simulated world. Everything in the simulation is expressed in
/// these units; the renderer scales them onto whatever the terminal offers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdSettings {
    pub x: f64,
    pub start_y: f64,
    pub width: f64,
    pub height: f64,
    /// Added to the velocity once per tick.
    pub gravity: f64,
    /// Velocity set (not added) by a flap. Negative is up.
    pub flap_velocity: f64,
}

impl Default for BirdSettings {
    fn default() -> Self {
        Self {
            x: 80.0,
            start_y: 250.0,
            width: 34.0,
            height: 24.0,
            gravity: 0.5,
            flap_velocity: -8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeSettings {
    pub width: f64,
    /// Vertical opening between the top and bottom pipe.
    pub gap: f64,
    pub min_height: f64,
    /// `max_height = playfield.height - bottom_margin`.
    pub bottom_margin: f64,
    /// Leftward movement per tick.
    pub scroll_speed: f64,
    /// A pipe spawns every `spawn_period` frames.
    pub spawn_period: u64,
}

impl Default for PipeSettings {
    fn default() -> Self {
        Self {
            width: 60.0,
            gap: 150.0,
            min_height: 50.0,
            bottom_margin: 200.0,
            scroll_speed: 2.0,
            spawn_period: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    /// Display name used for submissions. Without one, scores stay local.
    pub player_name: Option<String>,
    pub top_n: usize,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            player_name: None,
            top_n: DEFAULT_TOP_N,
        }
    }
}

// ── Settings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playfield: Playfield,
    pub bird: BirdSettings,
    pub pipes: PipeSettings,
    /// Target frame period of the host loop.
    pub frame_millis: u64,
    /// Fixed seed for pipe heights; random when absent.
    pub seed: Option<u64>,
    pub sound: bool,
    pub leaderboard: LeaderboardSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            bird: BirdSettings::default(),
            pipes: PipeSettings::default(),
            frame_millis: 16,
            seed: None,
            sound: true,
            leaderboard: LeaderboardSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from `config_file` (or the default config location) and
    /// the process environment.
    pub fn load(dirs: &AppDirs, config_file: Option<&Path>) -> Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (dirs.config_file(), false),
        };
        if !required && !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
        }
        Self::from_sources(Some((&path, required)), None)
    }

    /// Builds settings from an optional YAML file and an environment map.
    /// `env = None` reads the real process environment.
    pub fn from_sources(
        file: Option<(&Path, bool)>,
        env: Option<Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some((path, required)) = file {
            let source = File::from(path).format(FileFormat::Yaml).required(required);
            builder = builder.add_source(source);
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Highest top-pipe height a spawn may draw.
    pub fn max_pipe_height(&self) -> f64 {
        self.playfield.height - self.pipes.bottom_margin
    }

    /// Rejects geometry the simulation cannot honour.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidSettings(msg));
        let Playfield { width, height } = self.playfield;

        if width <= 0.0 || height <= 0.0 {
            return invalid(format!("playfield must be positive, got {width}x{height}"));
        }
        if self.bird.width <= 0.0 || self.bird.height <= 0.0 {
            return invalid("bird size must be positive".into());
        }
        if self.bird.start_y < 0.0 || self.bird.start_y + self.bird.height > height {
            return invalid(format!("bird start_y {} is outside the playfield", self.bird.start_y));
        }
        if self.pipes.width <= 0.0 || self.pipes.gap <= 0.0 {
            return invalid("pipe width and gap must be positive".into());
        }
        if self.pipes.spawn_period == 0 {
            return invalid("pipes.spawn_period must be at least 1".into());
        }
        if self.pipes.scroll_speed <= 0.0 {
            return invalid("pipes.scroll_speed must be positive".into());
        }
        let max = self.max_pipe_height();
        if self.pipes.min_height < 0.0 || max.floor() < self.pipes.min_height.ceil() {
            return invalid(format!(
                "pipe height range [{}, {max}] is empty",
                self.pipes.min_height
            ));
        }
        if max + self.pipes.gap > height {
            return invalid(format!("a gap of {} does not fit below a {max} pipe", self.pipes.gap));
        }
        if self.frame_millis == 0 {
            return invalid("frame_millis must be at least 1".into());
        }
        if self.leaderboard.top_n == 0 {
            return invalid("leaderboard.top_n must be at least 1".into());
        }
        Ok(())
    }
}

// ── Directories ─────────────────────────────────────────────────────────────

/// Platform locations for configuration and saved data.
#[derive(Debug, Clone)]
pub struct AppDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppDirs {
    pub fn discover() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "flappy-board").ok_or(Error::NoProjectDirs)?;
        Ok(Self::at(dirs.config_dir(), dirs.data_dir()))
    }

    pub fn at(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn high_score_file(&self) -> PathBuf {
        self.data_dir.join("high_score.json")
    }

    pub fn leaderboard_file(&self) -> PathBuf {
        self.data_dir.join("leaderboard.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("flappy-board.log")
    }

    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.config_dir, &self.data_dir] {
            std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn defaults_are_the_classic_constants() {
        let s = Settings::default();
        assert_eq!(s.bird.gravity, 0.5);
        assert_eq!(s.bird.flap_velocity, -8.0);
        assert_eq!(s.pipes.spawn_period, 90);
        assert_eq!(s.max_pipe_height(), 400.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn empty_sources_give_defaults() {
        let s = Settings::from_sources(None, env(&[])).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn yaml_file_overrides_single_fields() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "pipes:\n  gap: 180\nleaderboard:\n  player_name: ada").unwrap();

        let s = Settings::from_sources(Some((file.path(), true)), env(&[])).unwrap();
        assert_eq!(s.pipes.gap, 180.0);
        assert_eq!(s.pipes.width, 60.0);
        assert_eq!(s.leaderboard.player_name.as_deref(), Some("ada"));
    }

    #[test]
    fn environment_overrides_file() {
        let s = Settings::from_sources(
            None,
            env(&[("FLAPPY_BOARD__BIRD__GRAVITY", "0.25"), ("FLAPPY_BOARD__SEED", "7")]),
        )
        .unwrap();
        assert_eq!(s.bird.gravity, 0.25);
        assert_eq!(s.seed, Some(7));
    }

    #[test]
    fn missing_optional_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        assert!(Settings::from_sources(Some((&path, false)), env(&[])).is_ok());
        assert!(Settings::from_sources(Some((&path, true)), env(&[])).is_err());
    }

    #[test]
    fn rejects_impossible_geometry() {
        let mut s = Settings::default();
        s.pipes.spawn_period = 0;
        assert!(matches!(s.validate(), Err(Error::InvalidSettings(_))));

        let mut s = Settings::default();
        s.pipes.bottom_margin = 580.0;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.pipes.gap = 250.0;
        assert!(s.validate().is_err());
    }
}

//! Runtime settings (`arena.toml`).
//!
//! Gameplay tables are compiled in; this file only covers how the front end
//! runs: preselected difficulty, frame rate, RNG seed and logging. Every
//! field is optional and a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::tuning::Difficulty;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "ARENA_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "arena.toml";

const MAX_FPS: u32 = 240;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty highlighted in the menu (default: normal)
    pub difficulty: Difficulty,
    /// Target frames per second (default: 30, range: 1-240)
    pub fps: u32,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive; `RUST_LOG` wins when set
    pub filter: String,
    pub file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            fps: 30,
            seed: None,
            log: LogSettings::default(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: PathBuf::from("arena_shooter.log"),
        }
    }
}

impl Settings {
    /// Load from `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let settings = toml::from_str::<Settings>(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_FPS).contains(&self.fps) {
            return Err(ConfigError::Invalid {
                field: "fps",
                reason: format!("{} is outside 1..={MAX_FPS}", self.fps),
            });
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log.filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Wall-clock length of one frame; also the simulation `dt`.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.fps.max(1)))
    }
}

/// `$ARENA_CONFIG`, or `arena.toml` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

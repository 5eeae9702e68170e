//! Application settings: YAML file, then command-line overrides

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::game::GameConfig;

const APP_DIR: &str = "grid_snake";

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    /// Where user profiles are persisted
    pub profiles_path: PathBuf,
    /// Log output; the terminal itself belongs to the game screen
    pub log_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let dir = data_dir();
        Self {
            game: GameConfig::default(),
            profiles_path: dir.join("profiles.json"),
            log_path: dir.join("grid_snake.log"),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.profiles_path.as_os_str().is_empty() {
            return Err("Profiles path must not be empty".to_string());
        }
        Ok(())
    }
}

impl AppConfig {
    /// Read settings from a YAML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read config {:?}", path));
            }
        };
        let config: AppConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.ensure_valid()?;
        Ok(config)
    }

    pub fn ensure_valid(&self) -> Result<()> {
        if let Err(reason) = self.validate() {
            bail!("Config validation error: {}", reason);
        }
        Ok(())
    }
}

/// Per-user data directory, or the working directory when none is known
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

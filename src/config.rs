//! User settings, read from `config.toml` in the data directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::review::clock::DEFAULT_TICK_INTERVAL;
use crate::review::round::DEFAULT_ROUND_DURATION;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Data directory not found")]
    DataDirNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ticks in one round
    pub round_duration: u32,
    /// Length of one tick in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_duration: DEFAULT_ROUND_DURATION,
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "config.toml";

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
        dirs::data_local_dir()
            .map(|p| p.join("memocards"))
            .ok_or(ConfigError::DataDirNotFound)
    }

    /// Load `config.toml` from `data_dir`, falling back to defaults when
    /// the file does not exist
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(Self::FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {:?}: {:?}", path, config);
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.round_duration == 0 {
            return Err(ConfigError::Invalid(
                "round_duration must be at least 1".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.round_duration, 100);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(Config::FILE_NAME), "round_duration = 30\n").unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.round_duration, 30);
        assert_eq!(config.tick_interval_ms, 1000);
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(Config::FILE_NAME), "round_duration = 0\n").unwrap();

        let err = Config::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_toml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(Config::FILE_NAME), "round_duration = \"soon\"\n").unwrap();

        let err = Config::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}

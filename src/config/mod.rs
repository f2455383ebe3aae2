//! Configuration module for toolshelf.
//!
//! Handles loading `~/.toolshelf/config.toml`. Every key is optional;
//! a missing file yields the defaults.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{DEFAULT_API_URL, DEFAULT_LISTING_OWNER, DEFAULT_LISTING_REPO};
use crate::installer::DEFAULT_SOURCE_LANGUAGE;
use crate::logging::LogConfig;

/// Maximum config file size (64KB).
const MAX_FILE_SIZE: u64 = 64 * 1024;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// File too large.
    #[error("Config file too large (max {MAX_FILE_SIZE} bytes)")]
    FileTooLarge,
}

/// Returns the toolshelf data directory (`~/.toolshelf`).
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".toolshelf")
}

/// Returns the default config file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `<category>/<tool>/` installs.
    pub installation_root: PathBuf,
    /// Owner of the catalog repository.
    pub listing_owner: String,
    /// Name of the catalog repository.
    pub listing_repo: String,
    /// Language a gist file must declare to be installed.
    pub source_language: String,
    /// GitHub REST API root.
    pub api_url: String,
    /// Directory for downloaded archives.
    pub temp_dir: PathBuf,
    /// HTTP timeout in seconds; 0 disables it.
    pub request_timeout_secs: u64,
    /// Logging settings.
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            installation_root: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Documents")
                .join("bin"),
            listing_owner: DEFAULT_LISTING_OWNER.to_string(),
            listing_repo: DEFAULT_LISTING_REPO.to_string(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            temp_dir: env::temp_dir().join("toolshelf"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Loads the config from `path`, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let metadata = fs::metadata(path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(ConfigError::FileTooLarge);
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses config file content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.log.level = LogConfig::parse_level(&config.log.level);
        Ok(config)
    }

    /// Returns the HTTP timeout, `None` if disabled.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Returns a config rooted at `installation_root`, otherwise default.
    #[must_use]
    pub fn with_installation_root(mut self, installation_root: PathBuf) -> Self {
        assert!(
            !installation_root.as_os_str().is_empty(),
            "Installation root must not be empty"
        );
        self.installation_root = installation_root;
        self
    }

    /// Sets the archive download directory.
    #[must_use]
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listing_owner, "Pythonista-Tools");
        assert_eq!(config.listing_repo, "Pythonista-Tools");
        assert_eq!(config.source_language, "Python");
        assert_eq!(config.api_url, "https://api.github.com");
        assert!(config.installation_root.ends_with("Documents/bin"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
            installation_root = "/opt/tools"
            source_language = "Ruby"
            request_timeout_secs = 0

            [log]
            level = "WARNING"
            "#,
        )
        .unwrap();

        assert_eq!(config.installation_root, PathBuf::from("/opt/tools"));
        assert_eq!(config.source_language, "Ruby");
        assert_eq!(config.listing_owner, "Pythonista-Tools");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.log.level, "warn");
        assert!(config.log.enabled);
    }

    #[test]
    fn test_parse_invalid_config() {
        assert!(matches!(
            Config::parse("installation_root = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "listing_owner = \"someone\"").unwrap();
        writeln!(file, "listing_repo = \"catalog\"").unwrap();
        file.flush().unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.listing_owner, "someone");
        assert_eq!(config.listing_repo, "catalog");
    }
}

//! Configuration file support for episode-browser.
//!
//! This module provides functionality for loading and saving user preferences
//! from a TOML configuration file.

use crate::error::{AppError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Published location of the episode dataset.
pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/sweko/internet-programming-a98db973kwl8xp1lz94kjf0bma5pez8c/refs/heads/main/data/doctor-who-episodes.json";

/// User configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL of the episode dataset JSON
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory holding the classic/modern/recent era images
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Sort the filtered view instead of the full dataset
    #[serde(default)]
    pub compose_filter_and_sort: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_assets_dir() -> String {
    "images".to_string()
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self {
            source_url: default_source_url(),
            timeout_secs: default_timeout_secs(),
            assets_dir: default_assets_dir(),
            compose_filter_and_sort: false,
        }
    }

    /// Get the path to the config file.
    ///
    /// Returns ~/.config/episode-browser/config.toml on Linux,
    /// or a platform-appropriate location on other systems.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
            })?
            .join("episode-browser");

        Ok(config_dir.join("config.toml"))
    }

    /// Default log file used while the TUI owns the terminal.
    ///
    /// Returns ~/.cache/episode-browser/episode-browser.log on Linux.
    pub fn get_log_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not find cache directory")
        })?;

        Ok(cache_dir.join("episode-browser").join("episode-browser.log"))
    }

    /// Load config from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load config from `path`, or defaults if there is no file there.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a config from TOML text, validating the values.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.source_url.trim().is_empty() {
            return Err(AppError::Config("source_url must not be empty".to_string()));
        }
        if config.timeout_secs == 0 {
            return Err(AppError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Write config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write a default config to `path` unless a file is already there.
    ///
    /// Returns whether a file was written.
    pub fn create_default_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        Self::new().save_to(path)?;
        Ok(true)
    }

    /// Create the default config file if one doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn create_default_if_missing() -> Result<PathBuf> {
        let path = Self::get_config_path()?;
        if Self::create_default_at(&path)? {
            info!("Wrote default config to {}", path.display());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_has_defaults() {
        let config = Config::new();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.assets_dir, "images");
        assert!(!config.compose_filter_and_sort);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            source_url: "http://localhost:8000/episodes.json".to_string(),
            timeout_secs: 5,
            assets_dir: "/srv/images".to_string(),
            compose_filter_and_sort: true,
        };

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("source_url = \"http://localhost:8000/episodes.json\""));
        assert!(toml_str.contains("timeout_secs = 5"));
        assert!(toml_str.contains("assets_dir = \"/srv/images\""));
        assert!(toml_str.contains("compose_filter_and_sort = true"));
    }

    #[test]
    fn test_config_partial_deserialization() {
        // Only specify some fields, rest should use defaults
        let config = Config::from_toml("compose_filter_and_sort = true").unwrap();
        assert!(config.compose_filter_and_sort);
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let err = Config::from_toml("timeout_secs = 0").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        let err = Config::from_toml("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("episode-browser-{}-{}", name, std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_create_default_then_load() {
        let path = scratch_path("init");
        let _ = fs::remove_dir_all(path.parent().unwrap());

        assert!(Config::create_default_at(&path).unwrap());
        assert!(!Config::create_default_at(&path).unwrap());

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(loaded.timeout_secs, 30);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_create_default_keeps_existing_file() {
        let path = scratch_path("keep");
        let _ = fs::remove_dir_all(path.parent().unwrap());

        let mut config = Config::new();
        config.compose_filter_and_sort = true;
        config.save_to(&path).unwrap();

        assert!(!Config::create_default_at(&path).unwrap());
        assert!(Config::load_from(&path).unwrap().compose_filter_and_sort);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let config = Config::load_from(&scratch_path("missing")).unwrap();
        assert_eq!(config.assets_dir, "images");
    }

    #[test]
    fn test_log_path_sits_under_app_dir() {
        if let Ok(path) = Config::get_log_path() {
            assert!(path.ends_with("episode-browser/episode-browser.log"));
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.assets_dir, "images");
    }
}

//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `fridge.toml` in the working directory unless another path is
//! given. Every field has a sensible default so the file is optional.
//! Environment variables take precedence over file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Config file read when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "fridge.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where inventory and credential documents are kept.
    pub storage: StorageConfig,
    /// Barcode database settings.
    pub lookup: LookupConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Local storage configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per persisted document.
    pub data_dir: PathBuf,
}

/// Barcode lookup configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the upcdatabase.org-compatible API.
    pub base_url: String,
    /// Transport timeout for one lookup, in seconds.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FRIDGE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("FRIDGE_LOOKUP_URL") {
            self.lookup.base_url = val;
        }
        if let Ok(val) = std::env::var("FRIDGE_LOOKUP_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.lookup.timeout_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("FRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.data_dir must not be empty".to_string(),
            ));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "lookup.timeout_secs must be non-zero".to_string(),
            ));
        }
        if !(self.lookup.base_url.starts_with("http://")
            || self.lookup.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "lookup.base_url must be an http(s) URL, got {:?}",
                self.lookup.base_url
            )));
        }
        Ok(())
    }
}

impl LookupConfig {
    /// Transport timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("fridge-data"),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: fridge_app::services::product_lookup::DEFAULT_BASE_URL.to_string(),
            timeout_secs: fridge_adapter_http_reqwest::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "fridge=info,fridge_app=info,warn".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.data_dir, PathBuf::from("fridge-data"));
        assert_eq!(config.lookup.base_url, "https://api.upcdatabase.org");
        assert_eq!(
            config.lookup.timeout(),
            fridge_adapter_http_reqwest::DEFAULT_TIMEOUT
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.lookup.timeout_secs, 10);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [storage]
            data_dir = '/var/lib/fridge'

            [lookup]
            base_url = 'http://localhost:8080'
            timeout_secs = 3

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/fridge"));
        assert_eq!(config.lookup.base_url, "http://localhost:8080");
        assert_eq!(config.lookup.timeout_secs, 3);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [lookup]
            timeout_secs = 30
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.lookup.timeout_secs, 30);
        assert_eq!(config.lookup.base_url, "https://api.upcdatabase.org");
        assert_eq!(config.storage.data_dir, PathBuf::from("fridge-data"));
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.lookup.timeout_secs, 10);
    }

    #[test]
    fn should_reject_zero_timeout() {
        let mut config = Config::default();
        config.lookup.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_non_http_base_url() {
        let mut config = Config::default();
        config.lookup.base_url = "ftp://example.org".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_empty_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}

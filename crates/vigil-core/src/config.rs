//! Configuration management for Vigil.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/vigil/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    /// General application settings
    pub general: GeneralConfig,
    /// Check run behavior
    pub checking: CheckingConfig,
    /// HTTP fetch behavior
    pub fetch: FetchConfig,
    /// Snapshot and record storage locations
    pub storage: StorageConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log filter directive passed to the subscriber (e.g. "vigil=debug")
    pub log_filter: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
        }
    }
}

/// Check run behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckingConfig {
    /// Maximum number of checks in flight concurrently
    pub concurrency_limit: usize,
    /// Minutes between periodic check runs
    pub interval_minutes: u32,
}

impl Default for CheckingConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 4,
            interval_minutes: 60,
        }
    }
}

/// HTTP fetch behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every fetch
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 ",
                "(KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36"
            )
            .to_string(),
        }
    }
}

/// Snapshot and record storage locations.
///
/// Empty paths mean "use the platform data directory".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding baseline/latest snapshot files
    pub snapshot_dir: Option<PathBuf>,
    /// Path to the SQLite site database
    pub database_path: Option<PathBuf>,
}

impl VigilConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `VIGIL_CONCURRENCY`: Override the check concurrency limit
    /// - `VIGIL_CHECK_INTERVAL_MINUTES`: Override the periodic check interval
    /// - `VIGIL_FETCH_TIMEOUT_SECS`: Override the per-request fetch timeout
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("VIGIL_CONCURRENCY") {
            if let Ok(limit) = val.parse() {
                config.checking.concurrency_limit = limit;
                tracing::debug!("Override concurrency_limit from env: {}", limit);
            }
        }

        if let Ok(val) = std::env::var("VIGIL_CHECK_INTERVAL_MINUTES") {
            if let Ok(minutes) = val.parse() {
                config.checking.interval_minutes = minutes;
                tracing::debug!("Override interval_minutes from env: {}", minutes);
            }
        }

        if let Ok(val) = std::env::var("VIGIL_FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.fetch.timeout_secs = secs;
                tracing::debug!("Override fetch timeout_secs from env: {}", secs);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to the default path, creating directories as
    /// needed.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;
        tracing::info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Validate configuration constraints.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for out-of-range values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.checking.concurrency_limit < 1 {
            return Err(ConfigError::InvalidValue {
                field: "checking.concurrency_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.checking.interval_minutes < 1 {
            return Err(ConfigError::InvalidValue {
                field: "checking.interval_minutes".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.fetch.timeout_secs < 1 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the configuration file.
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("io", "vigil", "vigil").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Platform data directory used when `storage` paths are unset.
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("io", "vigil", "vigil").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Effective snapshot directory, honoring the configured override.
    pub fn snapshot_dir(&self) -> ConfigResult<PathBuf> {
        match &self.storage.snapshot_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("snapshots")),
        }
    }

    /// Effective database path, honoring the configured override.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        match &self.storage.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("vigil.db")),
        }
    }
}

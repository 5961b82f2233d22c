//! Configuration file support for JadeScroll.
//!
//! Holds user preferences and the save timing knobs. The configuration is
//! stored as JSON: in local storage for the browser build, in the user's
//! config directory for the native build.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::constants::{
    CONFIG_KEY, DEFAULT_BLUR_MIN_MS, DEFAULT_DEBOUNCE_MS, DEFAULT_ERROR_RESET_MS,
    DEFAULT_HEARTBEAT_MS, DEFAULT_SAVED_RESET_MS, DEFAULT_STALE_AFTER_MS, DEFAULT_THROTTLE_MS,
};
use crate::save::{LocalStore, StorageError};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Convert to the log crate's Level, for loggers that take one.
    pub fn to_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Save timing knobs
    #[serde(default)]
    pub timings: SaveTimings,
}

fn default_app_name() -> String {
    "JadeScroll".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Show "saving" as soon as the user types, before the debounced save
    /// has checked whether anything changed.
    #[serde(default)]
    pub optimistic_status: bool,
}

/// Timing knobs of the autosave system, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveTimings {
    /// Quiet period before a debounced save runs
    pub debounce_ms: u64,
    /// Input handler throttle window
    pub throttle_ms: u64,
    /// Heartbeat period
    pub heartbeat_ms: u64,
    /// Heartbeat forces a save only when the last save is older than this
    pub stale_after_ms: u64,
    /// Leaving a field saves only when the last save is older than this
    pub blur_min_ms: u64,
    /// "saved" reverts to "ready" after this long
    pub saved_reset_ms: u64,
    /// "error" reverts to "ready" after this long
    pub error_reset_ms: u64,
}

impl SaveTimings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    pub fn blur_min(&self) -> Duration {
        Duration::from_millis(self.blur_min_ms)
    }

    pub fn saved_reset(&self) -> Duration {
        Duration::from_millis(self.saved_reset_ms)
    }

    pub fn error_reset(&self) -> Duration {
        Duration::from_millis(self.error_reset_ms)
    }
}

impl Default for SaveTimings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            throttle_ms: DEFAULT_THROTTLE_MS,
            heartbeat_ms: DEFAULT_HEARTBEAT_MS,
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            blur_min_ms: DEFAULT_BLUR_MIN_MS,
            saved_reset_ms: DEFAULT_SAVED_RESET_MS,
            error_reset_ms: DEFAULT_ERROR_RESET_MS,
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            timings: SaveTimings::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "jadescroll-config.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("jadescroll").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("jadescroll")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Try to load configuration from a key-value store.
    /// Returns None if not found or can't be parsed.
    pub fn load_from_store(store: &dyn LocalStore) -> Option<Self> {
        match store.get(CONFIG_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from local storage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from local storage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in local storage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read config from local storage: {}", e);
                None
            }
        }
    }

    /// Save configuration to a key-value store.
    pub fn save_to_store(&self, store: &mut dyn LocalStore) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        store.set(CONFIG_KEY, &json)?;
        log::info!("Saved configuration to local storage");
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Local storage error
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemoryStore;

    #[test]
    fn test_defaults_match_autosave_timings() {
        let timings = SaveTimings::default();
        assert_eq!(timings.debounce(), Duration::from_secs(3));
        assert_eq!(timings.throttle(), Duration::from_millis(500));
        assert_eq!(timings.heartbeat(), Duration::from_secs(60));
        assert_eq!(timings.saved_reset(), Duration::from_secs(4));
        assert_eq!(timings.error_reset(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            AppConfig::from_json(r#"{"version":1,"timings":{"debounce_ms":1000}}"#).unwrap();
        assert_eq!(config.timings.debounce_ms, 1000);
        assert_eq!(config.timings.throttle_ms, DEFAULT_THROTTLE_MS);
        assert_eq!(config.app_name, "JadeScroll");
        assert!(!config.preferences.optimistic_status);
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = AppConfig::from_json(r#"{"version":99}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                ..
            }
        ));
    }

    #[test]
    fn test_store_persistence() {
        let mut store = MemoryStore::new();
        let mut config = AppConfig::new();
        config.preferences.log_level = LogLevel::Trace;
        config.save_to_store(&mut store).unwrap();

        let loaded = AppConfig::load_from_store(&store).unwrap();
        assert_eq!(loaded.preferences.log_level, LogLevel::Trace);
    }

    #[test]
    fn test_store_garbage_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(CONFIG_KEY, "not json").unwrap();
        assert!(AppConfig::load_from_store(&store).is_none());
    }
}

//! Audioshelf configuration
//!
//! Each concern owns a section implementing `ConfigSection`. Sections are
//! serialized together into a single `config.toml`.
//!
//! - Invalid files on disk are reported, never silently rewritten
//! - Writes go through a temporary file and an atomic rename
//! - Environment variables (`AUDIOSHELF_*`) override file values
//!
//! # Example
//!
//! ```rust,no_run
//! use audioshelf_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load_or_default();
//! println!("Covers live in {}", manager.covers_dir(&config).display());
//! ```

mod error;
mod manager;
mod persistence;
pub mod validation;

// Config sections
pub mod app_config;
pub mod playback_config;
pub mod storage_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use validation::ConfigSection;

pub use app_config::{AppConfig, LogLevel};
pub use playback_config::PlaybackConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Application-level settings
    pub app: AppConfig,

    /// Audio controls and their defaults
    pub playback: PlaybackConfig,

    /// Book record and cover locations
    pub storage: StorageConfig,
}

impl Config {
    /// Every broken field rule, across all sections
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = [
            self.app.validate(),
            self.playback.validate(),
            self.storage.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .flatten()
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Merges this config with another, preferring values from `other`
    ///
    /// Override chain: defaults < file < env vars
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.playback.merge(other.playback);
        self.storage.merge(other.storage);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            playback: PlaybackConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

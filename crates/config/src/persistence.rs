//! Reading and writing `config.toml`
//!
//! Load rules:
//! - no file: defaults
//! - blank file or bad TOML: error, the file is left alone
//! - rule violations: returned as-is with a warning, so one bad field does
//!   not discard the rest
//!
//! Save rules: refuse invalid configs, keep the previous file as
//! `config.toml.backup`, replace the file by atomic rename.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    fn backup_path(&self) -> PathBuf {
        self.config_path.with_extension("toml.backup")
    }

    pub fn load(&self) -> ConfigResult<Config> {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "No config at {}, using defaults",
                    self.config_path.display()
                );
                return Ok(Config::default());
            }
            Err(e) => return Err(ConfigError::io("Cannot read", &self.config_path, e)),
        };

        if contents.trim().is_empty() {
            return Err(ConfigError::io(
                "Cannot read",
                &self.config_path,
                io::Error::new(io::ErrorKind::InvalidData, "file is blank"),
            ));
        }

        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.config_path.clone(),
            source,
        })?;

        if config.version != CONFIG_VERSION {
            log::warn!(
                "{} has version {}, expected {}",
                self.config_path.display(),
                config.version,
                CONFIG_VERSION
            );
        }
        if let Err(errors) = config.validate() {
            for error in &errors {
                log::warn!("{}: {}", self.config_path.display(), error);
            }
        }

        Ok(config)
    }

    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        config.validate().map_err(ConfigError::Invalid)?;
        let encoded = toml::to_string_pretty(config)?;

        let dir = match self.config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| ConfigError::io("Cannot create", dir, e))?;
            log::info!("Created config directory {}", dir.display());
        }

        if self.config_path.exists() {
            let backup = self.backup_path();
            fs::copy(&self.config_path, &backup)
                .map_err(|e| ConfigError::io("Cannot back up to", &backup, e))?;
        }

        // Same directory as the target so the rename cannot cross filesystems
        let mut staged =
            NamedTempFile::new_in(dir).map_err(|e| ConfigError::io("Cannot stage in", dir, e))?;
        staged
            .write_all(encoded.as_bytes())
            .and_then(|()| staged.flush())
            .map_err(|e| ConfigError::io("Cannot write", &self.config_path, e))?;
        staged
            .persist(&self.config_path)
            .map_err(|e| ConfigError::io("Cannot replace", &self.config_path, e.error))?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }
}

//! Configuration manager - main API for config operations

use crate::persistence::ConfigPersistence;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const ENV_LOG_LEVEL: &str = "AUDIOSHELF_APP_LOG_LEVEL";
const ENV_DEFAULT_SPEED: &str = "AUDIOSHELF_PLAYBACK_DEFAULT_SPEED";
const ENV_DATA_DIR: &str = "AUDIOSHELF_STORAGE_DATA_DIR";
const ENV_COVERS_DIR: &str = "AUDIOSHELF_STORAGE_COVERS_DIR";

/// Main configuration manager
///
/// Owns the location of `config.toml` and the platform data directory that
/// storage paths resolve against.
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager using the platform directories
    ///
    /// - Linux: `~/.config/audioshelf/` and `~/.local/share/audioshelf/`
    /// - macOS: `~/Library/Application Support/audioshelf/`
    /// - Windows: `%APPDATA%\audioshelf\`
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "audioshelf").ok_or(ConfigError::NoConfigDir)?;

        Ok(Self::with_directories(
            dirs.config_dir().to_path_buf(),
            dirs.data_dir().to_path_buf(),
        ))
    }

    /// Creates a config manager rooted at a single directory
    ///
    /// Both the config file and the data directory live under `dir`.
    pub fn with_directory(dir: PathBuf) -> ConfigResult<Self> {
        Ok(Self::with_directories(dir.clone(), dir))
    }

    fn with_directories(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        let persistence = ConfigPersistence::new(config_dir.join("config.toml"));
        Self {
            persistence,
            config_dir,
            data_dir,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Data directory, honoring `storage.data_dir`
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config
            .storage
            .data_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.clone())
    }

    /// Directory holding one JSON record per book
    pub fn books_dir(&self, config: &Config) -> PathBuf {
        self.data_dir(config).join(&config.storage.books_dir_name)
    }

    /// Directory holding `<book id>.jpg` cover images
    pub fn covers_dir(&self, config: &Config) -> PathBuf {
        match &config.storage.covers_dir {
            Some(dir) => dir.clone(),
            None => self.data_dir(config).join(&config.storage.covers_dir_name),
        }
    }

    /// Loads the configuration from file
    ///
    /// A missing file yields the defaults. A corrupted file is an error.
    pub fn load(&self) -> ConfigResult<Config> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e);
                Config::default()
            }
        }
    }

    /// Validates and atomically writes the configuration
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads, applies `update_fn`, and saves
    ///
    /// ```rust,no_run
    /// # use audioshelf_config::ConfigManager;
    /// # let manager = ConfigManager::new().unwrap();
    /// manager.update(|config| {
    ///     config.playback.default_speed = 1.25;
    /// }).expect("Failed to update config");
    /// ```
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)
    }

    /// Writes a default config file if none exists
    ///
    /// Returns Ok(true) if a new file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::debug!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.save(&Config::default())?;
        log::info!("Generated default config at {}", self.config_path().display());
        Ok(true)
    }

    /// Overwrites the config file with default values
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Validates the current configuration file
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the file and applies `AUDIOSHELF_SECTION_FIELD` environment overrides
    ///
    /// Example: `AUDIOSHELF_PLAYBACK_DEFAULT_SPEED=1.5`
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Config validation warnings after env overrides: {:?}",
                errors
            );
        }

        Ok(config)
    }
}

/// Applies overrides from `lookup`; unparsable values are logged and skipped
fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        match value.parse::<LogLevel>() {
            Ok(level) => config.app.log_level = level,
            Err(e) => log::warn!("Ignoring {}: {}", ENV_LOG_LEVEL, e),
        }
    }

    if let Some(value) = lookup(ENV_DEFAULT_SPEED) {
        match value.trim().parse::<f32>() {
            Ok(speed) => config.playback.default_speed = speed,
            Err(e) => log::warn!("Ignoring {}={}: {}", ENV_DEFAULT_SPEED, value, e),
        }
    }

    if let Some(value) = lookup(ENV_DATA_DIR) {
        config.storage.data_dir = Some(PathBuf::from(value));
    }

    if let Some(value) = lookup(ENV_COVERS_DIR) {
        config.storage.covers_dir = Some(PathBuf::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn setup_test_manager() -> (TempDir, ConfigManager) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())
            .expect("Failed to create manager");
        (temp_dir, manager)
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let (_temp_dir, manager) = setup_test_manager();
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_load_or_default_with_corrupted_file() {
        let (_temp_dir, manager) = setup_test_manager();
        std::fs::write(manager.config_path(), "[[[").expect("Should write file");
        assert_eq!(manager.load_or_default(), Config::default());
    }

    #[test]
    fn test_update() {
        let (_temp_dir, manager) = setup_test_manager();
        manager.save(&Config::default()).expect("Should save");

        manager
            .update(|config| config.playback.loudness_control_enabled = false)
            .expect("Should update");

        let loaded = manager.load().expect("Should load");
        assert!(!loaded.playback.loudness_control_enabled);
    }

    #[test]
    fn test_initialize_only_once() {
        let (_temp_dir, manager) = setup_test_manager();

        assert!(manager.initialize().expect("Should initialize"));
        assert!(manager.config_path().exists());
        assert!(!manager.initialize().expect("Should initialize"));
    }

    #[test]
    fn test_reset() {
        let (_temp_dir, manager) = setup_test_manager();

        let mut config = Config::default();
        config.playback.default_speed = 0.75;
        manager.save(&config).expect("Should save");

        manager.reset().expect("Should reset");
        assert_eq!(manager.load().expect("Should load"), Config::default());
    }

    #[test]
    fn test_save_rejects_out_of_range_speed() {
        let (_temp_dir, manager) = setup_test_manager();

        let mut config = Config::default();
        config.playback.default_speed = 2.01;
        manager
            .save(&config)
            .expect_err("Should not save invalid config");
    }

    #[test]
    fn test_storage_paths_default_to_data_dir() {
        let (temp_dir, manager) = setup_test_manager();
        let config = Config::default();

        assert_eq!(manager.books_dir(&config), temp_dir.path().join("books"));
        assert_eq!(manager.covers_dir(&config), temp_dir.path().join("covers"));
    }

    #[test]
    fn test_storage_overrides() {
        let (_temp_dir, manager) = setup_test_manager();
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/data"));
        config.storage.covers_dir = Some(PathBuf::from("/pictures/covers"));

        assert_eq!(manager.books_dir(&config), PathBuf::from("/data/books"));
        assert_eq!(
            manager.covers_dir(&config),
            PathBuf::from("/pictures/covers")
        );
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        apply_overrides(
            &mut config,
            lookup_from(&[
                (ENV_LOG_LEVEL, "debug"),
                (ENV_DEFAULT_SPEED, "1.5"),
                (ENV_COVERS_DIR, "/covers"),
            ]),
        );

        assert_eq!(config.app.log_level, LogLevel::Debug);
        assert_eq!(config.playback.default_speed, 1.5);
        assert_eq!(config.storage.covers_dir, Some(PathBuf::from("/covers")));
        assert_eq!(config.storage.data_dir, None);
    }

    #[test]
    fn test_unparsable_overrides_are_skipped() {
        let mut config = Config::default();
        apply_overrides(
            &mut config,
            lookup_from(&[(ENV_LOG_LEVEL, "chatty"), (ENV_DEFAULT_SPEED, "fast")]),
        );

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_file_path() {
        let (_temp_dir, manager) = setup_test_manager();
        assert!(manager.config_path().ends_with("config.toml"));
    }
}

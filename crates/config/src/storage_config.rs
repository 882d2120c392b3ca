//! Storage locations for book records and cover images

use crate::validation::{self, ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where book records and covers live on disk
///
/// Unset paths resolve against the platform data directory, see
/// `ConfigManager::books_dir` and `ConfigManager::covers_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the application data directory
    pub data_dir: Option<PathBuf>,

    /// Override for the cover image directory
    pub covers_dir: Option<PathBuf>,

    /// Directory name, under the data directory, holding one JSON file per book
    pub books_dir_name: String,

    /// Directory name, under the data directory, used when `covers_dir` is unset
    pub covers_dir_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            covers_dir: None,
            books_dir_name: "books".to_string(),
            covers_dir_name: "covers".to_string(),
        }
    }
}

impl ConfigSection for StorageConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            validation::dir_name("storage.books_dir_name", &self.books_dir_name),
            validation::dir_name("storage.covers_dir_name", &self.covers_dir_name),
        ];

        if let Some(dir) = &self.covers_dir {
            if dir.as_os_str().is_empty() {
                results.push(Err(ValidationError::new(
                    "storage.covers_dir",
                    "must not be empty when set",
                )));
            }
        }

        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                results.push(Err(ValidationError::new(
                    "storage.data_dir",
                    "must not be empty when set",
                )));
            }
        }

        validation::collect(results)
    }

    fn merge(&mut self, other: Self) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.covers_dir.is_some() {
            self.covers_dir = other.covers_dir;
        }
        self.books_dir_name = other.books_dir_name;
        self.covers_dir_name = other.covers_dir_name;
    }

    fn section_name(&self) -> &'static str {
        "storage"
    }
}

//! Cover image location
//!
//! Covers live in one per-app directory and are named after the book id.
//! This module only computes paths; reading and writing the image is left
//! to the caller.

use crate::error::{AppError, Result};
use crate::types::BookId;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves cover files inside a fixed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverStore {
    dir: PathBuf,
}

impl CoverStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns `<dir>/<id>.jpg` without touching the filesystem
    pub fn cover_path(&self, id: BookId) -> PathBuf {
        self.dir.join(format!("{}.jpg", id.as_i64()))
    }

    /// Returns the cover path, creating the containing directory if absent
    pub fn cover_file(&self, id: BookId) -> Result<PathBuf> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| AppError::io(&self.dir, e))?;
            log::info!("Created cover directory: {}", self.dir.display());
        }
        Ok(self.cover_path(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cover_path_is_named_after_id() {
        let store = CoverStore::new("/data/audioshelf/covers");
        assert_eq!(
            store.cover_path(BookId::new(17)),
            PathBuf::from("/data/audioshelf/covers/17.jpg")
        );
    }

    #[test]
    fn test_unknown_id_still_resolves() {
        let store = CoverStore::new("covers");
        assert_eq!(store.cover_path(BookId::UNKNOWN), PathBuf::from("covers/-1.jpg"));
    }

    #[test]
    fn test_cover_file_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("nested").join("covers");
        let store = CoverStore::new(&dir);

        assert!(!dir.exists());
        let path = store.cover_file(BookId::new(3)).expect("Should resolve cover");

        assert!(dir.is_dir());
        assert_eq!(path, dir.join("3.jpg"));
        assert!(!path.exists());
    }

    #[test]
    fn test_cover_file_with_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = CoverStore::new(temp_dir.path());
        assert!(store.cover_file(BookId::new(1)).is_ok());
    }
}

//! Bookmark domain model

use crate::error::{AppError, Result};
use crate::types::{Duration, Validator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookmarkId(Uuid);

impl BookmarkId {
    /// Creates a new random BookmarkId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a BookmarkId from a UUID string
    pub fn from_string(s: &str) -> std::result::Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the BookmarkId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for BookmarkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named marker at a time offset within one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    id: BookmarkId,
    media_path: String,
    offset: Duration,
    title: String,
}

impl Bookmark {
    /// Creates a new bookmark in the chapter at `media_path`
    pub fn new(
        media_path: impl Into<String>,
        offset: Duration,
        title: impl Into<String>,
    ) -> Result<Self> {
        let media_path = media_path.into();
        if media_path.is_empty() {
            return Err(AppError::invalid_argument(
                "bookmark.media_path",
                "must not be empty",
            ));
        }

        let title = title.into();
        Self::check_title(&title)?;

        Ok(Self {
            id: BookmarkId::new(),
            media_path,
            offset,
            title,
        })
    }

    fn check_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(AppError::invalid_argument(
                "bookmark.title",
                "must not be empty",
            ));
        }
        Ok(())
    }

    pub fn id(&self) -> BookmarkId {
        self.id
    }

    /// Path of the chapter this bookmark points into
    pub fn media_path(&self) -> &str {
        &self.media_path
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Renames the bookmark
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        Self::check_title(&title)?;
        self.title = title;
        Ok(())
    }
}

impl Validator for Bookmark {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.media_path.is_empty() {
            errors.push("Bookmark media path cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            errors.push("Bookmark title cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

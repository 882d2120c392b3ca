//! Chapter domain model

use crate::error::{AppError, Result};
use crate::natural_order;
use crate::types::{Duration, Validator};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One playable media unit of a book, keyed by its path.
///
/// Chapters are created once when a book is imported and never change
/// afterwards, so every field is private and read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chapter {
    path: String,
    duration: Duration,
    name: String,
}

impl Chapter {
    /// Creates a chapter, rejecting an empty path or name
    pub fn new(
        path: impl Into<String>,
        duration: Duration,
        name: impl Into<String>,
    ) -> Result<Self> {
        let chapter = Self {
            path: path.into(),
            duration,
            name: name.into(),
        };

        if chapter.path.is_empty() {
            return Err(AppError::invalid_argument(
                "chapter.path",
                "must not be empty",
            ));
        }
        if chapter.name.is_empty() {
            return Err(AppError::invalid_argument(
                "chapter.name",
                format!("must not be empty (path={})", chapter.path),
            ));
        }
        Ok(chapter)
    }

    /// Media path; unique within the owning book
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Orders chapters by display name the way a listener expects
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        natural_order::compare(&self.name, &other.name)
    }
}

impl Validator for Chapter {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.path.is_empty() {
            errors.push("Chapter path cannot be empty".to_string());
        }

        if self.name.is_empty() {
            errors.push("Chapter name cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

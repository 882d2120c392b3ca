//! Serialized read-modify-write of stored books
//!
//! Book itself has no locking. Every change made through `BookEditor` holds
//! a per-id lock from fetch until the updated record is stored, so two
//! concurrent edits of the same book never lose each other's changes. Edits
//! of different books proceed in parallel.

use crate::repository::{lock_poisoned, not_found, BookRepository};
use audioshelf_core::{AppError, Book, BookId, Bookmark, BookmarkId, Duration, Result, Validator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Applies edits to books stored in a repository
pub struct BookEditor<R: BookRepository> {
    repository: R,
    locks: Mutex<HashMap<BookId, Arc<Mutex<()>>>>,
    validate_after_edit: bool,
}

impl<R: BookRepository> BookEditor<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
            validate_after_edit: false,
        }
    }

    /// Re-checks every invariant of the edited book before storing it
    ///
    /// Driven by `app.debug_mode` in the configuration.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_after_edit = enabled;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Runs `f` holding the edit lock for `id`
    ///
    /// The table entry is dropped again once no other caller holds it, so
    /// ids that were missing or deleted behind the editor's back do not
    /// accumulate.
    fn with_lock<T>(&self, id: BookId, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = {
            let mut locks = self.locks.lock().map_err(|_| lock_poisoned("edit table"))?;
            Arc::clone(locks.entry(id).or_default())
        };

        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(AppError::invalid_state(format!(
                "edit lock for book {} poisoned",
                id
            ))),
        };

        let mut locks = self.locks.lock().map_err(|_| lock_poisoned("edit table"))?;
        // Ours plus the table's; anyone else would have cloned under this mutex
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id);
        }
        result
    }

    /// Fetches book `id`, applies `f` and stores the result
    ///
    /// Nothing is stored if `f` returns an error. A missing book yields
    /// `RecordNotFound`.
    pub fn edit<T, F>(&self, id: BookId, f: F) -> Result<T>
    where
        F: FnOnce(&mut Book) -> Result<T>,
    {
        self.with_lock(id, || {
            let mut book = self.repository.get_book(id)?.ok_or_else(|| not_found(id))?;
            let value = f(&mut book)?;

            if self.validate_after_edit {
                if let Err(problems) = book.validate() {
                    log::error!("Edit left book {} invalid: {}", id, problems.join("; "));
                    return Err(AppError::invalid_state(format!(
                        "book {} invalid after edit: {}",
                        id,
                        problems.join("; ")
                    )));
                }
            }

            self.repository.update_book(&book)?;
            Ok(value)
        })
    }

    /// Removes the book, waiting for any edit of it in progress
    pub fn delete(&self, id: BookId) -> Result<()> {
        self.with_lock(id, || self.repository.delete_book(id))
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn set_position(&self, id: BookId, time: Duration, media_path: &str) -> Result<()> {
        self.edit(id, |book| book.set_position(time, media_path))
    }

    pub fn set_playback_speed(&self, id: BookId, speed: f32) -> Result<()> {
        self.edit(id, |book| book.set_playback_speed(speed))
    }

    pub fn set_loudness_enhanced(&self, id: BookId, loudness: i32) -> Result<()> {
        self.edit(id, |book| book.set_loudness_enhanced(loudness))
    }

    pub fn set_band_level(&self, id: BookId, band: u16, level: i16) -> Result<()> {
        self.edit(id, |book| {
            book.set_band_level(band, level);
            Ok(())
        })
    }

    pub fn add_bookmark(&self, id: BookId, bookmark: Bookmark) -> Result<BookmarkId> {
        self.edit(id, |book| {
            let bookmark_id = bookmark.id();
            book.add_bookmark(bookmark)?;
            Ok(bookmark_id)
        })
    }

    /// Removes a bookmark; `RecordNotFound` if the book has no such bookmark
    pub fn remove_bookmark(&self, id: BookId, bookmark_id: BookmarkId) -> Result<Bookmark> {
        self.edit(id, |book| {
            book.remove_bookmark(bookmark_id)
                .ok_or_else(|| AppError::RecordNotFound {
                    entity: "Bookmark".to_string(),
                    identifier: bookmark_id.to_string(),
                })
        })
    }
}

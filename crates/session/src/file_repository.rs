//! JSON-file book repository
//!
//! One `<id>.json` file per book inside a single directory. Records are
//! written to a temporary file in the same directory and renamed into
//! place, so a crash never leaves a half-written record behind.

use crate::repository::{lock_poisoned, not_found, BookRepository};
use audioshelf_core::{sort_by_name, AppError, Book, BookId, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Stores each book as pretty-printed JSON named after its id
#[derive(Debug)]
pub struct FileBookRepository {
    dir: PathBuf,
    next_id: Mutex<i64>,
}

impl FileBookRepository {
    /// Opens (and creates if needed) the record directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;
            log::info!("Created book directory: {}", dir.display());
        }

        let highest = Self::stored_ids(&dir)?.into_iter().max().unwrap_or(0);
        Ok(Self {
            dir,
            next_id: Mutex::new(highest + 1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: BookId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_i64()))
    }

    fn stored_ids(dir: &Path) -> Result<Vec<i64>> {
        let entries = fs::read_dir(dir).map_err(|e| AppError::io(dir, e))?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| AppError::io(dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<i64>().ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn read_record(&self, path: &Path) -> Result<Book> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| {
            AppError::storage(format!("corrupted book record {}", path.display()), e)
        })
    }

    fn write_record(&self, book: &Book) -> Result<()> {
        let path = self.record_path(book.id());
        let json = serde_json::to_string_pretty(book)
            .map_err(|e| AppError::storage(format!("failed to encode book {}", book.id()), e))?;

        let mut temp_file =
            NamedTempFile::new_in(&self.dir).map_err(|e| AppError::io(&self.dir, e))?;
        temp_file
            .write_all(json.as_bytes())
            .map_err(|e| AppError::io(&path, e))?;
        temp_file.flush().map_err(|e| AppError::io(&path, e))?;
        temp_file
            .persist(&path)
            .map_err(|e| AppError::io(&path, e.error))?;

        Ok(())
    }
}

impl BookRepository for FileBookRepository {
    fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        let path = self.record_path(id);
        match self.read_record(&path) {
            Ok(book) => Ok(Some(book)),
            Err(AppError::IoError { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn update_book(&self, book: &Book) -> Result<()> {
        if !self.record_path(book.id()).exists() {
            return Err(not_found(book.id()));
        }
        self.write_record(book)?;
        log::info!("Saved book {}", book.id());
        Ok(())
    }

    fn add_book(&self, mut book: Book) -> Result<BookId> {
        let mut next_id = self.next_id.lock().map_err(|_| lock_poisoned("id counter"))?;
        let id = BookId::new(*next_id);

        book.set_id(id);
        self.write_record(&book)?;
        *next_id += 1;

        log::info!("Added book {} name={}", id, book.name());
        Ok(id)
    }

    fn delete_book(&self, id: BookId) -> Result<()> {
        let path = self.record_path(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted book {}", id);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found(id)),
            Err(e) => Err(AppError::io(path, e)),
        }
    }

    fn all_books(&self) -> Result<Vec<Book>> {
        let mut books = Vec::new();
        for id in Self::stored_ids(&self.dir)? {
            books.push(self.read_record(&self.record_path(BookId::new(id)))?);
        }
        sort_by_name(&mut books);
        Ok(books)
    }
}

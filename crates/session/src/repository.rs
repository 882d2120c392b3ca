//! Book storage contract and an in-memory implementation

use audioshelf_core::{sort_by_name, AppError, Book, BookId, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage of Book records keyed by id
///
/// Implementations hand out independent copies: mutating a returned Book has
/// no effect until it is passed back to `update_book`.
pub trait BookRepository: Send + Sync {
    /// Fetches a copy of the stored book, or `None` if no record has that id
    fn get_book(&self, id: BookId) -> Result<Option<Book>>;

    /// Replaces the stored record with the same id
    fn update_book(&self, book: &Book) -> Result<()>;

    /// Stores a new record and returns the id assigned to it
    fn add_book(&self, book: Book) -> Result<BookId>;

    /// Removes the record with `id`
    fn delete_book(&self, id: BookId) -> Result<()>;

    /// All stored books in natural name order
    fn all_books(&self) -> Result<Vec<Book>>;
}

pub(crate) fn not_found(id: BookId) -> AppError {
    AppError::RecordNotFound {
        entity: "Book".to_string(),
        identifier: id.to_string(),
    }
}

pub(crate) fn lock_poisoned(what: &str) -> AppError {
    AppError::invalid_state(format!("{} lock poisoned", what))
}

#[derive(Debug)]
struct InMemoryState {
    books: HashMap<BookId, Book>,
    next_id: i64,
}

/// Repository backed by a `HashMap`, ids start at 1
#[derive(Debug)]
pub struct InMemoryBookRepository {
    state: Mutex<InMemoryState>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                books: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.books.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|_| lock_poisoned("repository"))
    }
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BookRepository for InMemoryBookRepository {
    fn get_book(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.lock()?.books.get(&id).cloned())
    }

    fn update_book(&self, book: &Book) -> Result<()> {
        let mut state = self.lock()?;
        match state.books.get_mut(&book.id()) {
            Some(stored) => {
                *stored = book.clone();
                log::debug!("Updated book {}", book.id());
                Ok(())
            }
            None => Err(not_found(book.id())),
        }
    }

    fn add_book(&self, mut book: Book) -> Result<BookId> {
        let mut state = self.lock()?;
        let id = BookId::new(state.next_id);
        state.next_id += 1;

        book.set_id(id);
        log::info!("Added book {} name={}", id, book.name());
        state.books.insert(id, book);
        Ok(id)
    }

    fn delete_book(&self, id: BookId) -> Result<()> {
        let mut state = self.lock()?;
        state.books.remove(&id).ok_or_else(|| not_found(id))?;
        log::info!("Deleted book {}", id);
        Ok(())
    }

    fn all_books(&self) -> Result<Vec<Book>> {
        let mut books: Vec<Book> = self.lock()?.books.values().cloned().collect();
        sort_by_name(&mut books);
        Ok(books)
    }
}

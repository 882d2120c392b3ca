//! Book aggregate
//!
//! A [`Book`] owns its chapters, bookmarks and audio tuning, and guards every
//! mutation so the following hold at all times:
//!
//! - the current media path names one of the book's chapters
//! - `0 <= loudness_enhanced <= LOUDNESS_MAX`
//! - `MIN_SPEED <= playback_speed <= MAX_SPEED`
//! - root, name and current media path are non-empty
//! - the chapter list is non-empty and its paths are unique
//!
//! The book holds no locks. Callers that fetch a book from shared storage,
//! mutate it and write it back must serialize that cycle per book id.

use crate::cover::CoverStore;
use crate::error::{AppError, Result};
use crate::natural_order;
use crate::types::{Bookmark, BookmarkId, Chapter, Duration, EqualizerLevels, Validator};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Slowest allowed playback speed
pub const MIN_SPEED: f32 = 0.5;
/// Fastest allowed playback speed
pub const MAX_SPEED: f32 = 2.0;
/// Playback speed of a freshly imported book
pub const DEFAULT_SPEED: f32 = 1.0;
/// Upper bound of the loudness gain in millibel
pub const LOUDNESS_MAX: i32 = 4000;

/// Identifier assigned by the repository on first persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Id of a book that has not been persisted yet
    pub const UNKNOWN: Self = Self(-1);

    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns false until the repository has assigned an id
    pub fn is_known(&self) -> bool {
        *self != Self::UNKNOWN
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the book's media was laid out on disk when it was imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookType {
    CollectionFolder,
    CollectionFile,
    SingleFolder,
    SingleFile,
}

impl std::fmt::Display for BookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookType::CollectionFolder => write!(f, "COLLECTION_FOLDER"),
            BookType::CollectionFile => write!(f, "COLLECTION_FILE"),
            BookType::SingleFolder => write!(f, "SINGLE_FOLDER"),
            BookType::SingleFile => write!(f, "SINGLE_FILE"),
        }
    }
}

/// Playback and tuning state of one audiobook.
///
/// `Clone` is a deep copy: chapters, bookmarks and equalizer levels are
/// owned collections, so a clone can be mutated without affecting the
/// original. Equality only looks at root, type and the chapter sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BookSnapshot")]
pub struct Book {
    id: BookId,
    root: String,
    #[serde(rename = "type")]
    book_type: BookType,
    name: String,
    author: Option<String>,
    chapters: Vec<Chapter>,
    bookmarks: Vec<Bookmark>,
    equalizer_levels: EqualizerLevels,
    loudness_enhanced: i32,
    playback_speed: f32,
    current_media_path: String,
    time: Duration,
    use_cover_replacement: bool,
}

impl Book {
    /// Creates a book positioned at the start of `current_media_path`
    pub fn new(
        root: impl Into<String>,
        name: impl Into<String>,
        author: Option<String>,
        chapters: Vec<Chapter>,
        current_media_path: impl Into<String>,
        book_type: BookType,
    ) -> Result<Self> {
        let root = root.into();
        let name = name.into();
        let current_media_path = current_media_path.into();

        if root.is_empty() {
            return Err(AppError::invalid_argument("root", "must not be empty"));
        }
        if name.is_empty() {
            return Err(AppError::invalid_argument("name", "must not be empty"));
        }
        if current_media_path.is_empty() {
            return Err(AppError::invalid_argument(
                "current_media_path",
                "must not be empty",
            ));
        }
        if chapters.is_empty() {
            return Err(AppError::invalid_argument(
                "chapters",
                format!("book name={} has no chapters", name),
            ));
        }
        if let Some(path) = first_duplicate_path(&chapters) {
            return Err(AppError::invalid_argument(
                "chapters",
                format!("book name={} contains path={} twice", name, path),
            ));
        }

        let mut book = Self {
            id: BookId::UNKNOWN,
            root,
            book_type,
            name,
            author,
            chapters,
            bookmarks: Vec::new(),
            equalizer_levels: EqualizerLevels::new(),
            loudness_enhanced: 0,
            playback_speed: DEFAULT_SPEED,
            current_media_path: String::new(),
            time: Duration::ZERO,
            use_cover_replacement: false,
        };
        book.set_position(Duration::ZERO, &current_media_path)?;
        Ok(book)
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    /// Assigns the persistent id. Only repositories should call this.
    pub fn set_id(&mut self, id: BookId) {
        self.id = id;
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn book_type(&self) -> BookType {
        self.book_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the book
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(AppError::invalid_argument("name", "must not be empty"));
        }
        self.name = name;
        Ok(())
    }

    /// Author of the book, if known
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn current_media_path(&self) -> &str {
        &self.current_media_path
    }

    /// Offset into the current chapter
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Moves playback to `time` within the chapter at `media_path`.
    ///
    /// Offset and chapter change together; on error neither changes.
    pub fn set_position(&mut self, time: Duration, media_path: &str) -> Result<()> {
        if !self.chapters.iter().any(|c| c.path() == media_path) {
            log::warn!(
                "Rejected position for book name={}: path={} is not a chapter",
                self.name,
                media_path
            );
            return Err(AppError::invalid_argument(
                "current_media_path",
                format!(
                    "book name={} has no chapter with path={}",
                    self.name, media_path
                ),
            ));
        }

        self.time = time;
        self.current_media_path = media_path.to_string();
        log::debug!("Book name={} at {} in {}", self.name, time, media_path);
        Ok(())
    }

    fn current_index(&self) -> Result<usize> {
        self.chapters
            .iter()
            .position(|c| c.path() == self.current_media_path)
            .ok_or_else(|| {
                AppError::invalid_state(format!(
                    "book name={} has no chapter for current_media_path={}",
                    self.name, self.current_media_path
                ))
            })
    }

    /// Chapter playback is currently in
    pub fn current_chapter(&self) -> Result<&Chapter> {
        let index = self.current_index()?;
        Ok(&self.chapters[index])
    }

    /// Chapter after the current one, or `None` at the end of the book
    pub fn next_chapter(&self) -> Result<Option<&Chapter>> {
        let index = self.current_index()?;
        Ok(self.chapters.get(index + 1))
    }

    /// Chapter before the current one, or `None` at the start of the book
    pub fn previous_chapter(&self) -> Result<Option<&Chapter>> {
        let index = self.current_index()?;
        Ok(index.checked_sub(1).and_then(|i| self.chapters.get(i)))
    }

    /// Stores the level in millibel for an equalizer band.
    ///
    /// Not range checked: the valid range depends on the audio engine.
    pub fn set_band_level(&mut self, band: u16, level: i16) {
        self.equalizer_levels.set(band, level);
    }

    /// Level of a band, or [`crate::types::UNSET_BAND_LEVEL`] if never set
    pub fn band_level(&self, band: u16) -> i16 {
        self.equalizer_levels.level_or_unset(band)
    }

    pub fn equalizer_levels(&self) -> &EqualizerLevels {
        &self.equalizer_levels
    }

    /// Loudness gain in millibel
    pub fn loudness_enhanced(&self) -> i32 {
        self.loudness_enhanced
    }

    /// Sets the loudness gain, which must lie in `0..=LOUDNESS_MAX`
    pub fn set_loudness_enhanced(&mut self, loudness_enhanced: i32) -> Result<()> {
        if !(0..=LOUDNESS_MAX).contains(&loudness_enhanced) {
            log::warn!("Rejected loudness_enhanced={}", loudness_enhanced);
            return Err(AppError::invalid_argument(
                "loudness_enhanced",
                format!(
                    "must be between 0 and {}, got {}",
                    LOUDNESS_MAX, loudness_enhanced
                ),
            ));
        }
        log::debug!("Set loudness_enhanced to {}", loudness_enhanced);
        self.loudness_enhanced = loudness_enhanced;
        Ok(())
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    /// Sets the playback speed, which must lie in `MIN_SPEED..=MAX_SPEED`
    pub fn set_playback_speed(&mut self, playback_speed: f32) -> Result<()> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&playback_speed) {
            log::warn!("Rejected playback_speed={}", playback_speed);
            return Err(AppError::invalid_argument(
                "playback_speed",
                format!(
                    "must be between {} and {}, got {}",
                    MIN_SPEED, MAX_SPEED, playback_speed
                ),
            ));
        }
        log::debug!("Set playback_speed to {}", playback_speed);
        self.playback_speed = playback_speed;
        Ok(())
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Adds a bookmark; its media path must be one of this book's chapters
    pub fn add_bookmark(&mut self, bookmark: Bookmark) -> Result<()> {
        if !self.chapters.iter().any(|c| c.path() == bookmark.media_path()) {
            return Err(AppError::invalid_argument(
                "bookmark.media_path",
                format!(
                    "book name={} has no chapter with path={}",
                    self.name,
                    bookmark.media_path()
                ),
            ));
        }
        self.bookmarks.push(bookmark);
        Ok(())
    }

    /// Removes a bookmark, returning it if it existed
    pub fn remove_bookmark(&mut self, id: BookmarkId) -> Option<Bookmark> {
        let index = self.bookmarks.iter().position(|b| b.id() == id)?;
        Some(self.bookmarks.remove(index))
    }

    /// Looks up a bookmark for editing
    pub fn bookmark_mut(&mut self, id: BookmarkId) -> Option<&mut Bookmark> {
        self.bookmarks.iter_mut().find(|b| b.id() == id)
    }

    pub fn use_cover_replacement(&self) -> bool {
        self.use_cover_replacement
    }

    pub fn set_use_cover_replacement(&mut self, use_cover_replacement: bool) {
        self.use_cover_replacement = use_cover_replacement;
    }

    /// Cover image path for this book, creating the cover directory if needed
    pub fn cover_file(&self, store: &CoverStore) -> Result<PathBuf> {
        store.cover_file(self.id)
    }

    /// Orders books by name in natural order
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        natural_order::compare(&self.name, &other.name)
    }
}

/// Sorts books by name in natural order
pub fn sort_by_name(books: &mut [Book]) {
    books.sort_by(|a, b| a.cmp_by_name(b));
}

fn first_duplicate_path(chapters: &[Chapter]) -> Option<&str> {
    let mut seen = HashSet::new();
    chapters
        .iter()
        .map(Chapter::path)
        .find(|path| !seen.insert(*path))
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.book_type == other.book_type
            && self.chapters == other.chapters
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
        self.book_type.hash(state);
        self.chapters.hash(state);
    }
}

impl Validator for Book {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.root.is_empty() {
            errors.push("Root cannot be empty".to_string());
        }
        if self.name.is_empty() {
            errors.push("Name cannot be empty".to_string());
        }
        if self.chapters.is_empty() {
            errors.push("Book must have at least one chapter".to_string());
        }
        if let Some(path) = first_duplicate_path(&self.chapters) {
            errors.push(format!("Chapter path {} appears more than once", path));
        }
        if self.current_index().is_err() {
            errors.push(format!(
                "Current media path {} is not a chapter",
                self.current_media_path
            ));
        }
        if !(0..=LOUDNESS_MAX).contains(&self.loudness_enhanced) {
            errors.push(format!("Loudness must be between 0 and {}", LOUDNESS_MAX));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.playback_speed) {
            errors.push(format!(
                "Playback speed must be between {} and {}",
                MIN_SPEED, MAX_SPEED
            ));
        }
        for chapter in &self.chapters {
            if let Err(mut chapter_errors) = chapter.validate() {
                errors.append(&mut chapter_errors);
            }
        }
        for bookmark in &self.bookmarks {
            if let Err(mut bookmark_errors) = bookmark.validate() {
                errors.append(&mut bookmark_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn default_speed() -> f32 {
    DEFAULT_SPEED
}

/// Persisted form of a [`Book`].
///
/// Storage layers decode into this record and convert it with
/// `Book::try_from`, which re-runs every construction check.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSnapshot {
    #[serde(default)]
    pub id: BookId,
    pub root: String,
    #[serde(rename = "type")]
    pub book_type: BookType,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub equalizer_levels: EqualizerLevels,
    #[serde(default)]
    pub loudness_enhanced: i32,
    #[serde(default = "default_speed")]
    pub playback_speed: f32,
    pub current_media_path: String,
    #[serde(default)]
    pub time: Duration,
    #[serde(default)]
    pub use_cover_replacement: bool,
}

impl TryFrom<BookSnapshot> for Book {
    type Error = AppError;

    fn try_from(snapshot: BookSnapshot) -> Result<Self> {
        let mut book = Book::new(
            snapshot.root,
            snapshot.name,
            snapshot.author,
            snapshot.chapters,
            snapshot.current_media_path.clone(),
            snapshot.book_type,
        )?;

        book.set_id(snapshot.id);
        book.set_position(snapshot.time, &snapshot.current_media_path)?;
        book.set_playback_speed(snapshot.playback_speed)?;
        book.set_loudness_enhanced(snapshot.loudness_enhanced)?;
        book.set_use_cover_replacement(snapshot.use_cover_replacement);
        book.equalizer_levels = snapshot.equalizer_levels;

        for chapter in book.chapters() {
            if let Err(errors) = chapter.validate() {
                return Err(AppError::invalid_argument("chapters", errors.join("; ")));
            }
        }
        for bookmark in snapshot.bookmarks {
            if let Err(errors) = bookmark.validate() {
                return Err(AppError::invalid_argument("bookmarks", errors.join("; ")));
            }
            book.add_bookmark(bookmark)?;
        }

        Ok(book)
    }
}

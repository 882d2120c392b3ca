//! Audioshelf core
//!
//! Persistent playback state of an audiobook: chapters, current position,
//! playback speed, loudness gain, equalizer levels and bookmarks. Every
//! mutation is validated and returns [`AppError`] on violation; nothing here
//! performs I/O except creating the cover directory on demand.

pub mod cover;
pub mod error;
pub mod natural_order;
pub mod types;

// Re-export commonly used types
pub use cover::CoverStore;
pub use error::{AppError, ErrorSeverity, Result};
pub use types::{
    sort_by_name, Book, BookId, BookSnapshot, BookType, Bookmark, BookmarkId, Chapter, Duration,
    EqualizerLevels, Validator, DEFAULT_SPEED, LOUDNESS_MAX, MAX_SPEED, MIN_SPEED,
    UNSET_BAND_LEVEL,
};

//! Domain types for Audioshelf
//!
//! - `book`: the Book aggregate, its id and layout type
//! - `chapter`: immutable chapter values
//! - `bookmark`: user bookmarks
//! - `equalizer`: sparse per-band equalizer levels
//! - `common`: shared durations and the `Validator` trait

mod book;
mod bookmark;
mod chapter;
mod common;
mod equalizer;

// Re-export all public types
pub use book::{
    sort_by_name, Book, BookId, BookSnapshot, BookType, DEFAULT_SPEED, LOUDNESS_MAX, MAX_SPEED,
    MIN_SPEED,
};
pub use bookmark::{Bookmark, BookmarkId};
pub use chapter::Chapter;
pub use common::{Duration, Validator};
pub use equalizer::{EqualizerLevels, UNSET_BAND_LEVEL};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_types_are_exported() {
        let _book_id: BookId = BookId::UNKNOWN;
        let _bookmark_id: BookmarkId = BookmarkId::new();
        let _levels: EqualizerLevels = EqualizerLevels::new();
        assert!(MIN_SPEED < DEFAULT_SPEED && DEFAULT_SPEED < MAX_SPEED);
    }

    #[test]
    fn test_duration_formatting() {
        let d = Duration::from_seconds(3665);
        assert!(d.to_string().contains("1:01:05"));
    }
}

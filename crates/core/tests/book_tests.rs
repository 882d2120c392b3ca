//! Integration tests for the Book aggregate

use audioshelf_core::{
    AppError, Book, BookId, BookType, Bookmark, Chapter, CoverStore, Duration, Validator,
    UNSET_BAND_LEVEL,
};
use tempfile::TempDir;

fn two_chapter_book() -> Result<Book, AppError> {
    Book::new(
        "/sdcard/Audiobooks/Solaris",
        "Solaris",
        Some("Stanisław Lem".to_string()),
        vec![
            Chapter::new("c1.mp3", Duration::from_seconds(300), "Chapter 1")?,
            Chapter::new("c2.mp3", Duration::from_seconds(200), "Chapter 2")?,
        ],
        "c1.mp3",
        BookType::CollectionFolder,
    )
}

#[test]
fn test_position_scenario() -> Result<(), AppError> {
    let mut book = two_chapter_book()?;
    assert_eq!(book.current_chapter()?.path(), "c1.mp3");

    book.set_position(Duration::from_seconds(150), "c2.mp3")?;
    assert_eq!(book.current_chapter()?.path(), "c2.mp3");
    assert_eq!(
        book.previous_chapter()?.map(Chapter::path),
        Some("c1.mp3")
    );

    assert!(book.set_position(Duration::ZERO, "missing.mp3").is_err());
    assert_eq!(book.current_media_path(), "c2.mp3");
    assert_eq!(book.time(), Duration::from_seconds(150));
    Ok(())
}

#[test]
fn test_json_round_trip_preserves_state() -> Result<(), Box<dyn std::error::Error>> {
    let mut book = two_chapter_book()?;
    book.set_id(BookId::new(42));
    book.set_position(Duration::from_millis(12_345), "c2.mp3")?;
    book.set_playback_speed(1.5)?;
    book.set_loudness_enhanced(1200)?;
    book.set_band_level(0, -300);
    book.set_band_level(4, 800);
    book.set_use_cover_replacement(true);
    book.add_bookmark(Bookmark::new("c1.mp3", Duration::from_seconds(30), "Ocean")?)?;

    let json = serde_json::to_string(&book)?;
    let restored: Book = serde_json::from_str(&json)?;

    assert_eq!(restored, book);
    assert_eq!(restored.id(), BookId::new(42));
    assert_eq!(restored.current_media_path(), "c2.mp3");
    assert_eq!(restored.time().as_millis(), 12_345);
    assert_eq!(restored.playback_speed(), 1.5);
    assert_eq!(restored.loudness_enhanced(), 1200);
    assert_eq!(restored.band_level(0), -300);
    assert_eq!(restored.band_level(4), 800);
    assert_eq!(restored.band_level(2), UNSET_BAND_LEVEL);
    assert!(restored.use_cover_replacement());
    assert_eq!(restored.bookmarks(), book.bookmarks());
    assert!(restored.is_valid());
    Ok(())
}

#[test]
fn test_corrupted_record_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let book = two_chapter_book()?;
    let mut value = serde_json::to_value(&book)?;
    value["current_media_path"] = serde_json::Value::String("gone.mp3".to_string());

    let result: Result<Book, _> = serde_json::from_value(value);
    let err = result.expect_err("record pointing at a missing chapter must fail");
    assert!(err.to_string().contains("gone.mp3"));
    Ok(())
}

#[test]
fn test_out_of_range_speed_record_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let book = two_chapter_book()?;
    let mut value = serde_json::to_value(&book)?;
    value["playback_speed"] = serde_json::json!(3.0);

    assert!(serde_json::from_value::<Book>(value).is_err());
    Ok(())
}

#[test]
fn test_minimal_record_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let json = r#"{
        "root": "/books/x",
        "type": "SINGLE_FILE",
        "name": "X",
        "chapters": [{"path": "x.m4b", "duration": 1000, "name": "X"}],
        "current_media_path": "x.m4b"
    }"#;

    let book: Book = serde_json::from_str(json)?;
    assert_eq!(book.id(), BookId::UNKNOWN);
    assert_eq!(book.playback_speed(), 1.0);
    assert_eq!(book.book_type(), BookType::SingleFile);
    assert!(book.author().is_none());
    Ok(())
}

#[test]
fn test_deep_copies_are_independent() -> Result<(), AppError> {
    let original = two_chapter_book()?;
    let mut first = original.clone();
    let second = original.clone();

    first.set_band_level(3, 100);
    first.add_bookmark(Bookmark::new("c2.mp3", Duration::ZERO, "Mark")?)?;

    assert_eq!(first, second);
    assert_eq!(second.band_level(3), UNSET_BAND_LEVEL);
    assert!(second.bookmarks().is_empty());
    assert!(original.bookmarks().is_empty());
    Ok(())
}

#[test]
fn test_cover_file_uses_book_id() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let store = CoverStore::new(temp_dir.path().join("covers"));
    let mut book = two_chapter_book()?;
    book.set_id(BookId::new(7));

    let cover = book.cover_file(&store)?;

    assert_eq!(cover, temp_dir.path().join("covers").join("7.jpg"));
    assert!(store.dir().is_dir());
    Ok(())
}

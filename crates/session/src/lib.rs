//! Audioshelf session layer
//!
//! Everything around a `Book` that touches the outside world: where records
//! are stored, how concurrent edits are serialized, and how the device
//! equalizer is queried for the audio settings dialog.

pub mod audio;
pub mod editor;
pub mod file_repository;
pub mod repository;
pub mod settings;

pub use audio::{EqualizerEngine, EqualizerSession};
pub use editor::BookEditor;
pub use file_repository::FileBookRepository;
pub use repository::{BookRepository, InMemoryBookRepository};
pub use settings::{
    format_loudness, format_millibel, format_speed, AudioAdjustment, AudioSettings, BandControl,
    LoudnessControl, SpeedControl,
};

use audioshelf_config::{Config, ConfigManager};
use audioshelf_core::{CoverStore, Result};

/// File-backed storage resolved from configuration
pub struct Storage {
    pub editor: BookEditor<FileBookRepository>,
    pub covers: CoverStore,
}

impl Storage {
    /// Opens the book directory and cover store named by `config`
    ///
    /// Also caps the global log level at `app.log_level`.
    pub fn open(manager: &ConfigManager, config: &Config) -> Result<Self> {
        log::set_max_level(config.app.log_level.to_level_filter());
        let repository = FileBookRepository::open(manager.books_dir(config))?;
        let covers = CoverStore::new(manager.covers_dir(config));
        log::debug!(
            "Opened storage books={} covers={}",
            repository.dir().display(),
            covers.dir().display()
        );

        Ok(Self {
            editor: BookEditor::new(repository).with_validation(config.app.debug_mode),
            covers,
        })
    }
}

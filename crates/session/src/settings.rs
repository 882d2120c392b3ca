//! Audio settings presentation model
//!
//! `AudioSettings` describes what an audio dialog shows for one book: the
//! speed slider, the loudness slider and one slider per equalizer band.
//! `AudioAdjustment` turns committed slider positions back into book edits.

use crate::audio::{EqualizerEngine, EqualizerSession};
use crate::editor::BookEditor;
use crate::repository::BookRepository;
use audioshelf_config::PlaybackConfig;
use audioshelf_core::{
    AppError, Book, BookId, Result, LOUDNESS_MAX, MAX_SPEED, MIN_SPEED, UNSET_BAND_LEVEL,
};

/// Speed slider, positions are hundredths of the speed factor
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedControl {
    pub value: f32,
    pub progress: i32,
    pub min_progress: i32,
    pub max_progress: i32,
    pub min_label: String,
    pub max_label: String,
}

/// Loudness gain slider in millibel
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessControl {
    pub value: i32,
    pub max: i32,
    pub min_label: String,
    pub max_label: String,
}

/// One equalizer band slider
///
/// `progress` counts from `min_level`, so it always starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BandControl {
    pub band: u16,
    pub label: String,
    pub min_level: i16,
    pub max_level: i16,
    pub min_label: String,
    pub max_label: String,
    pub level: i16,
    pub progress: i32,
}

/// Everything the audio dialog displays for one book
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub speed: Option<SpeedControl>,
    pub loudness: Option<LoudnessControl>,
    pub bands: Vec<BandControl>,
}

impl AudioSettings {
    /// Builds the model from the book, the device equalizer and config
    ///
    /// The engine is disabled and released before this returns, including
    /// when a capability query fails part way through the bands.
    pub fn describe<E: EqualizerEngine>(
        book: &Book,
        engine: E,
        playback: &PlaybackConfig,
    ) -> Result<Self> {
        let speed = playback.speed_control_enabled.then(|| SpeedControl {
            value: book.playback_speed(),
            progress: speed_to_progress(book.playback_speed()),
            min_progress: speed_to_progress(MIN_SPEED),
            max_progress: speed_to_progress(MAX_SPEED),
            min_label: format_speed(MIN_SPEED),
            max_label: format_speed(MAX_SPEED),
        });

        let loudness = playback.loudness_control_enabled.then(|| LoudnessControl {
            value: book.loudness_enhanced(),
            max: LOUDNESS_MAX,
            min_label: format_loudness(0),
            max_label: format_loudness(LOUDNESS_MAX),
        });

        let session = EqualizerSession::new(engine);
        let (min_level, max_level) = session.band_level_range()?;
        let count = session.number_of_bands()?;

        let mut bands = Vec::with_capacity(usize::from(count));
        for band in 0..count {
            let stored = book.band_level(band);
            let level = if stored == UNSET_BAND_LEVEL {
                session.band_level(band)?
            } else {
                stored
            };

            bands.push(BandControl {
                band,
                label: format!("{} Hz", session.center_freq(band)? / 1000),
                min_level,
                max_level,
                min_label: format_millibel(i32::from(min_level)),
                max_label: format_millibel(i32::from(max_level)),
                level,
                progress: i32::from(level) - i32::from(min_level),
            });
        }

        Ok(Self {
            speed,
            loudness,
            bands,
        })
    }
}

fn speed_to_progress(speed: f32) -> i32 {
    (speed * 100.0).round() as i32
}

/// `1.5` -> `"1.5x"`
pub fn format_speed(speed: f32) -> String {
    format!("{:.1}x", speed)
}

/// Whole decibels, truncated: `2500` -> `"25 dB"`
pub fn format_loudness(millibel: i32) -> String {
    format!("{} dB", millibel / 100)
}

/// Decibels rounded to a whole number: `-1500` -> `"-15 dB"`
pub fn format_millibel(millibel: i32) -> String {
    format!("{:.0} dB", millibel as f32 / 100.0)
}

/// Writes committed slider positions to a stored book
pub struct AudioAdjustment<'a, R: BookRepository> {
    editor: &'a BookEditor<R>,
    book_id: BookId,
}

impl<'a, R: BookRepository> AudioAdjustment<'a, R> {
    pub fn new(editor: &'a BookEditor<R>, book_id: BookId) -> Self {
        Self { editor, book_id }
    }

    /// Speed slider released at `progress` hundredths
    pub fn commit_speed(&self, progress: i32) -> Result<()> {
        self.editor
            .set_playback_speed(self.book_id, progress as f32 / 100.0)
    }

    /// Loudness slider released at `progress` millibel
    pub fn commit_loudness(&self, progress: i32) -> Result<()> {
        self.editor.set_loudness_enhanced(self.book_id, progress)
    }

    /// Band slider released at `progress` steps above `min_level`
    pub fn commit_band(&self, band: u16, progress: i32, min_level: i16) -> Result<()> {
        let level = progress
            .checked_add(i32::from(min_level))
            .and_then(|level| i16::try_from(level).ok())
            .ok_or_else(|| {
                AppError::invalid_argument(
                    "progress",
                    format!("band level {} + {} out of range", min_level, progress),
                )
            })?;
        self.editor.set_band_level(self.book_id, band, level)
    }

    /// Puts the speed back to the configured default
    pub fn reset_speed(&self, playback: &PlaybackConfig) -> Result<()> {
        self.editor
            .set_playback_speed(self.book_id, playback.default_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::tests::FakeEngine;
    use crate::repository::tests::sample_book;
    use crate::InMemoryBookRepository;

    #[test]
    fn test_formatting() {
        assert_eq!(format_speed(0.5), "0.5x");
        assert_eq!(format_speed(2.0), "2.0x");
        assert_eq!(format_loudness(0), "0 dB");
        assert_eq!(format_loudness(LOUDNESS_MAX), "40 dB");
        assert_eq!(format_loudness(1250), "12 dB");
        assert_eq!(format_millibel(-1500), "-15 dB");
        assert_eq!(format_millibel(300), "3 dB");
    }

    #[test]
    fn test_describe_defaults() {
        let book = sample_book("Dune");
        let engine = FakeEngine::default();

        let settings =
            AudioSettings::describe(&book, engine.clone(), &PlaybackConfig::default()).unwrap();

        let speed = settings.speed.unwrap();
        assert_eq!(speed.progress, 100);
        assert_eq!((speed.min_progress, speed.max_progress), (50, 200));
        assert_eq!((speed.min_label.as_str(), speed.max_label.as_str()), ("0.5x", "2.0x"));

        let loudness = settings.loudness.unwrap();
        assert_eq!(loudness.value, 0);
        assert_eq!(loudness.max_label, "40 dB");

        assert_eq!(settings.bands.len(), 5);
        assert_eq!(settings.bands[0].label, "60 Hz");
        assert_eq!(settings.bands[4].label, "14000 Hz");
        assert_eq!(settings.bands[0].min_label, "-15 dB");
        assert_eq!(settings.bands[0].max_label, "15 dB");
        assert_eq!(engine.calls(), vec!["enabled=false", "release"]);
    }

    #[test]
    fn test_unset_band_uses_engine_default() {
        let mut book = sample_book("Dune");
        book.set_band_level(1, 600);

        let settings =
            AudioSettings::describe(&book, FakeEngine::default(), &PlaybackConfig::default())
                .unwrap();

        assert_eq!(settings.bands[0].level, 0);
        assert_eq!(settings.bands[0].progress, 1500);
        assert_eq!(settings.bands[1].level, 600);
        assert_eq!(settings.bands[1].progress, 2100);
    }

    #[test]
    fn test_disabled_controls_are_hidden() {
        let playback = PlaybackConfig {
            speed_control_enabled: false,
            loudness_control_enabled: false,
            ..Default::default()
        };

        let settings =
            AudioSettings::describe(&sample_book("Dune"), FakeEngine::default(), &playback)
                .unwrap();

        assert!(settings.speed.is_none());
        assert!(settings.loudness.is_none());
        assert_eq!(settings.bands.len(), 5);
    }

    #[test]
    fn test_engine_failure_still_releases() {
        let engine = FakeEngine {
            fail_on_band: Some(3),
            ..Default::default()
        };

        let result =
            AudioSettings::describe(&sample_book("Dune"), engine.clone(), &PlaybackConfig::default());

        assert!(result.is_err());
        assert_eq!(engine.calls(), vec!["enabled=false", "release"]);
    }

    #[test]
    fn test_adjustments_reach_repository() {
        let editor = BookEditor::new(InMemoryBookRepository::new());
        let id = editor.repository().add_book(sample_book("Dune")).unwrap();
        let adjust = AudioAdjustment::new(&editor, id);

        adjust.commit_speed(125).unwrap();
        adjust.commit_loudness(800).unwrap();
        adjust.commit_band(2, 1000, -1500).unwrap();

        let book = editor.repository().get_book(id).unwrap().unwrap();
        assert_eq!(book.playback_speed(), 1.25);
        assert_eq!(book.loudness_enhanced(), 800);
        assert_eq!(book.band_level(2), -500);

        adjust.reset_speed(&PlaybackConfig::default()).unwrap();
        let book = editor.repository().get_book(id).unwrap().unwrap();
        assert_eq!(book.playback_speed(), 1.0);
    }

    #[test]
    fn test_out_of_range_commits_are_rejected() {
        let editor = BookEditor::new(InMemoryBookRepository::new());
        let id = editor.repository().add_book(sample_book("Dune")).unwrap();
        let adjust = AudioAdjustment::new(&editor, id);

        assert!(adjust.commit_speed(250).is_err());
        assert!(adjust.commit_loudness(LOUDNESS_MAX + 1).is_err());
        assert!(adjust.commit_band(0, 40_000, 0).is_err());
    }

    #[test]
    fn test_band_commit_past_i32_is_rejected() {
        let editor = BookEditor::new(InMemoryBookRepository::new());
        let id = editor.repository().add_book(sample_book("Dune")).unwrap();
        let adjust = AudioAdjustment::new(&editor, id);

        let high = adjust.commit_band(0, i32::MAX, 1);
        let low = adjust.commit_band(0, i32::MIN, -1);

        assert!(matches!(high, Err(AppError::InvalidArgument { .. })));
        assert!(matches!(low, Err(AppError::InvalidArgument { .. })));
        let book = editor.repository().get_book(id).unwrap().unwrap();
        assert_eq!(book.band_level(0), UNSET_BAND_LEVEL);
    }
}

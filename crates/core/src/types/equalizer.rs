//! Per-band equalizer levels stored with a book

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Level reported for a band that was never configured.
///
/// Callers treat it as "use the audio engine's own default for this band".
pub const UNSET_BAND_LEVEL: i16 = -1;

/// Sparse, ordered mapping from band index to level in millibel.
///
/// An absent band means the user never touched it. Levels are not range
/// checked here; the valid range is a capability of the audio engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EqualizerLevels(BTreeMap<u16, i16>);

impl EqualizerLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or overwrites the level for a band
    pub fn set(&mut self, band: u16, level: i16) {
        self.0.insert(band, level);
    }

    /// Returns the explicitly configured level, if any
    pub fn get(&self, band: u16) -> Option<i16> {
        self.0.get(&band).copied()
    }

    /// Returns the configured level or [`UNSET_BAND_LEVEL`]
    pub fn level_or_unset(&self, band: u16) -> i16 {
        self.get(band).unwrap_or(UNSET_BAND_LEVEL)
    }

    /// Forgets a band so it falls back to the engine default again
    pub fn remove(&mut self, band: u16) -> Option<i16> {
        self.0.remove(&band)
    }

    /// Configured bands in ascending band order
    pub fn iter(&self) -> impl Iterator<Item = (u16, i16)> + '_ {
        self.0.iter().map(|(band, level)| (*band, *level))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_band() {
        let levels = EqualizerLevels::new();
        assert_eq!(levels.get(3), None);
        assert_eq!(levels.level_or_unset(3), UNSET_BAND_LEVEL);
        assert!(levels.is_empty());
    }

    #[test]
    fn test_overwrite_keeps_last_value() {
        let mut levels = EqualizerLevels::new();
        levels.set(2, 300);
        levels.set(2, -450);
        assert_eq!(levels.get(2), Some(-450));
        assert_eq!(levels.len(), 1);
    }

    #[test]
    fn test_explicit_minus_one_is_still_configured() {
        let mut levels = EqualizerLevels::new();
        levels.set(0, -1);
        assert_eq!(levels.get(0), Some(-1));
        assert_eq!(levels.level_or_unset(0), UNSET_BAND_LEVEL);
    }

    #[test]
    fn test_iter_is_ordered() {
        let mut levels = EqualizerLevels::new();
        levels.set(4, 10);
        levels.set(0, 20);
        levels.set(2, 30);

        let bands: Vec<u16> = levels.iter().map(|(band, _)| band).collect();
        assert_eq!(bands, vec![0, 2, 4]);
    }

    #[test]
    fn test_remove() {
        let mut levels = EqualizerLevels::new();
        levels.set(1, 100);
        assert_eq!(levels.remove(1), Some(100));
        assert_eq!(levels.get(1), None);
    }
}

//! Platform equalizer boundary
//!
//! The audio engine is owned by the platform; this crate only queries its
//! capabilities and makes sure it is switched off and released afterwards.

use audioshelf_core::Result;
use std::ops::{Deref, DerefMut};

/// Capability queries and lifecycle of a device equalizer
pub trait EqualizerEngine {
    /// Number of bands the device exposes
    fn number_of_bands(&self) -> Result<u16>;

    /// Center frequency of `band` in milliHertz
    fn center_freq(&self, band: u16) -> Result<u32>;

    /// Supported level range `(min, max)` in millibel
    fn band_level_range(&self) -> Result<(i16, i16)>;

    /// Device default level of `band` in millibel
    fn band_level(&self, band: u16) -> Result<i16>;

    fn set_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Frees the native resource; the engine must not be used afterwards
    fn release(&mut self) -> Result<()>;
}

/// Owns an engine for the duration of a query
///
/// Dropping the session disables and then releases the engine, whether the
/// caller finished normally or bailed out with `?`. Failures while shutting
/// down are logged, never raised.
pub struct EqualizerSession<E: EqualizerEngine> {
    engine: E,
}

impl<E: EqualizerEngine> EqualizerSession<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

impl<E: EqualizerEngine> Deref for EqualizerSession<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.engine
    }
}

impl<E: EqualizerEngine> DerefMut for EqualizerSession<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

impl<E: EqualizerEngine> Drop for EqualizerSession<E> {
    fn drop(&mut self) {
        if let Err(e) = self.engine.set_enabled(false) {
            log::warn!("Failed to disable equalizer: {}", e);
        }
        if let Err(e) = self.engine.release() {
            log::warn!("Failed to release equalizer: {}", e);
        }
    }
}

//! Playback tuning configuration section

use crate::validation::{self, ConfigSection, ValidationError};
use audioshelf_core::{DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};
use serde::{Deserialize, Serialize};

/// Which audio controls are offered and how they start out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Playback speed applied when a book's speed is reset
    pub default_speed: f32,

    /// Whether the player backend can change playback speed
    pub speed_control_enabled: bool,

    /// Whether the platform offers a loudness enhancer
    pub loudness_control_enabled: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_speed: DEFAULT_SPEED,
            speed_control_enabled: true,
            loudness_control_enabled: true,
        }
    }
}

impl ConfigSection for PlaybackConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validation::collect([validation::in_range(
            "playback.default_speed",
            self.default_speed,
            MIN_SPEED,
            MAX_SPEED,
        )])
    }

    fn merge(&mut self, other: Self) {
        self.default_speed = other.default_speed;
        self.speed_control_enabled = other.speed_control_enabled;
        self.loudness_control_enabled = other.loudness_control_enabled;
    }

    fn section_name(&self) -> &'static str {
        "playback"
    }
}

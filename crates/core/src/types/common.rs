//! Playback offsets and the self-check trait shared by the domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chapter length or offset into a chapter, in milliseconds
///
/// Stored as a bare integer so records stay compatible with plain
/// millisecond fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(u64);

impl Duration {
    pub const ZERO: Self = Self(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Saturates at `u64::MAX` milliseconds
    pub fn from_seconds(seconds: u64) -> Self {
        Self(seconds.saturating_mul(1000))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Whole seconds, rounded down
    pub fn as_seconds(&self) -> u64 {
        self.0 / 1000
    }
}

/// Player clock style: `M:SS` below an hour, `H:MM:SS` above
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.as_seconds();
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
        if hours > 0 {
            write!(f, "{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            write!(f, "{}:{:02}", minutes, seconds)
        }
    }
}

/// Self-check of every invariant a value must hold
///
/// Used after deserialization and in debug builds of the editor, where a
/// failing check means stored data is corrupt.
pub trait Validator {
    /// Lists every broken invariant, or `Ok` when there are none
    fn validate(&self) -> Result<(), Vec<String>>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_and_millis_agree() {
        let offset = Duration::from_seconds(90);
        assert_eq!(offset.as_millis(), 90_000);
        assert_eq!(Duration::from_millis(90_999).as_seconds(), 90);
    }

    #[test]
    fn test_huge_seconds_saturate() {
        assert_eq!(Duration::from_seconds(u64::MAX).as_millis(), u64::MAX);
        assert_eq!(
            Duration::from_seconds(u64::MAX / 1000 + 1).as_millis(),
            u64::MAX
        );
    }

    #[test]
    fn test_clock_display() {
        assert_eq!(Duration::ZERO.to_string(), "0:00");
        assert_eq!(Duration::from_seconds(125).to_string(), "2:05");
        assert_eq!(Duration::from_seconds(3665).to_string(), "1:01:05");
    }

    #[test]
    fn test_serializes_as_plain_millis() {
        let json = serde_json::to_string(&Duration::from_millis(1500)).unwrap();
        assert_eq!(json, "1500");
    }

    #[test]
    fn test_validator_collects_problems() {
        struct Offset(Duration, Duration);

        impl Validator for Offset {
            fn validate(&self) -> Result<(), Vec<String>> {
                if self.0 > self.1 {
                    Err(vec![format!("offset {} past end {}", self.0, self.1)])
                } else {
                    Ok(())
                }
            }
        }

        assert!(Offset(Duration::ZERO, Duration::from_seconds(1)).is_valid());
        assert_eq!(
            Offset(Duration::from_seconds(61), Duration::from_seconds(60))
                .validate()
                .unwrap_err(),
            vec!["offset 1:01 past end 1:00".to_string()]
        );
    }
}

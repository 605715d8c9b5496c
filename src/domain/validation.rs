//! Locally validated inputs.
//!
//! Validation failures never reach the network; screens surface them as a
//! UI error flag.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("collection name must not be empty")]
    EmptyCollectionName,

    #[error("collection name is {length} characters, at most {max} allowed")]
    CollectionNameTooLong { length: usize, max: usize },

    #[error("level {value} is outside {min}..={max}")]
    LevelOutOfRange { value: u32, min: u32, max: u32 },

    #[error("minimum level {min} is greater than maximum level {max}")]
    InvertedLevelRange { min: u32, max: u32 },

    #[error("unknown login platform: {0}")]
    UnknownPlatform(String),
}

// =============================================================================
// CollectionName
// =============================================================================

/// Name of a bookmark collection: 1 to 18 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    pub const MAX_LENGTH: usize = 18;

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCollectionName`] for blank input and
    /// [`ValidationError::CollectionNameTooLong`] above [`Self::MAX_LENGTH`]
    /// characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length == 0 {
            return Err(ValidationError::EmptyCollectionName);
        }
        if length > Self::MAX_LENGTH {
            return Err(ValidationError::CollectionNameTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CollectionName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CollectionName> for String {
    fn from(value: CollectionName) -> Self {
        value.0
    }
}

// =============================================================================
// LevelRange
// =============================================================================

/// Inclusive level filter inside `1..=200`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LevelBounds")]
pub struct LevelRange {
    min: u32,
    max: u32,
}

/// Unchecked wire shape of [`LevelRange`].
#[derive(Deserialize)]
struct LevelBounds {
    min: u32,
    max: u32,
}

impl TryFrom<LevelBounds> for LevelRange {
    type Error = ValidationError;

    fn try_from(bounds: LevelBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.min, bounds.max)
    }
}

impl LevelRange {
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 200;

    /// # Errors
    ///
    /// Returns [`ValidationError::LevelOutOfRange`] when either bound leaves
    /// `1..=200` and [`ValidationError::InvertedLevelRange`] when `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self, ValidationError> {
        for value in [min, max] {
            if !(Self::MIN_LEVEL..=Self::MAX_LEVEL).contains(&value) {
                return Err(ValidationError::LevelOutOfRange {
                    value,
                    min: Self::MIN_LEVEL,
                    max: Self::MAX_LEVEL,
                });
            }
        }
        if min > max {
            return Err(ValidationError::InvertedLevelRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// The unfiltered range.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            min: Self::MIN_LEVEL,
            max: Self::MAX_LEVEL,
        }
    }

    #[must_use]
    pub const fn min(self) -> u32 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }

    #[must_use]
    pub fn contains(self, level: u32) -> bool {
        RangeInclusive::new(self.min, self.max).contains(&level)
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bosses", true)]
    #[case("  padded  ", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("exactly-eighteen-c", true)]
    #[case("nineteen-characters", false)]
    fn collection_name_bounds(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(CollectionName::new(raw).is_ok(), accepted);
    }

    #[rstest]
    fn collection_name_counts_characters_not_bytes() {
        let name = "몬스터".repeat(6);
        assert_eq!(name.chars().count(), 18);
        assert!(CollectionName::new(&name).is_ok());
    }

    #[rstest]
    #[case(0, 10)]
    #[case(1, 201)]
    fn level_range_rejects_out_of_bounds(#[case] min: u32, #[case] max: u32) {
        assert!(matches!(
            LevelRange::new(min, max),
            Err(ValidationError::LevelOutOfRange { .. })
        ));
    }

    #[rstest]
    fn level_range_rejects_inverted_bounds() {
        assert_eq!(
            LevelRange::new(50, 10),
            Err(ValidationError::InvertedLevelRange { min: 50, max: 10 })
        );
    }

    #[rstest]
    #[case(r#"{"min":50,"max":10}"#)]
    #[case(r#"{"min":0,"max":10}"#)]
    #[case(r#"{"min":1,"max":500}"#)]
    fn level_range_deserialization_validates_bounds(#[case] json: &str) {
        assert!(serde_json::from_str::<LevelRange>(json).is_err());
    }

    #[rstest]
    fn level_range_deserializes_valid_bounds() {
        let range: LevelRange = serde_json::from_str(r#"{"min":1,"max":10}"#).unwrap();
        assert_eq!(range, LevelRange::new(1, 10).unwrap());
    }

    proptest! {
        #[test]
        fn prop_valid_range_contains_its_bounds(min in 1u32..=200, span in 0u32..200) {
            let max = (min + span).min(200);
            let range = LevelRange::new(min, max).unwrap();
            prop_assert!(range.contains(min));
            prop_assert!(range.contains(max));
            prop_assert!(!range.contains(max + 1));
        }

        #[test]
        fn prop_collection_name_accepts_up_to_eighteen(length in 1usize..=18) {
            let raw = "a".repeat(length);
            let name = CollectionName::new(&raw).unwrap();
            prop_assert_eq!(name.as_str(), raw.as_str());
        }
    }
}

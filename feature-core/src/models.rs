use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest priority rank that counts as set
pub const MIN_PRIORITY: u8 = 1;

/// Highest priority rank
pub const MAX_PRIORITY: u8 = 10;

/// Priority value meaning "absent, invalid or unset"
pub const UNSET_PRIORITY: u8 = 0;

/// Name given to features created with "add"
pub const DEFAULT_FEATURE_NAME: &str = "Neues Feature";

/// Priority given to features created with "add"
pub const DEFAULT_FEATURE_PRIORITY: u8 = 5;

/// A single feature entry in its canonical shape
///
/// Serialized with the exact field names `Id`, `Name`, `Description` and
/// `Priority`, which is the canonical on-disk JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Feature {
    /// Identifier, intended unique and positive when valid
    #[serde(default)]
    pub id: i64,

    /// Short name of the feature
    #[serde(default)]
    pub name: String,

    /// Longer description of the feature
    #[serde(default)]
    pub description: String,

    /// Priority rank 1..=10, or 0 when unset
    #[serde(default)]
    pub priority: u8,
}

impl Feature {
    /// Creates a feature, clamping the priority into the valid range
    pub fn new(id: i64, name: impl Into<String>, description: impl Into<String>, priority: i64) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            priority: sanitize_priority(priority),
        }
    }

    /// Whether the priority holds a real rank
    pub fn has_priority(&self) -> bool {
        (MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

/// Collapses any value outside `1..=10` to `0`
pub fn sanitize_priority(value: i64) -> u8 {
    if (MIN_PRIORITY as i64..=MAX_PRIORITY as i64).contains(&value) {
        value as u8
    } else {
        UNSET_PRIORITY
    }
}

/// Sorts features ascending by id; equal ids keep their relative order
pub fn sort_by_id(features: &mut [Feature]) {
    features.sort_by_key(|f| f.id);
}

/// A partially extracted record, before sanitization
///
/// Every field starts unset. Parsers fill in what they can find and
/// [`Draft::into_feature`] applies the defaults and the priority clamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i64>,
}

impl Draft {
    /// True when no field has been extracted
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.description.is_none() && self.priority.is_none()
    }

    /// Applies sanitization and produces the canonical record
    pub fn into_feature(self) -> Feature {
        Feature {
            id: self.id.unwrap_or(0),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            priority: self.priority.map(sanitize_priority).unwrap_or(UNSET_PRIORITY),
        }
    }
}

//! Strongly-typed identifier value objects.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Separator used by hierarchical path identifiers (`"1.2.3"`).
pub const PATH_SEPARATOR: char = '.';

/// Identifier of a record within one data domain.
///
/// Sources deliver either integer surrogate keys (paired with an explicit
/// relation table) or dot-separated path strings. Both are kept as text so
/// the two shapes compare and hash the same way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a RecordId, rejecting blank values.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent path obtained by stripping the last segment.
    ///
    /// Single-segment identifiers have no parent.
    pub fn parent_path(&self) -> Option<RecordId> {
        let (parent, _) = self.0.rsplit_once(PATH_SEPARATOR)?;
        RecordId::new(parent).ok()
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(i64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Int(id) => Ok(RecordId::from(id)),
            Wire::Text(id) => RecordId::new(id).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_rejects_blank() {
        assert!(RecordId::new("   ").is_err());
        assert!(RecordId::new("").is_err());
    }

    #[test]
    fn record_id_trims_whitespace() {
        assert_eq!(RecordId::new(" 1.2 ").unwrap().as_str(), "1.2");
    }

    #[test]
    fn record_id_from_integer_matches_string_form() {
        assert_eq!(RecordId::from(42), RecordId::new("42").unwrap());
    }

    #[test]
    fn parent_path_strips_last_segment() {
        let id: RecordId = "1.1.2.3".parse().unwrap();
        assert_eq!(id.parent_path().unwrap().as_str(), "1.1.2");
    }

    #[test]
    fn single_segment_has_no_parent() {
        let id: RecordId = "7".parse().unwrap();
        assert!(id.parent_path().is_none());
    }

    #[test]
    fn deserializes_from_number_or_string() {
        let a: RecordId = serde_json::from_str("12").unwrap();
        let b: RecordId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<RecordId>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&RecordId::from(3)).unwrap();
        assert_eq!(json, "\"3\"");
    }
}

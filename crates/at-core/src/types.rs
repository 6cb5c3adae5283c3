//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Invalid tie-break value.
    #[error("invalid tie-break: {value} (expected \"identity\" or \"submission\")")]
    InvalidTieBreak { value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated schedule item identifier.
    ///
    /// Item IDs must be non-empty. They are the single canonical identity of an
    /// item: every segment derived from an item points back at it by this value.
    ItemId, "item ID"
);

/// Secondary key used to order items that share the same intended slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Equal slots are ordered by [`ItemId`].
    #[default]
    Identity,
    /// Equal slots keep the order in which items were supplied.
    Submission,
}

impl TieBreak {
    /// String representation for configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Submission => "submission",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TieBreak {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(Self::Identity),
            "submission" => Ok(Self::Submission),
            _ => Err(ValidationError::InvalidTieBreak {
                value: s.to_string(),
            }),
        }
    }
}

/// Whether a segment covers the start of its item or a later day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// The segment containing the item's actual start.
    Primary,
    /// A later calendar day still covered by the item's duration.
    Continuation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_rejects_empty() {
        assert!(ItemId::new("").is_err());
        assert!(ItemId::new("item-00001").is_ok());
    }

    #[test]
    fn item_id_serde_roundtrip() {
        let id = ItemId::new("news-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"news-1\"");
        let parsed: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn item_id_serde_rejects_empty() {
        let result: Result<ItemId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn item_ids_order_lexicographically() {
        let a = ItemId::new("item-00002").unwrap();
        let b = ItemId::new("item-00010").unwrap();
        assert!(a < b);
    }

    #[test]
    fn tie_break_from_str() {
        assert_eq!("identity".parse::<TieBreak>().unwrap(), TieBreak::Identity);
        assert_eq!(
            "submission".parse::<TieBreak>().unwrap(),
            TieBreak::Submission
        );
        let err = "random".parse::<TieBreak>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid tie-break: random (expected \"identity\" or \"submission\")"
        );
    }

    #[test]
    fn tie_break_defaults_to_identity() {
        assert_eq!(TieBreak::default(), TieBreak::Identity);
    }

    #[test]
    fn tie_break_serde_uses_lowercase() {
        let json = serde_json::to_string(&TieBreak::Submission).unwrap();
        assert_eq!(json, "\"submission\"");
        let parsed: TieBreak = serde_json::from_str("\"identity\"").unwrap();
        assert_eq!(parsed, TieBreak::Identity);
    }

    #[test]
    fn segment_kind_serde_uses_lowercase() {
        let json = serde_json::to_string(&SegmentKind::Continuation).unwrap();
        assert_eq!(json, "\"continuation\"");
    }
}

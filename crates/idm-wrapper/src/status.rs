//! Lifecycle status tags for objects, containers and values

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Whether an object (or container) is being created or edited
///
/// Set once at construction; drives every read-only and visibility decision
/// below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectStatus {
    /// Being created
    Adding,
    /// Existing, being edited
    Modifying,
}

impl ObjectStatus {
    /// Check if adding
    #[inline]
    #[must_use]
    pub fn is_adding(self) -> bool {
        self == Self::Adding
    }
}

impl Display for ObjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adding => f.write_str("ADDING"),
            Self::Modifying => f.write_str("MODIFYING"),
        }
    }
}

/// Unknown status keyword
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown object status '{0}' (expected adding or modifying)")]
pub struct ParseStatusError(String);

impl FromStr for ObjectStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "adding" => Ok(Self::Adding),
            "modifying" => Ok(Self::Modifying),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Lifecycle tag of one concrete value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStatus {
    /// New slot, not present in the original object
    Added,
    /// Copied from the original object, untouched
    NotChanged,
    /// Copied from the original object, then edited
    Modified,
    /// Copied from the original object, then removed
    Deleted,
}

impl Display for ValueStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => f.write_str("ADDED"),
            Self::NotChanged => f.write_str("NOT_CHANGED"),
            Self::Modified => f.write_str("MODIFIED"),
            Self::Deleted => f.write_str("DELETED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_status_parses_case_insensitively() {
        assert_eq!("Adding".parse::<ObjectStatus>().unwrap(), ObjectStatus::Adding);
        assert_eq!("MODIFYING".parse::<ObjectStatus>().unwrap(), ObjectStatus::Modifying);
        assert!("deleting".parse::<ObjectStatus>().is_err());
    }

    #[test]
    fn display_uses_upper_case_tags() {
        assert_eq!(ObjectStatus::Adding.to_string(), "ADDING");
        assert_eq!(ValueStatus::NotChanged.to_string(), "NOT_CHANGED");
    }
}

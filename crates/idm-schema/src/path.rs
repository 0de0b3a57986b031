//! Item paths for addressing within objects
//!
//! Provides [`ItemPath`] for hierarchical addressing of items and container
//! values within an object.

use crate::name::ItemName;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of an [`ItemPath`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// Item name step
    Name(ItemName),
    /// Container value id step (selects one value of a multi-valued container)
    Id(u64),
}

impl PathSegment {
    /// Name of this segment, if it is a name step
    #[inline]
    #[must_use]
    pub fn as_name(&self) -> Option<&ItemName> {
        match self {
            Self::Name(name) => Some(name),
            Self::Id(_) => None,
        }
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Path within an object tree
///
/// Used to address containers for lookup and items for change sets.
///
/// # Examples
/// - `["activation", "validFrom"]` → `activation/validFrom`
/// - `["assignment", 3, "activation"]` → `assignment/3/activation`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemPath(Vec<PathSegment>);

impl ItemPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Create path from a single name
    #[inline]
    #[must_use]
    pub fn single(name: impl Into<ItemName>) -> Self {
        Self(vec![PathSegment::Name(name.into())])
    }

    /// Empty path (the object root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last name segment, skipping trailing ids
    #[inline]
    #[must_use]
    pub fn last_name(&self) -> Option<&ItemName> {
        self.0.iter().rev().find_map(PathSegment::as_name)
    }

    /// Append a name, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, name: impl Into<ItemName>) -> Self {
        let mut new = self.clone();
        new.0.push(PathSegment::Name(name.into()));
        new
    }

    /// Append a container value id, returning new path
    #[inline]
    #[must_use]
    pub fn child_id(&self, id: u64) -> Self {
        let mut new = self.clone();
        new.0.push(PathSegment::Id(id));
        new
    }

    /// Same path with all id segments removed
    ///
    /// Definitions are addressed by names only.
    #[must_use]
    pub fn names_only(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|segment| matches!(segment, PathSegment::Name(_)))
                .cloned()
                .collect(),
        )
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.0.iter()
    }
}

impl Display for ItemPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ItemPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<PathSegment> = s
            .split('/')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else if seg.chars().all(|c| c.is_ascii_digit()) {
                    seg.parse::<u64>()
                        .map(PathSegment::Id)
                        .map_err(|_| PathError::InvalidSegment(seg.to_string()))
                } else if seg.chars().any(char::is_whitespace) {
                    Err(PathError::InvalidSegment(seg.to_string()))
                } else {
                    Ok(PathSegment::Name(ItemName::from(seg)))
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

impl From<ItemName> for ItemPath {
    fn from(name: ItemName) -> Self {
        Self::single(name)
    }
}

impl Serialize for ItemPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors related to item paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0}")]
    InvalidSegment(String),
}

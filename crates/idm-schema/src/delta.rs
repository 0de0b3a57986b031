//! Change sets for object modifications
//!
//! Provides [`ChangeSet`], the object-level delta handed to the change
//! execution service, built from per-path [`DeltaOperation`]s.

use crate::object::{ObjectType, PrismValue};
use crate::path::ItemPath;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Whether the change set creates or modifies its object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// Object is being created
    Add,
    /// Existing object is being changed
    Modify,
}

/// One value-level operation on an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaOperation {
    /// Add a value to the item
    Add(PrismValue),

    /// Remove a value from the item
    Delete(PrismValue),

    /// Replace all values of the item (empty list clears it)
    Replace(Vec<PrismValue>),
}

impl Display for DeltaOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(value) => write!(f, "add {value}"),
            Self::Delete(value) => write!(f, "delete {value}"),
            Self::Replace(values) => {
                f.write_str("replace [")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Aggregated operations on one item path
///
/// # Invariants
/// - `values_to_replace` is exclusive with adds and deletes for
///   single-valued items
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemDelta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values_to_add: Vec<PrismValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values_to_delete: Vec<PrismValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values_to_replace: Option<Vec<PrismValue>>,
}

impl ItemDelta {
    /// Create empty item delta
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one operation into this delta
    pub fn apply(&mut self, operation: DeltaOperation) {
        match operation {
            DeltaOperation::Add(value) => self.values_to_add.push(value),
            DeltaOperation::Delete(value) => self.values_to_delete.push(value),
            DeltaOperation::Replace(values) => {
                self.values_to_replace
                    .get_or_insert_with(Vec::new)
                    .extend(values);
            }
        }
    }

    /// Values to add
    #[inline]
    #[must_use]
    pub fn values_to_add(&self) -> &[PrismValue] {
        &self.values_to_add
    }

    /// Values to delete
    #[inline]
    #[must_use]
    pub fn values_to_delete(&self) -> &[PrismValue] {
        &self.values_to_delete
    }

    /// Replacement values, if this is a replace delta
    #[inline]
    #[must_use]
    pub fn values_to_replace(&self) -> Option<&[PrismValue]> {
        self.values_to_replace.as_deref()
    }

    /// Check if delta carries no operation
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values_to_add.is_empty()
            && self.values_to_delete.is_empty()
            && self.values_to_replace.is_none()
    }
}

/// Object-level delta keyed by item path
///
/// # Invariants
/// - no entry holds an empty [`ItemDelta`]
/// - entries keep the order in which their paths were first touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    oid: Option<String>,
    object_type: ObjectType,
    change_type: ChangeType,
    #[serde(default)]
    item_deltas: IndexMap<ItemPath, ItemDelta>,
}

impl ChangeSet {
    /// Create empty change set
    #[inline]
    #[must_use]
    pub fn new(oid: Option<String>, object_type: ObjectType, change_type: ChangeType) -> Self {
        Self {
            oid,
            object_type,
            change_type,
            item_deltas: IndexMap::new(),
        }
    }

    /// Record one operation at a path
    pub fn record(&mut self, path: ItemPath, operation: DeltaOperation) {
        self.item_deltas.entry(path).or_default().apply(operation);
    }

    /// Target object identifier
    #[inline]
    #[must_use]
    pub fn oid(&self) -> Option<&str> {
        self.oid.as_deref()
    }

    /// Target object type
    #[inline]
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Add or modify
    #[inline]
    #[must_use]
    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// Item delta at a path
    #[inline]
    #[must_use]
    pub fn item_delta(&self, path: &ItemPath) -> Option<&ItemDelta> {
        self.item_deltas.get(path)
    }

    /// Iterate over item deltas in recording order
    pub fn iter(&self) -> impl Iterator<Item = (&ItemPath, &ItemDelta)> {
        self.item_deltas.iter()
    }

    /// Paths touched by this change set
    pub fn paths(&self) -> impl Iterator<Item = &ItemPath> {
        self.item_deltas.keys()
    }

    /// Number of touched paths
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.item_deltas.len()
    }

    /// Check if change set carries no operation
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_deltas.is_empty()
    }
}

impl Display for ChangeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:?} {} {}",
            self.change_type,
            self.object_type,
            self.oid.as_deref().unwrap_or("(new)")
        )?;
        for (path, delta) in &self.item_deltas {
            for value in &delta.values_to_add {
                writeln!(f, "  {path}: add {value}")?;
            }
            for value in &delta.values_to_delete {
                writeln!(f, "  {path}: delete {value}")?;
            }
            if let Some(values) = &delta.values_to_replace {
                writeln!(f, "  {path}: {}", DeltaOperation::Replace(values.clone()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::PropertyValue;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> PrismValue {
        PrismValue::Property(PropertyValue::from(s))
    }

    #[test]
    fn change_set_starts_empty() {
        let change_set = ChangeSet::new(Some("oid-1".into()), ObjectType::User, ChangeType::Modify);
        assert!(change_set.is_empty());
        assert_eq!(change_set.len(), 0);
        assert_eq!(change_set.oid(), Some("oid-1"));
    }

    #[test]
    fn record_aggregates_by_path() {
        let mut change_set = ChangeSet::new(None, ObjectType::User, ChangeType::Add);
        let path = ItemPath::single("employeeType");
        change_set.record(path.clone(), DeltaOperation::Add(text("contractor")));
        change_set.record(path.clone(), DeltaOperation::Delete(text("employee")));
        change_set.record(ItemPath::single("givenName"), DeltaOperation::Replace(vec![text("Jack")]));

        assert_eq!(change_set.len(), 2);
        let delta = change_set.item_delta(&path).unwrap();
        assert_eq!(delta.values_to_add(), &[text("contractor")]);
        assert_eq!(delta.values_to_delete(), &[text("employee")]);
        assert!(delta.values_to_replace().is_none());

        let paths: Vec<String> = change_set.paths().map(ToString::to_string).collect();
        assert_eq!(paths, vec!["employeeType", "givenName"]);
    }

    #[test]
    fn empty_replace_is_not_empty_delta() {
        let mut delta = ItemDelta::new();
        delta.apply(DeltaOperation::Replace(Vec::new()));
        assert!(!delta.is_empty());
        assert_eq!(delta.values_to_replace(), Some(&[][..]));
    }

    #[test]
    fn operation_display() {
        assert_eq!(DeltaOperation::Add(text("a")).to_string(), "add a");
        assert_eq!(DeltaOperation::Delete(text("a")).to_string(), "delete a");
        assert_eq!(DeltaOperation::Replace(vec![text("a"), text("b")]).to_string(), "replace [a, b]");
    }

    #[test]
    fn change_set_serializes_paths_as_keys() {
        let mut change_set = ChangeSet::new(Some("oid-1".into()), ObjectType::User, ChangeType::Modify);
        change_set.record("activation/validTo".parse().unwrap(), DeltaOperation::Replace(vec![]));
        let json = serde_json::to_value(&change_set).unwrap();
        assert!(json["item_deltas"].get("activation/validTo").is_some());
        let back: ChangeSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, change_set);
    }

    #[test]
    fn display_lists_operations() {
        let mut change_set = ChangeSet::new(Some("oid-1".into()), ObjectType::User, ChangeType::Modify);
        change_set.record(ItemPath::single("givenName"), DeltaOperation::Replace(vec![text("Jack")]));
        let rendered = change_set.to_string();
        assert!(rendered.contains("givenName: replace [Jack]"));
    }
}

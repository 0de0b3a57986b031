//! Item definitions
//!
//! Schema metadata describing items: kind, multiplicity, permissions and
//! display hints. Container definitions nest child definitions.

use crate::name::ItemName;
use crate::object::ObjectType;
use crate::path::{ItemPath, PathSegment};
use serde::{Deserialize, Serialize};

/// What an item holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Scalar values
    #[default]
    Property,
    /// Links to other objects
    Reference,
    /// Nested groups of items
    Container,
}

/// Cardinality of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    /// At most one value
    #[default]
    Single,
    /// Any number of values
    Multi,
}

/// Permission flags of an item
///
/// All permissions default to granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Access {
    /// Item may be read
    pub read: bool,
    /// Item may be set when creating an object
    pub add: bool,
    /// Item may be changed on an existing object
    pub modify: bool,
}

impl Access {
    /// All permissions granted
    #[inline]
    #[must_use]
    pub const fn all() -> Self {
        Self {
            read: true,
            add: true,
            modify: true,
        }
    }

    /// Readable only
    #[inline]
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            read: true,
            add: false,
            modify: false,
        }
    }

    /// No permissions
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self {
            read: false,
            add: false,
            modify: false,
        }
    }
}

impl Default for Access {
    fn default() -> Self {
        Self::all()
    }
}

/// Schema metadata for one item
///
/// # Invariants
/// - `children` is only populated for [`ItemKind::Container`]
/// - child names are unique within a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    name: ItemName,
    #[serde(default)]
    kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(default)]
    multiplicity: Multiplicity,
    #[serde(default)]
    access: Access,
    #[serde(default)]
    ignored: bool,
    #[serde(default)]
    operational: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<ItemDefinition>,
}

impl ItemDefinition {
    fn new(name: impl Into<ItemName>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_name: None,
            multiplicity: Multiplicity::Single,
            access: Access::all(),
            ignored: false,
            operational: false,
            display_name: None,
            display_order: None,
            children: Vec::new(),
        }
    }

    /// Property definition with default metadata
    #[inline]
    #[must_use]
    pub fn property(name: impl Into<ItemName>) -> Self {
        Self::new(name, ItemKind::Property)
    }

    /// Reference definition with default metadata
    #[inline]
    #[must_use]
    pub fn reference(name: impl Into<ItemName>) -> Self {
        Self::new(name, ItemKind::Reference)
    }

    /// Container definition of the given complex type
    #[inline]
    #[must_use]
    pub fn container(name: impl Into<ItemName>, type_name: impl Into<String>) -> Self {
        let mut def = Self::new(name, ItemKind::Container);
        def.type_name = Some(type_name.into());
        def
    }

    /// Mark as multi-valued
    #[inline]
    #[must_use]
    pub fn multi(mut self) -> Self {
        self.multiplicity = Multiplicity::Multi;
        self
    }

    /// Set permissions
    #[inline]
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Mark as ignored
    #[inline]
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Mark as operational (system maintained)
    #[inline]
    #[must_use]
    pub fn operational(mut self) -> Self {
        self.operational = true;
        self
    }

    /// Set display name
    #[inline]
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set display order
    #[inline]
    #[must_use]
    pub fn with_display_order(mut self, order: u32) -> Self {
        self.display_order = Some(order);
        self
    }

    /// Append child definition
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: ItemDefinition) -> Self {
        self.children.push(child);
        self
    }

    /// Append child definitions
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = ItemDefinition>) -> Self {
        self.children.extend(children);
        self
    }

    /// Same definition under a different element name
    #[inline]
    #[must_use]
    pub fn renamed(&self, name: impl Into<ItemName>) -> Self {
        let mut def = self.clone();
        def.name = name.into();
        def
    }

    /// Item name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &ItemName {
        &self.name
    }

    /// Item kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Complex type name (containers)
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Check whether this definition has the given complex type
    #[inline]
    #[must_use]
    pub fn is_of_type(&self, type_name: &str) -> bool {
        self.type_name.as_deref() == Some(type_name)
    }

    /// Check if container
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind == ItemKind::Container
    }

    /// Multiplicity
    #[inline]
    #[must_use]
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// Check if single-valued
    #[inline]
    #[must_use]
    pub fn is_single_valued(&self) -> bool {
        self.multiplicity == Multiplicity::Single
    }

    /// Permission flags
    #[inline]
    #[must_use]
    pub fn access(&self) -> Access {
        self.access
    }

    /// May be read
    #[inline]
    #[must_use]
    pub fn can_read(&self) -> bool {
        self.access.read
    }

    /// May be set on object creation
    #[inline]
    #[must_use]
    pub fn can_add(&self) -> bool {
        self.access.add
    }

    /// May be changed on an existing object
    #[inline]
    #[must_use]
    pub fn can_modify(&self) -> bool {
        self.access.modify
    }

    /// Check if ignored
    #[inline]
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Check if operational
    #[inline]
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Explicit display name
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Display order hint
    #[inline]
    #[must_use]
    pub fn display_order(&self) -> Option<u32> {
        self.display_order
    }

    /// Child definitions
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[ItemDefinition] {
        &self.children
    }

    /// Find direct child by name
    #[inline]
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&ItemDefinition> {
        self.children.iter().find(|child| child.name == *name)
    }

    /// Find descendant definition by relative path
    ///
    /// Id segments are skipped; the empty path resolves to `self`.
    #[must_use]
    pub fn find(&self, path: &ItemPath) -> Option<&ItemDefinition> {
        let mut current = self;
        for segment in path.iter() {
            if let PathSegment::Name(name) = segment {
                current = current.find_child(name.as_str())?;
            }
        }
        Some(current)
    }
}

/// Root definition of an object type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    object_type: ObjectType,
    root: ItemDefinition,
}

impl ObjectDefinition {
    /// Create object definition with the given root container
    #[inline]
    #[must_use]
    pub fn new(object_type: ObjectType, root: ItemDefinition) -> Self {
        Self { object_type, root }
    }

    /// Object type
    #[inline]
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Root container definition
    #[inline]
    #[must_use]
    pub fn root(&self) -> &ItemDefinition {
        &self.root
    }

    /// Find definition by path from the object root
    #[inline]
    #[must_use]
    pub fn find(&self, path: &ItemPath) -> Option<&ItemDefinition> {
        self.root.find(path)
    }
}

/// Errors resolving definitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// No root definition registered for an object type
    #[error("no definition for object type {0}")]
    MissingObjectDefinition(ObjectType),

    /// No definition at a path
    #[error("no definition for {object_type} at '{path}'")]
    MissingPath {
        object_type: ObjectType,
        path: ItemPath,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::types;

    fn activation() -> ItemDefinition {
        ItemDefinition::container("activation", types::ACTIVATION_TYPE)
            .with_child(ItemDefinition::property("administrativeStatus"))
            .with_child(ItemDefinition::property("validFrom"))
    }

    #[test]
    fn defaults_are_permissive_single_valued() {
        let def = ItemDefinition::property("givenName");
        assert!(def.can_read() && def.can_add() && def.can_modify());
        assert!(def.is_single_valued());
        assert!(!def.is_ignored());
        assert!(!def.is_operational());
    }

    #[test]
    fn builder_sets_metadata() {
        let def = ItemDefinition::reference("parentOrgRef")
            .multi()
            .with_access(Access::read_only())
            .with_display_name("Parent org")
            .with_display_order(70);
        assert_eq!(def.kind(), ItemKind::Reference);
        assert_eq!(def.multiplicity(), Multiplicity::Multi);
        assert!(def.can_read());
        assert!(!def.can_modify());
        assert_eq!(def.display_name(), Some("Parent org"));
        assert_eq!(def.display_order(), Some(70));
    }

    #[test]
    fn find_nested_skips_ids() {
        let root = ItemDefinition::container("user", "UserType").with_child(
            ItemDefinition::container("assignment", types::ASSIGNMENT_TYPE)
                .multi()
                .with_child(activation()),
        );
        let path: ItemPath = "assignment/4/activation/validFrom".parse().unwrap();
        assert_eq!(root.find(&path).unwrap().name().as_str(), "validFrom");
        assert!(root.find(&ItemPath::root()).is_some());
        assert!(root.find(&"assignment/missing".parse().unwrap()).is_none());
    }

    #[test]
    fn renamed_keeps_metadata() {
        let renamed = activation().renamed("group");
        assert_eq!(renamed.name().as_str(), "group");
        assert!(renamed.is_of_type(types::ACTIVATION_TYPE));
        assert_eq!(renamed.children().len(), 2);
    }

    #[test]
    fn deserializes_with_defaults() {
        let def: ItemDefinition =
            serde_json::from_str(r#"{"name":"employeeNumber","access":{"modify":false}}"#).unwrap();
        assert_eq!(def.kind(), ItemKind::Property);
        assert!(def.can_read());
        assert!(def.can_add());
        assert!(!def.can_modify());
    }
}

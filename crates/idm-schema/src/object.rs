//! Object values
//!
//! The in-memory form of identity objects: a root [`ContainerValue`] holding
//! property, reference and nested container values by item name.

use crate::definition::{ItemDefinition, ItemKind};
use crate::name::{names, ItemName};
use crate::path::{ItemPath, PathSegment};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Closed set of object types the console edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    /// Person identity
    User,
    /// Role
    Role,
    /// Organizational unit
    Org,
    /// Account on a connected system (resource object shadow)
    Shadow,
    /// Connected system definition
    Resource,
}

impl ObjectType {
    /// Schema type name
    #[inline]
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::User => "UserType",
            Self::Role => "RoleType",
            Self::Org => "OrgType",
            Self::Shadow => "ShadowType",
            Self::Resource => "ResourceType",
        }
    }

    /// Element name of the root container
    #[inline]
    #[must_use]
    pub fn element_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
            Self::Org => "org",
            Self::Shadow => "shadow",
            Self::Resource => "resource",
        }
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Scalar property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Text
    String(String),
    /// Whole number
    Integer(i64),
    /// Flag
    Boolean(bool),
    /// Point in time (UTC)
    Timestamp(DateTime<Utc>),
}

impl PropertyValue {
    /// Text content, if a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Timestamp content, if a timestamp
    #[inline]
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Link to another object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceValue {
    /// Target object identifier
    pub oid: String,
    /// Target object type
    pub target_type: ObjectType,
    /// Target name, when the target was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
}

impl ReferenceValue {
    /// Unresolved reference
    #[inline]
    #[must_use]
    pub fn new(oid: impl Into<String>, target_type: ObjectType) -> Self {
        Self {
            oid: oid.into(),
            target_type,
            target_name: None,
        }
    }

    /// Attach resolved target name
    #[inline]
    #[must_use]
    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }
}

impl Display for ReferenceValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.target_name {
            Some(name) => write!(f, "{}:{} ({name})", self.target_type, self.oid),
            None => write!(f, "{}:{}", self.target_type, self.oid),
        }
    }
}

/// One group of items inside a container
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(default)]
    items: IndexMap<ItemName, Vec<PrismValue>>,
}

impl ContainerValue {
    /// Empty container value without id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty container value with id
    #[inline]
    #[must_use]
    pub fn with_id(id: u64) -> Self {
        Self {
            id: Some(id),
            items: IndexMap::new(),
        }
    }

    /// Container value id
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Append a value to an item
    #[must_use]
    pub fn with_value(mut self, name: impl Into<ItemName>, value: PrismValue) -> Self {
        self.push(name, value);
        self
    }

    /// Append a property value
    #[inline]
    #[must_use]
    pub fn with_property(self, name: impl Into<ItemName>, value: impl Into<PropertyValue>) -> Self {
        self.with_value(name, PrismValue::Property(value.into()))
    }

    /// Append a reference value
    #[inline]
    #[must_use]
    pub fn with_reference(self, name: impl Into<ItemName>, value: ReferenceValue) -> Self {
        self.with_value(name, PrismValue::Reference(value))
    }

    /// Append a nested container value
    #[inline]
    #[must_use]
    pub fn with_container(self, name: impl Into<ItemName>, value: ContainerValue) -> Self {
        self.with_value(name, PrismValue::Container(value))
    }

    /// Append a value to an item in place
    pub fn push(&mut self, name: impl Into<ItemName>, value: PrismValue) {
        self.items.entry(name.into()).or_default().push(value);
    }

    /// Values of an item; empty when the item is absent
    #[inline]
    #[must_use]
    pub fn values(&self, name: &str) -> &[PrismValue] {
        self.items.get(name).map_or(&[], Vec::as_slice)
    }

    /// Check if item is present with at least one value
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        !self.values(name).is_empty()
    }

    /// Check if container value holds no items
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.values().all(Vec::is_empty)
    }

    /// Iterate over items in insertion order
    pub fn items(&self) -> impl Iterator<Item = (&ItemName, &[PrismValue])> {
        self.items.iter().map(|(name, values)| (name, values.as_slice()))
    }

    /// First property value of an item
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.values(name).iter().find_map(PrismValue::as_property)
    }

    /// First reference value of an item
    #[must_use]
    pub fn reference(&self, name: &str) -> Option<&ReferenceValue> {
        self.values(name).iter().find_map(PrismValue::as_reference)
    }

    /// Nested container values of an item
    pub fn container_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a ContainerValue> {
        self.values(name).iter().filter_map(PrismValue::as_container)
    }
}

/// Any value an item can hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PrismValue {
    /// Scalar value
    Property(PropertyValue),
    /// Object link
    Reference(ReferenceValue),
    /// Nested container value
    Container(ContainerValue),
}

impl PrismValue {
    /// Item kind this value belongs to
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Property(_) => ItemKind::Property,
            Self::Reference(_) => ItemKind::Reference,
            Self::Container(_) => ItemKind::Container,
        }
    }

    /// Property content
    #[inline]
    #[must_use]
    pub fn as_property(&self) -> Option<&PropertyValue> {
        match self {
            Self::Property(value) => Some(value),
            _ => None,
        }
    }

    /// Reference content
    #[inline]
    #[must_use]
    pub fn as_reference(&self) -> Option<&ReferenceValue> {
        match self {
            Self::Reference(value) => Some(value),
            _ => None,
        }
    }

    /// Container content
    #[inline]
    #[must_use]
    pub fn as_container(&self) -> Option<&ContainerValue> {
        match self {
            Self::Container(value) => Some(value),
            _ => None,
        }
    }
}

impl Display for PrismValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(value) => write!(f, "{value}"),
            Self::Reference(value) => write!(f, "{value}"),
            Self::Container(value) => match value.id() {
                Some(id) => write!(f, "container #{id}"),
                None => f.write_str("container"),
            },
        }
    }
}

impl From<PropertyValue> for PrismValue {
    fn from(value: PropertyValue) -> Self {
        Self::Property(value)
    }
}

impl From<ReferenceValue> for PrismValue {
    fn from(value: ReferenceValue) -> Self {
        Self::Reference(value)
    }
}

impl From<ContainerValue> for PrismValue {
    fn from(value: ContainerValue) -> Self {
        Self::Container(value)
    }
}

/// A typed identity object
///
/// # Invariants
/// - `root` is the single value of the object's root container
/// - `embedded_definitions` keys are name-only paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrismObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    oid: Option<String>,
    object_type: ObjectType,
    #[serde(default)]
    root: ContainerValue,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    embedded_definitions: IndexMap<ItemPath, ItemDefinition>,
}

impl PrismObject {
    /// New object without oid or values
    #[inline]
    #[must_use]
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            oid: None,
            object_type,
            root: ContainerValue::new(),
            embedded_definitions: IndexMap::new(),
        }
    }

    /// Set oid
    #[inline]
    #[must_use]
    pub fn with_oid(mut self, oid: impl Into<String>) -> Self {
        self.oid = Some(oid.into());
        self
    }

    /// Replace root container value
    #[inline]
    #[must_use]
    pub fn with_root(mut self, root: ContainerValue) -> Self {
        self.root = root;
        self
    }

    /// Attach a definition that travels with this object instance
    #[inline]
    #[must_use]
    pub fn with_embedded_definition(mut self, path: ItemPath, definition: ItemDefinition) -> Self {
        self.embedded_definitions.insert(path.names_only(), definition);
        self
    }

    /// Object identifier (absent for objects not yet created)
    #[inline]
    #[must_use]
    pub fn oid(&self) -> Option<&str> {
        self.oid.as_deref()
    }

    /// Object type
    #[inline]
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Root container value
    #[inline]
    #[must_use]
    pub fn root(&self) -> &ContainerValue {
        &self.root
    }

    /// Mutable root container value
    #[inline]
    pub fn root_mut(&mut self) -> &mut ContainerValue {
        &mut self.root
    }

    /// Definition embedded in this object at a path
    #[inline]
    #[must_use]
    pub fn embedded_definition(&self, path: &ItemPath) -> Option<&ItemDefinition> {
        self.embedded_definitions.get(&path.names_only())
    }

    /// Object name (first value of `name`)
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.root.property(names::NAME).and_then(PropertyValue::as_str)
    }

    /// Resource link of a shadow
    #[inline]
    #[must_use]
    pub fn resource_ref(&self) -> Option<&ReferenceValue> {
        self.root.reference(names::RESOURCE_REF)
    }

    /// Container values addressed by a path
    ///
    /// Name segments fan out over all values of the named container; id
    /// segments narrow to the value carrying that id. The root path yields
    /// the root value.
    #[must_use]
    pub fn find_container_values(&self, path: &ItemPath) -> Vec<&ContainerValue> {
        let mut current = vec![&self.root];
        for segment in path.iter() {
            match segment {
                PathSegment::Name(name) => {
                    current = current
                        .into_iter()
                        .flat_map(|value| value.container_values(name.as_str()))
                        .collect();
                }
                PathSegment::Id(id) => current.retain(|value| value.id() == Some(*id)),
            }
        }
        current
    }
}

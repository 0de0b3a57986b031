//! Schema and refinement services
//!
//! The engine consumes two external collaborators through the traits here:
//! [`DefinitionLookup`] for static schema metadata and [`RefinementService`]
//! for resource-specific metadata of shadows. In-memory implementations are
//! provided for embedding and testing.

use crate::definition::{ItemDefinition, ObjectDefinition};
use crate::name::{names, ItemName};
use crate::object::{ObjectType, PrismObject};
use crate::path::ItemPath;
use dashmap::DashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static schema lookup
pub trait DefinitionLookup {
    /// Root definition of an object type
    fn object_definition(&self, object_type: ObjectType) -> Option<&ObjectDefinition>;

    /// Definition at a path below an object type's root
    fn definition_for(&self, object_type: ObjectType, path: &ItemPath) -> Option<&ItemDefinition> {
        self.object_definition(object_type)?.find(path)
    }
}

/// Resource-specific metadata for shadows
///
/// Implementations may perform blocking I/O. Calls are made synchronously
/// while a wrapper tree is being built and are not retried.
pub trait RefinementService {
    /// Refined definition of the shadow's `attributes` container
    ///
    /// # Errors
    /// Returns error if the shadow's resource or its schema cannot be resolved
    fn refined_attributes_definition(
        &self,
        shadow: &PrismObject,
    ) -> Result<ItemDefinition, RefinementError>;

    /// Association names the shadow's object class declares as legal
    ///
    /// # Errors
    /// Returns error if the shadow's resource or its schema cannot be resolved
    fn legal_association_names(&self, shadow: &PrismObject) -> Result<Vec<ItemName>, RefinementError>;

    /// Optional behaviors supported by the shadow's resource
    ///
    /// # Errors
    /// Returns error if the shadow's resource cannot be resolved
    fn capabilities(&self, shadow: &PrismObject) -> Result<CapabilityDescriptor, RefinementError>;
}

/// Activation behaviors a resource supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationCapability {
    /// Validity window start
    pub valid_from: bool,
    /// Validity window end
    pub valid_to: bool,
    /// Enable/disable
    pub status: bool,
}

impl ActivationCapability {
    /// Every activation behavior supported
    #[inline]
    #[must_use]
    pub const fn full() -> Self {
        Self {
            valid_from: true,
            valid_to: true,
            status: true,
        }
    }
}

/// Optional behaviors of a connected system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityDescriptor {
    /// Activation capability; `None` means activation is not supported
    pub activation: Option<ActivationCapability>,
}

impl CapabilityDescriptor {
    /// Descriptor with the given activation capability
    #[inline]
    #[must_use]
    pub fn with_activation(activation: ActivationCapability) -> Self {
        Self {
            activation: Some(activation),
        }
    }

    /// Check whether an activation field is backed by the resource
    ///
    /// Fields outside the capability-gated set are always supported.
    #[must_use]
    pub fn supports_activation_field(&self, name: &str) -> bool {
        let activation = self.activation.unwrap_or_default();
        match name {
            names::VALID_FROM => activation.valid_from,
            names::VALID_TO => activation.valid_to,
            names::ADMINISTRATIVE_STATUS => activation.status,
            _ => true,
        }
    }
}

/// Errors from the refinement service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefinementError {
    /// Shadow carries no resource link
    #[error("shadow has no resource reference")]
    MissingResourceRef,

    /// Linked resource is unknown
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Resource has no refined attribute schema
    #[error("no refined schema for resource {0}")]
    NoRefinedSchema(String),

    /// Service cannot answer
    #[error("refinement unavailable: {0}")]
    Unavailable(String),
}

/// Errors loading registries
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Malformed JSON
    #[error("invalid registry json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Same object type registered twice
    #[error("duplicate definition for object type {0}")]
    DuplicateObjectType(ObjectType),
}

/// In-memory schema registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ObjectDefinition>", into = "Vec<ObjectDefinition>")]
pub struct SchemaRegistry {
    definitions: HashMap<ObjectType, ObjectDefinition>,
}

impl SchemaRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object definition, replacing any previous one for its type
    pub fn register(&mut self, definition: ObjectDefinition) {
        tracing::debug!(object_type = %definition.object_type(), "registering object definition");
        self.definitions.insert(definition.object_type(), definition);
    }

    /// Builder-style register
    #[inline]
    #[must_use]
    pub fn with(mut self, definition: ObjectDefinition) -> Self {
        self.register(definition);
        self
    }

    /// Load from a JSON array of object definitions
    ///
    /// # Errors
    /// Returns error if JSON is invalid or an object type appears twice
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let definitions: Vec<ObjectDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for definition in definitions {
            if registry.definitions.contains_key(&definition.object_type()) {
                return Err(RegistryError::DuplicateObjectType(definition.object_type()));
            }
            registry.register(definition);
        }
        Ok(registry)
    }

    /// Number of registered object types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl DefinitionLookup for SchemaRegistry {
    fn object_definition(&self, object_type: ObjectType) -> Option<&ObjectDefinition> {
        self.definitions.get(&object_type)
    }
}

impl From<Vec<ObjectDefinition>> for SchemaRegistry {
    fn from(definitions: Vec<ObjectDefinition>) -> Self {
        definitions
            .into_iter()
            .fold(Self::new(), |registry, definition| registry.with(definition))
    }
}

impl From<SchemaRegistry> for Vec<ObjectDefinition> {
    fn from(registry: SchemaRegistry) -> Self {
        let mut definitions: Vec<_> = registry.definitions.into_values().collect();
        definitions.sort_by_key(ObjectDefinition::object_type);
        definitions
    }
}

/// Refinement data of one resource
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceEntry {
    /// Refined `attributes` container definition
    pub attributes: Option<ItemDefinition>,
    /// Legal association names
    pub associations: Vec<ItemName>,
    /// Supported optional behaviors
    pub capabilities: CapabilityDescriptor,
}

/// In-memory refinement service keyed by resource oid
///
/// Safe to share between sessions; entries can be registered concurrently.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: DashMap<String, ResourceEntry>,
}

impl ResourceRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from oid → entry pairs
    #[must_use]
    pub fn from_entries(entries: IndexMap<String, ResourceEntry>) -> Self {
        let registry = Self::new();
        for (oid, entry) in entries {
            registry.register(oid, entry);
        }
        registry
    }

    /// Register or replace a resource entry
    pub fn register(&self, oid: impl Into<String>, entry: ResourceEntry) {
        self.entries.insert(oid.into(), entry);
    }

    /// Number of registered resources
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with_entry<R>(
        &self,
        shadow: &PrismObject,
        f: impl FnOnce(&str, &ResourceEntry) -> Result<R, RefinementError>,
    ) -> Result<R, RefinementError> {
        let resource = shadow
            .resource_ref()
            .ok_or(RefinementError::MissingResourceRef)?;
        let entry = self
            .entries
            .get(&resource.oid)
            .ok_or_else(|| RefinementError::ResourceNotFound(resource.oid.clone()))?;
        f(&resource.oid, entry.value())
    }
}

impl RefinementService for ResourceRegistry {
    fn refined_attributes_definition(
        &self,
        shadow: &PrismObject,
    ) -> Result<ItemDefinition, RefinementError> {
        self.with_entry(shadow, |oid, entry| {
            entry
                .attributes
                .clone()
                .ok_or_else(|| RefinementError::NoRefinedSchema(oid.to_string()))
        })
    }

    fn legal_association_names(&self, shadow: &PrismObject) -> Result<Vec<ItemName>, RefinementError> {
        self.with_entry(shadow, |_, entry| Ok(entry.associations.clone()))
    }

    fn capabilities(&self, shadow: &PrismObject) -> Result<CapabilityDescriptor, RefinementError> {
        self.with_entry(shadow, |_, entry| Ok(entry.capabilities))
    }
}

/// Refinement service for deployments without connected systems
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefinement;

impl RefinementService for NoRefinement {
    fn refined_attributes_definition(
        &self,
        _shadow: &PrismObject,
    ) -> Result<ItemDefinition, RefinementError> {
        Err(RefinementError::Unavailable(
            "no refinement service configured".to_string(),
        ))
    }

    fn legal_association_names(&self, _shadow: &PrismObject) -> Result<Vec<ItemName>, RefinementError> {
        Err(RefinementError::Unavailable(
            "no refinement service configured".to_string(),
        ))
    }

    fn capabilities(&self, _shadow: &PrismObject) -> Result<CapabilityDescriptor, RefinementError> {
        Err(RefinementError::Unavailable(
            "no refinement service configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::types;
    use crate::object::{ContainerValue, ReferenceValue};

    fn shadow(resource_oid: Option<&str>) -> PrismObject {
        let mut root = ContainerValue::new().with_property("name", "jack");
        if let Some(oid) = resource_oid {
            root = root.with_reference("resourceRef", ReferenceValue::new(oid, ObjectType::Resource));
        }
        PrismObject::new(ObjectType::Shadow).with_root(root)
    }

    fn registry() -> ResourceRegistry {
        let registry = ResourceRegistry::new();
        registry.register(
            "res-dummy",
            ResourceEntry {
                attributes: Some(
                    ItemDefinition::container("attributes", types::SHADOW_ATTRIBUTES_TYPE)
                        .with_child(ItemDefinition::property("uid")),
                ),
                associations: vec![ItemName::from("group")],
                capabilities: CapabilityDescriptor::with_activation(ActivationCapability {
                    status: true,
                    ..ActivationCapability::default()
                }),
            },
        );
        registry.register("res-bare", ResourceEntry::default());
        registry
    }

    #[test]
    fn schema_registry_lookup() {
        let registry = SchemaRegistry::new().with(ObjectDefinition::new(
            ObjectType::User,
            ItemDefinition::container("user", "UserType")
                .with_child(ItemDefinition::property("givenName")),
        ));
        assert_eq!(registry.len(), 1);
        assert!(registry.object_definition(ObjectType::User).is_some());
        assert!(registry.object_definition(ObjectType::Role).is_none());
        assert!(registry
            .definition_for(ObjectType::User, &ItemPath::single("givenName"))
            .is_some());
    }

    #[test]
    fn schema_registry_rejects_duplicates() {
        let json = r#"[
            {"object_type":"user","root":{"name":"user","kind":"container"}},
            {"object_type":"user","root":{"name":"user","kind":"container"}}
        ]"#;
        let result = SchemaRegistry::from_json(json);
        assert!(matches!(result, Err(RegistryError::DuplicateObjectType(ObjectType::User))));
    }

    #[test]
    fn resource_registry_resolves_by_resource_ref() {
        let registry = registry();
        let shadow = shadow(Some("res-dummy"));
        let attributes = registry.refined_attributes_definition(&shadow).unwrap();
        assert_eq!(attributes.children().len(), 1);
        assert_eq!(
            registry.legal_association_names(&shadow).unwrap(),
            vec![ItemName::from("group")]
        );
        assert!(registry.capabilities(&shadow).unwrap().activation.is_some());
    }

    #[test]
    fn resource_registry_errors() {
        let registry = registry();
        assert_eq!(
            registry.refined_attributes_definition(&shadow(None)),
            Err(RefinementError::MissingResourceRef)
        );
        assert_eq!(
            registry.capabilities(&shadow(Some("res-unknown"))),
            Err(RefinementError::ResourceNotFound("res-unknown".to_string()))
        );
        assert_eq!(
            registry.refined_attributes_definition(&shadow(Some("res-bare"))),
            Err(RefinementError::NoRefinedSchema("res-bare".to_string()))
        );
    }

    #[test]
    fn capability_gating() {
        let caps = CapabilityDescriptor::with_activation(ActivationCapability {
            valid_from: true,
            ..ActivationCapability::default()
        });
        assert!(caps.supports_activation_field(names::VALID_FROM));
        assert!(!caps.supports_activation_field(names::VALID_TO));
        assert!(!caps.supports_activation_field(names::ADMINISTRATIVE_STATUS));
        assert!(caps.supports_activation_field("lockoutStatus"));

        let none = CapabilityDescriptor::default();
        assert!(!none.supports_activation_field(names::VALID_FROM));
    }

    #[test]
    fn no_refinement_always_fails() {
        assert!(matches!(
            NoRefinement.capabilities(&shadow(Some("res-dummy"))),
            Err(RefinementError::Unavailable(_))
        ));
    }
}

//! Static population rules
//!
//! The skip list and the inherited-attribute list are fixed tables.
//! [`ContainerKind`] is resolved once per container and selects which
//! population branch runs.

use idm_schema::{names, types, CapabilityDescriptor, ItemDefinition, ItemName, ItemPath, ObjectType};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Operational or internal fields never offered for editing
static SKIPPED_ITEMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // credentials
        names::FAILED_LOGINS,
        names::LAST_FAILED_LOGIN,
        names::LAST_SUCCESSFUL_LOGIN,
        names::PREVIOUS_SUCCESSFUL_LOGIN,
        names::FETCH_RESULT,
        // activation
        names::EFFECTIVE_STATUS,
        names::VALIDITY_STATUS,
        // user
        names::RESULT,
        // roles and orgs
        names::APPROVAL_PROCESS,
        names::APPROVER_EXPRESSION,
        names::AUTOMATICALLY_APPROVED,
        names::CONDITION,
    ]
    .into_iter()
    .collect()
});

/// Attributes every object carries regardless of its type
static INHERITED_OBJECT_ATTRIBUTES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        names::NAME,
        names::DESCRIPTION,
        names::FETCH_RESULT,
        names::PARENT_ORG,
        names::PARENT_ORG_REF,
        names::TENANT_REF,
        names::LINK,
        names::LINK_REF,
    ]
    .into_iter()
    .collect()
});

/// Check if a field is on the skip list
#[inline]
#[must_use]
pub fn is_skipped(name: &str) -> bool {
    SKIPPED_ITEMS.contains(name)
}

/// Check if a field is an inherited object attribute
#[inline]
#[must_use]
pub fn is_inherited_object_attribute(name: &str) -> bool {
    INHERITED_OBJECT_ATTRIBUTES.contains(name)
}

/// Check if a definition is hidden by the static rules
#[inline]
#[must_use]
pub fn is_excluded(definition: &ItemDefinition) -> bool {
    definition.is_ignored() || is_skipped(definition.name().as_str())
}

/// Check if the resource supports a field
///
/// Unknown capabilities (`None`) allow everything.
#[inline]
#[must_use]
pub fn capability_allows(capabilities: Option<&CapabilityDescriptor>, name: &str) -> bool {
    capabilities.map_or(true, |caps| caps.supports_activation_field(name))
}

/// Structural kind of a container, selecting its population branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Per-field population
    Generic,
    /// One summary per assignment value
    Assignment,
    /// Shadow attributes, populated from the refined definition
    ShadowAttributes,
    /// Shadow associations, grouped by association name
    ShadowAssociation,
    /// Shadow activation, filtered by resource capabilities
    ShadowActivation,
}

impl ContainerKind {
    /// Resolve the kind of the container at `path`
    ///
    /// `definition` is the generic schema definition when one exists.
    #[must_use]
    pub fn resolve(object_type: ObjectType, definition: Option<&ItemDefinition>, path: &ItemPath) -> Self {
        if definition.is_some_and(|def| def.is_of_type(types::ASSIGNMENT_TYPE)) {
            return Self::Assignment;
        }
        let named = path.names_only();
        if object_type != ObjectType::Shadow || named.len() != 1 {
            return Self::Generic;
        }
        match named.last_name().map(ItemName::as_str) {
            Some(names::ATTRIBUTES) => Self::ShadowAttributes,
            Some(names::ASSOCIATION) => Self::ShadowAssociation,
            Some(names::ACTIVATION) => Self::ShadowActivation,
            _ => Self::Generic,
        }
    }
}

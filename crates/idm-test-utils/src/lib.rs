//! Testing utilities for the IDM workspace
//!
//! A standard identity schema, a dummy resource, object fixtures and a
//! scriptable refinement service.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use idm_schema::{
    types, Access, ActivationCapability, CapabilityDescriptor, ContainerValue, ItemDefinition, ItemName,
    ObjectDefinition, ObjectType, PrismObject, PrismValue, PropertyValue, RefinementError,
    RefinementService, ReferenceValue, ResourceEntry, ResourceRegistry, SchemaRegistry,
};

pub const USER_JACK_OID: &str = "c0c010c0-d34d-b33f-f00d-111111111111";
pub const ROLE_PIRATE_OID: &str = "12345678-d34d-b33f-f00d-555555556666";
pub const ROLE_CAPTAIN_OID: &str = "12345678-d34d-b33f-f00d-55555555cccc";
pub const ORG_CARIBBEAN_OID: &str = "00000000-8888-6666-0000-100000000001";
pub const RESOURCE_DUMMY_OID: &str = "10000000-0000-0000-0000-000000000004";
pub const SHADOW_JACK_OID: &str = "c0c010c0-d34d-b33f-f00d-22220004000e";
pub const SHADOW_GROUP_OID: &str = "c0c010c0-d34d-b33f-f00d-2222000400a1";

/// String property value
pub fn text(s: &str) -> PrismValue {
    PrismValue::Property(PropertyValue::from(s))
}

/// Midnight UTC timestamp
pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn activation_definition() -> ItemDefinition {
    ItemDefinition::container("activation", types::ACTIVATION_TYPE).with_children([
        ItemDefinition::property("administrativeStatus").with_display_order(10),
        ItemDefinition::property("validFrom").with_display_order(20),
        ItemDefinition::property("validTo").with_display_order(30),
        ItemDefinition::property("effectiveStatus").with_access(Access::read_only()),
        ItemDefinition::property("validityStatus").with_access(Access::read_only()),
    ])
}

fn assignment_definition() -> ItemDefinition {
    ItemDefinition::container("assignment", types::ASSIGNMENT_TYPE)
        .multi()
        .with_children([
            ItemDefinition::reference("targetRef"),
            ItemDefinition::property("description"),
            activation_definition(),
        ])
}

fn user_definition() -> ObjectDefinition {
    ObjectDefinition::new(
        ObjectType::User,
        ItemDefinition::container("user", "UserType").with_children([
            ItemDefinition::property("name").with_display_order(1),
            ItemDefinition::property("description"),
            ItemDefinition::property("fetchResult").operational(),
            ItemDefinition::property("fullName")
                .with_display_name("Full name")
                .with_display_order(10),
            ItemDefinition::property("givenName")
                .with_display_name("Given name")
                .with_display_order(20),
            ItemDefinition::property("familyName")
                .with_display_name("Family name")
                .with_display_order(30),
            ItemDefinition::property("emailAddress"),
            ItemDefinition::property("employeeNumber").with_access(Access::read_only()),
            ItemDefinition::property("employeeType").multi(),
            ItemDefinition::property("costCenter").with_access(Access {
                read: true,
                add: true,
                modify: false,
            }),
            ItemDefinition::property("securityClearance").with_access(Access::none()),
            ItemDefinition::property("lockoutExpiration").operational(),
            ItemDefinition::property("extId").ignored(),
            ItemDefinition::property("result"),
            ItemDefinition::reference("parentOrgRef").multi(),
            ItemDefinition::reference("linkRef").multi(),
            activation_definition(),
            ItemDefinition::container("credentials", "CredentialsType").with_child(
                ItemDefinition::container("password", "PasswordType").with_children([
                    ItemDefinition::property("value"),
                    ItemDefinition::property("failedLogins"),
                    ItemDefinition::property("lastFailedLogin"),
                    ItemDefinition::property("lastSuccessfulLogin"),
                    ItemDefinition::property("previousSuccessfulLogin"),
                ]),
            ),
            assignment_definition(),
        ]),
    )
}

fn role_definition() -> ObjectDefinition {
    ObjectDefinition::new(
        ObjectType::Role,
        ItemDefinition::container("role", "RoleType").with_children([
            ItemDefinition::property("name"),
            ItemDefinition::property("description"),
            ItemDefinition::property("roleType"),
            ItemDefinition::property("requestable"),
            ItemDefinition::property("approverExpression"),
            ItemDefinition::property("automaticallyApproved"),
            ItemDefinition::property("approvalProcess"),
            ItemDefinition::property("condition"),
            activation_definition(),
            assignment_definition(),
            ItemDefinition::container("inducement", "InducementType")
                .multi()
                .with_children([ItemDefinition::reference("targetRef"), ItemDefinition::property("description")]),
        ]),
    )
}

fn org_definition() -> ObjectDefinition {
    ObjectDefinition::new(
        ObjectType::Org,
        ItemDefinition::container("org", "OrgType").with_children([
            ItemDefinition::property("name"),
            ItemDefinition::property("displayName"),
            ItemDefinition::property("identifier"),
            ItemDefinition::reference("parentOrgRef").multi(),
            activation_definition(),
            assignment_definition(),
        ]),
    )
}

fn shadow_definition() -> ObjectDefinition {
    ObjectDefinition::new(
        ObjectType::Shadow,
        ItemDefinition::container("shadow", "ShadowType").with_children([
            ItemDefinition::property("name"),
            ItemDefinition::reference("resourceRef").with_access(Access::read_only()),
            ItemDefinition::property("objectClass").with_access(Access::read_only()),
            ItemDefinition::property("kind"),
            ItemDefinition::container("attributes", types::SHADOW_ATTRIBUTES_TYPE),
            ItemDefinition::container("association", types::SHADOW_ASSOCIATION_TYPE)
                .multi()
                .with_children([ItemDefinition::property("name"), ItemDefinition::reference("shadowRef")]),
            activation_definition(),
        ]),
    )
}

fn resource_definition() -> ObjectDefinition {
    ObjectDefinition::new(
        ObjectType::Resource,
        ItemDefinition::container("resource", "ResourceType").with_children([
            ItemDefinition::property("name"),
            ItemDefinition::property("description"),
            ItemDefinition::reference("connectorRef"),
            ItemDefinition::container("connectorConfiguration", "ConnectorConfigurationType"),
        ]),
    )
}

/// Schema covering users, roles, orgs, shadows and resources
pub fn standard_schema() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(user_definition())
        .with(role_definition())
        .with(org_definition())
        .with(shadow_definition())
        .with(resource_definition())
}

/// Refined `attributes` definition of the dummy resource's accounts
pub fn dummy_attributes_definition() -> ItemDefinition {
    ItemDefinition::container("attributes", types::SHADOW_ATTRIBUTES_TYPE).with_children([
        ItemDefinition::property("uid")
            .with_access(Access::read_only())
            .with_display_order(1),
        ItemDefinition::property("cn").with_display_order(2),
        ItemDefinition::property("fullname"),
        ItemDefinition::property("title").multi(),
    ])
}

/// Refinement entry of the dummy resource
///
/// Associations `group` and `priv`; activation supports enable/disable only.
pub fn dummy_resource_entry() -> ResourceEntry {
    ResourceEntry {
        attributes: Some(dummy_attributes_definition()),
        associations: vec![ItemName::new("group"), ItemName::new("priv")],
        capabilities: CapabilityDescriptor::with_activation(ActivationCapability {
            status: true,
            ..ActivationCapability::default()
        }),
    }
}

/// Refinement registry holding the dummy resource
pub fn dummy_resources() -> ResourceRegistry {
    let registry = ResourceRegistry::new();
    registry.register(RESOURCE_DUMMY_OID, dummy_resource_entry());
    registry
}

fn assignment(id: u64, target: Option<ReferenceValue>) -> ContainerValue {
    let value = ContainerValue::with_id(id);
    match target {
        Some(target) => value.with_reference("targetRef", target),
        None => value,
    }
}

/// User jack with role, org, targetless and resource assignments
pub fn user_jack() -> PrismObject {
    PrismObject::new(ObjectType::User).with_oid(USER_JACK_OID).with_root(
        ContainerValue::new()
            .with_property("name", "jack")
            .with_property("description", "Captain of the Black Pearl")
            .with_property("fullName", "Jack Sparrow")
            .with_property("givenName", "Jack")
            .with_property("familyName", "Sparrow")
            .with_property("employeeNumber", "emp1234")
            .with_property("employeeType", "CAPTAIN")
            .with_property("employeeType", "PIRATE")
            .with_property("costCenter", "cc-caribbean")
            .with_property("securityClearance", "top")
            .with_property("extId", "X-17")
            .with_reference(
                "parentOrgRef",
                ReferenceValue::new(ORG_CARIBBEAN_OID, ObjectType::Org).with_target_name("Caribbean"),
            )
            .with_container(
                "activation",
                ContainerValue::new().with_property("administrativeStatus", "enabled"),
            )
            .with_container(
                "assignment",
                assignment(
                    1,
                    Some(ReferenceValue::new(ROLE_PIRATE_OID, ObjectType::Role).with_target_name("Pirate")),
                )
                .with_container(
                    "activation",
                    ContainerValue::new()
                        .with_property("validFrom", PropertyValue::Timestamp(date(2024, 3, 1)))
                        .with_property("administrativeStatus", "enabled"),
                ),
            )
            .with_container(
                "assignment",
                assignment(
                    2,
                    Some(ReferenceValue::new(ORG_CARIBBEAN_OID, ObjectType::Org).with_target_name("Caribbean")),
                ),
            )
            .with_container("assignment", assignment(3, None))
            .with_container(
                "assignment",
                assignment(4, Some(ReferenceValue::new(RESOURCE_DUMMY_OID, ObjectType::Resource))),
            ),
    )
}

/// Blank user, as offered on a create form
pub fn new_user() -> PrismObject {
    PrismObject::new(ObjectType::User)
}

/// Role pirate with one identified inducement
pub fn role_pirate() -> PrismObject {
    PrismObject::new(ObjectType::Role).with_oid(ROLE_PIRATE_OID).with_root(
        ContainerValue::new()
            .with_property("name", "Pirate")
            .with_property("description", "Scurvy pirates")
            .with_property("approverExpression", "captain")
            .with_container(
                "inducement",
                ContainerValue::with_id(5)
                    .with_reference("targetRef", ReferenceValue::new(ROLE_CAPTAIN_OID, ObjectType::Role))
                    .with_property("description", "Pirates are captains in training"),
            ),
    )
}

/// Association value linking a shadow to a target shadow
pub fn association_value(name: &str, target_oid: &str) -> ContainerValue {
    ContainerValue::new()
        .with_property("name", name)
        .with_reference("shadowRef", ReferenceValue::new(target_oid, ObjectType::Shadow))
}

/// Jack's account on the dummy resource, member of one group
pub fn shadow_jack() -> PrismObject {
    PrismObject::new(ObjectType::Shadow).with_oid(SHADOW_JACK_OID).with_root(
        ContainerValue::new()
            .with_property("name", "jack")
            .with_reference(
                "resourceRef",
                ReferenceValue::new(RESOURCE_DUMMY_OID, ObjectType::Resource).with_target_name("Dummy Resource"),
            )
            .with_property("objectClass", "AccountObjectClass")
            .with_container(
                "attributes",
                ContainerValue::new()
                    .with_property("uid", "jack")
                    .with_property("cn", "Jack Sparrow")
                    .with_property("title", "captain"),
            )
            .with_container("association", association_value("group", SHADOW_GROUP_OID))
            .with_container(
                "activation",
                ContainerValue::new()
                    .with_property("administrativeStatus", "enabled")
                    .with_property("validFrom", PropertyValue::Timestamp(date(2024, 1, 1))),
            ),
    )
}

/// Shadow with no resource link
pub fn orphan_shadow() -> PrismObject {
    PrismObject::new(ObjectType::Shadow)
        .with_oid("c0c010c0-d34d-b33f-f00d-2222000400ff")
        .with_root(ContainerValue::new().with_property("name", "orphan"))
}

/// Connector configuration schema carried by the dummy resource
pub fn dummy_connector_configuration_definition() -> ItemDefinition {
    ItemDefinition::container("connectorConfiguration", "ConnectorConfigurationType").with_child(
        ItemDefinition::container("configurationProperties", "ConfigurationPropertiesType").with_children([
            ItemDefinition::property("instanceId").with_display_order(1),
            ItemDefinition::property("uselessString"),
            ItemDefinition::property("supportValidity"),
        ]),
    )
}

/// The dummy resource with its embedded connector configuration schema
pub fn resource_dummy() -> PrismObject {
    PrismObject::new(ObjectType::Resource)
        .with_oid(RESOURCE_DUMMY_OID)
        .with_embedded_definition(
            idm_schema::ItemPath::single("connectorConfiguration"),
            dummy_connector_configuration_definition(),
        )
        .with_root(
            ContainerValue::new()
                .with_property("name", "Dummy Resource")
                .with_container(
                    "connectorConfiguration",
                    ContainerValue::new().with_container(
                        "configurationProperties",
                        ContainerValue::new().with_property("instanceId", "dummy"),
                    ),
                ),
        )
}

/// Refinement service answering from fixed results
#[derive(Debug, Clone)]
pub struct ScriptedRefinement {
    pub attributes: Result<ItemDefinition, RefinementError>,
    pub associations: Result<Vec<ItemName>, RefinementError>,
    pub capabilities: Result<CapabilityDescriptor, RefinementError>,
}

impl ScriptedRefinement {
    /// Answers like the dummy resource
    pub fn dummy() -> Self {
        let entry = dummy_resource_entry();
        Self {
            attributes: Ok(dummy_attributes_definition()),
            associations: Ok(entry.associations),
            capabilities: Ok(entry.capabilities),
        }
    }

    /// Refined attribute schema lookup fails
    pub fn with_attributes_error(mut self, error: RefinementError) -> Self {
        self.attributes = Err(error);
        self
    }

    /// Capability lookup fails
    pub fn with_capabilities_error(mut self, error: RefinementError) -> Self {
        self.capabilities = Err(error);
        self
    }

    /// Replace capabilities
    pub fn with_capabilities(mut self, capabilities: CapabilityDescriptor) -> Self {
        self.capabilities = Ok(capabilities);
        self
    }

    /// Replace legal association names
    pub fn with_associations(mut self, names: &[&str]) -> Self {
        self.associations = Ok(names.iter().map(|name| ItemName::new(*name)).collect());
        self
    }
}

impl RefinementService for ScriptedRefinement {
    fn refined_attributes_definition(&self, _shadow: &PrismObject) -> Result<ItemDefinition, RefinementError> {
        self.attributes.clone()
    }

    fn legal_association_names(&self, _shadow: &PrismObject) -> Result<Vec<ItemName>, RefinementError> {
        self.associations.clone()
    }

    fn capabilities(&self, _shadow: &PrismObject) -> Result<CapabilityDescriptor, RefinementError> {
        self.capabilities.clone()
    }
}

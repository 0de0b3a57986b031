//! Container wrapper: one node of the object tree
//!
//! A container populates itself exactly once, at construction. The
//! population branch is chosen by its [`ContainerKind`]:
//!
//! - assignment containers yield one read-only summary per role or org
//!   assignment
//! - shadow association containers yield one association item per legal
//!   association name
//! - every other container runs the per-field pass, unless it holds
//!   several values of a multi-valued definition
//!
//! Population problems are recorded on the container's
//! [`OperationOutcome`] and leave it empty; they never abort the tree.

use crate::assignment;
use crate::association;
use crate::config::EditSession;
use crate::error::WrapperError;
use crate::item::{compare_items, ItemWrapper, ItemWrapperKind};
use crate::outcome::OperationOutcome;
use crate::rules::{self, ContainerKind};
use crate::status::ObjectStatus;
use idm_schema::{
    names, CapabilityDescriptor, ContainerValue, DefinitionError, DefinitionLookup, ItemDefinition,
    ItemKind, ItemName, ItemPath, ObjectType, PrismObject, RefinementService,
};
use std::fmt::{self, Display, Formatter};

const POPULATE: &str = "populate container";

/// Handle of a container wrapper inside its object wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(usize);

impl ContainerId {
    /// The main (root) container
    pub const MAIN: Self = Self(0);

    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the object wrapper's container list
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for ContainerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inputs shared by every container of one object wrapper
pub(crate) struct PopulationContext<'a> {
    pub(crate) object: &'a PrismObject,
    pub(crate) session: EditSession,
    pub(crate) capabilities: Option<&'a CapabilityDescriptor>,
    pub(crate) schema: &'a dyn DefinitionLookup,
    pub(crate) refinement: &'a dyn RefinementService,
}

/// One container of the object tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerWrapper {
    id: ContainerId,
    parent: Option<ContainerId>,
    children: Vec<ContainerId>,
    path: ItemPath,
    kind: ContainerKind,
    status: ObjectStatus,
    session: EditSession,
    definition: Option<ItemDefinition>,
    element_name: ItemName,
    readonly: bool,
    field_pass: bool,
    items: Vec<ItemWrapper>,
    outcome: OperationOutcome,
}

impl ContainerWrapper {
    /// Build and populate the container at `path`
    ///
    /// # Errors
    /// Returns [`WrapperError::SchemaViolation`] if a shadow association
    /// container cannot be tied to its resource
    pub(crate) fn build(
        ctx: &PopulationContext<'_>,
        id: ContainerId,
        parent: Option<ContainerId>,
        path: ItemPath,
    ) -> Result<Self, WrapperError> {
        let object_type = ctx.object.object_type();
        let main = path.is_empty();
        let values = ctx.object.find_container_values(&path);
        let generic = ctx.schema.definition_for(object_type, &path);
        let kind = ContainerKind::resolve(object_type, generic, &path);

        let status = if main {
            ctx.session.status
        } else if values.is_empty() {
            ObjectStatus::Adding
        } else {
            ObjectStatus::Modifying
        };
        let element_name = path
            .last_name()
            .cloned()
            .unwrap_or_else(|| ItemName::new(object_type.element_name()));

        let mut outcome = OperationOutcome::success(POPULATE);
        let definition = resolve_definition(ctx, kind, &path, generic, &mut outcome);
        let readonly = ctx.session.options.readonly
            || definition
                .as_ref()
                .is_some_and(|def| def.can_read() && !def.can_add() && !def.can_modify());

        let mut wrapper = Self {
            id,
            parent,
            children: Vec::new(),
            path,
            kind,
            status,
            session: ctx.session,
            definition: None,
            element_name,
            readonly,
            field_pass: false,
            items: Vec::new(),
            outcome,
        };

        if let Some(definition) = definition {
            wrapper.populate(ctx, &definition, &values)?;
            wrapper.definition = Some(definition);
        }
        wrapper.items.sort_by(compare_items);

        tracing::debug!(
            path = %wrapper.path,
            kind = ?wrapper.kind,
            items = wrapper.items.len(),
            "Populated container"
        );
        Ok(wrapper)
    }

    fn populate(
        &mut self,
        ctx: &PopulationContext<'_>,
        definition: &ItemDefinition,
        values: &[&ContainerValue],
    ) -> Result<(), WrapperError> {
        match self.kind {
            ContainerKind::Assignment => {
                self.populate_assignments(values);
                Ok(())
            }
            ContainerKind::ShadowAssociation => self.populate_associations(ctx, definition),
            ContainerKind::Generic | ContainerKind::ShadowAttributes | ContainerKind::ShadowActivation => {
                if values.len() > 1 && !definition.is_single_valued() {
                    tracing::debug!(
                        path = %self.path,
                        values = values.len(),
                        "Skipping field pass for multi-valued container"
                    );
                    return Ok(());
                }
                self.populate_fields(ctx, definition, values.first().copied());
                Ok(())
            }
        }
    }

    fn populate_assignments(&mut self, values: &[&ContainerValue]) {
        for value in values {
            let Some(summary) = assignment::summarize(value) else {
                tracing::debug!(id = ?value.id(), "Skipping assignment without role or org target");
                continue;
            };
            let definition = ItemDefinition::property(names::NAME)
                .with_display_name(summary.label)
                .with_display_order(summary.display_order);
            self.items.push(ItemWrapper::summary(
                definition,
                self.id,
                self.path.clone(),
                summary.brief,
            ));
        }
    }

    fn populate_associations(
        &mut self,
        ctx: &PopulationContext<'_>,
        definition: &ItemDefinition,
    ) -> Result<(), WrapperError> {
        if ctx.object.resource_ref().is_none() {
            return Err(WrapperError::schema_violation(
                "association container on a shadow without resource reference",
            ));
        }
        let legal = ctx
            .refinement
            .legal_association_names(ctx.object)
            .map_err(|err| {
                WrapperError::schema_violation(format!("cannot resolve association names: {err}"))
            })?;

        let groups = association::group_by_name(
            ctx.object.root().container_values(names::ASSOCIATION),
            &legal,
        );
        for (name, values) in groups {
            self.items.push(ItemWrapper::association(
                definition.renamed(name),
                self.id,
                ItemPath::single(names::ASSOCIATION),
                self.readonly,
                values,
            ));
        }
        Ok(())
    }

    fn populate_fields(
        &mut self,
        ctx: &PopulationContext<'_>,
        definition: &ItemDefinition,
        source: Option<&ContainerValue>,
    ) {
        let main = self.is_main();
        let show_inherited = self.session.options.show_inherited_attributes;
        for child in definition.children() {
            let name = child.name().as_str();
            if rules::is_excluded(child) {
                continue;
            }
            if !show_inherited && !main && rules::is_inherited_object_attribute(name) {
                continue;
            }
            if self.kind == ContainerKind::ShadowActivation
                && !rules::capability_allows(ctx.capabilities, name)
            {
                tracing::debug!(field = name, "Skipping activation field unsupported by resource");
                continue;
            }
            let kind = match child.kind() {
                ItemKind::Property => ItemWrapperKind::Property,
                ItemKind::Reference => ItemWrapperKind::Reference,
                // nested containers get their own wrappers
                ItemKind::Container => continue,
            };

            let readonly = ctx.session.options.readonly
                || match ctx.session.status {
                    ObjectStatus::Modifying => !child.can_modify(),
                    ObjectStatus::Adding => !child.can_add(),
                };
            let values = source.map_or(&[][..], |value| value.values(name));
            self.items.push(ItemWrapper::from_values(
                kind,
                child.clone(),
                self.id,
                self.path.child(child.name().clone()),
                readonly,
                values,
            ));
        }
        self.field_pass = true;
    }

    pub(crate) fn add_child(&mut self, child: ContainerId) {
        self.children.push(child);
    }

    /// Check if an item should be shown
    ///
    /// Follows the object status, not the container's: adding objects show
    /// what can be added; modified objects show readable fields that hold a
    /// value, or every readable field when empty fields are shown.
    #[must_use]
    pub fn is_item_visible(&self, item: &ItemWrapper) -> bool {
        let definition = item.definition();
        if rules::is_excluded(definition) || definition.is_operational() {
            return false;
        }
        if self.session.status == ObjectStatus::Adding {
            return definition.can_add();
        }
        if !definition.can_modify() && !definition.can_read() {
            return false;
        }
        self.session.options.show_empty || item.has_meaningful_value()
    }

    /// Visible items in display order
    pub fn visible_items(&self) -> impl Iterator<Item = &ItemWrapper> {
        self.items.iter().filter(|item| self.is_item_visible(item))
    }

    /// Handle of this container
    #[inline]
    #[must_use]
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Parent container, `None` for the main container
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    /// Nested containers in materialization order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[ContainerId] {
        &self.children
    }

    /// Path from the object root; empty for the main container
    #[inline]
    #[must_use]
    pub fn path(&self) -> &ItemPath {
        &self.path
    }

    /// Check if this is the object's root container
    #[inline]
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.path.is_empty()
    }

    /// Structural kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// ADDING when the container value does not exist yet
    #[inline]
    #[must_use]
    pub fn status(&self) -> ObjectStatus {
        self.status
    }

    /// Resolved definition, `None` when resolution failed
    #[inline]
    #[must_use]
    pub fn definition(&self) -> Option<&ItemDefinition> {
        self.definition.as_ref()
    }

    /// Element name of the container
    #[inline]
    #[must_use]
    pub fn element_name(&self) -> &ItemName {
        &self.element_name
    }

    /// Label shown for this container
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.definition
            .as_ref()
            .and_then(ItemDefinition::display_name)
            .unwrap_or_else(|| self.element_name.as_str())
    }

    /// Check if the container is view-only
    #[inline]
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Inherited attributes shown for this container
    #[inline]
    #[must_use]
    pub fn is_show_inherited_attributes(&self) -> bool {
        self.session.options.show_inherited_attributes
    }

    /// Check if the per-field pass ran
    #[inline]
    #[must_use]
    pub fn has_field_pass(&self) -> bool {
        self.field_pass
    }

    /// Items in display order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[ItemWrapper] {
        &self.items
    }

    /// First item with the given name
    #[must_use]
    pub fn find_item(&self, name: &str) -> Option<&ItemWrapper> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// First item with the given name, for editing
    pub fn find_item_mut(&mut self, name: &str) -> Option<&mut ItemWrapper> {
        self.items.iter_mut().find(|item| item.name() == name)
    }

    /// Population outcome
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }

    /// Check if any item differs from the original object
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.items.iter().any(ItemWrapper::has_changed)
    }
}

impl Display for ContainerWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ContainerWrapper({} ({}) {} items)",
            self.display_name(),
            self.status,
            self.items.len()
        )
    }
}

fn resolve_definition(
    ctx: &PopulationContext<'_>,
    kind: ContainerKind,
    path: &ItemPath,
    generic: Option<&ItemDefinition>,
    outcome: &mut OperationOutcome,
) -> Option<ItemDefinition> {
    if kind == ContainerKind::ShadowAttributes {
        return match ctx.refinement.refined_attributes_definition(ctx.object) {
            Ok(definition) => Some(definition),
            Err(err) => {
                tracing::warn!(
                    oid = ?ctx.object.oid(),
                    error = %err,
                    "Couldn't load refined attribute definition for shadow"
                );
                outcome.record_fatal(err);
                None
            }
        };
    }

    let object_type = ctx.object.object_type();
    let embedded = if object_type == ObjectType::Resource {
        embedded_definition(ctx.object, path)
    } else {
        None
    };
    match embedded.or(generic) {
        Some(definition) => Some(definition.clone()),
        None => {
            tracing::error!(path = %path, %object_type, "No definition for container");
            outcome.record_partial(DefinitionError::MissingPath {
                object_type,
                path: path.clone(),
            });
            None
        }
    }
}

/// Definition carried by the object, looked up through the nearest
/// embedded ancestor
fn embedded_definition<'o>(object: &'o PrismObject, path: &ItemPath) -> Option<&'o ItemDefinition> {
    let names = path.names_only();
    let segments = names.segments();
    (0..=segments.len()).rev().find_map(|cut| {
        let prefix = ItemPath::new(segments[..cut].to_vec());
        object
            .embedded_definition(&prefix)
            .and_then(|definition| definition.find(&ItemPath::new(segments[cut..].to_vec())))
    })
}

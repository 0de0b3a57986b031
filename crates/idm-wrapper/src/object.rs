//! Object wrapper: the root of the wrapper tree
//!
//! Owns the edited object, the session context and an arena of container
//! wrappers. Containers refer to each other through [`ContainerId`]
//! handles into the arena; the main container is always first and the
//! rest follow in pre-order.

use crate::config::EditSession;
use crate::container::{ContainerId, ContainerWrapper, PopulationContext};
use crate::delta;
use crate::error::WrapperError;
use crate::rules::{self, ContainerKind};
use crate::status::ObjectStatus;
use idm_schema::{
    names, types, CapabilityDescriptor, ChangeSet, ContainerValue, DefinitionError, DefinitionLookup,
    ItemDefinition, ItemPath, ObjectType, PrismObject, RefinementService,
};
use std::fmt::{self, Write as _};

/// External services consulted while building the tree
#[derive(Clone, Copy)]
pub struct Services<'a> {
    /// Static schema
    pub schema: &'a dyn DefinitionLookup,
    /// Resource-specific metadata for shadows
    pub refinement: &'a dyn RefinementService,
}

impl<'a> Services<'a> {
    /// Bundle schema and refinement services
    #[inline]
    #[must_use]
    pub fn new(schema: &'a dyn DefinitionLookup, refinement: &'a dyn RefinementService) -> Self {
        Self { schema, refinement }
    }
}

/// Editable mirror of one object
#[derive(Debug, Clone)]
pub struct ObjectWrapper {
    object: PrismObject,
    session: EditSession,
    capabilities: Option<CapabilityDescriptor>,
    containers: Vec<ContainerWrapper>,
}

impl ObjectWrapper {
    /// Build the wrapper tree for an object
    ///
    /// Capabilities of a shadow's resource are fetched once here; if that
    /// fails, activation fields are not filtered.
    ///
    /// # Errors
    /// Returns [`WrapperError::MissingObjectDefinition`] if the schema has no
    /// definition for the object's type, or [`WrapperError::SchemaViolation`]
    /// if a shadow association container cannot be tied to its resource
    pub fn new(object: PrismObject, session: EditSession, services: Services<'_>) -> Result<Self, WrapperError> {
        let object_type = object.object_type();
        if services.schema.object_definition(object_type).is_none() {
            return Err(DefinitionError::MissingObjectDefinition(object_type).into());
        }

        let capabilities = if object_type == ObjectType::Shadow {
            match services.refinement.capabilities(&object) {
                Ok(capabilities) => Some(capabilities),
                Err(err) => {
                    tracing::warn!(
                        oid = ?object.oid(),
                        error = %err,
                        "Couldn't determine resource capabilities, activation fields are not filtered"
                    );
                    None
                }
            }
        } else {
            None
        };

        let containers = {
            let ctx = PopulationContext {
                object: &object,
                session,
                capabilities: capabilities.as_ref(),
                schema: services.schema,
                refinement: services.refinement,
            };
            let mut builder = TreeBuilder {
                ctx: &ctx,
                containers: Vec::new(),
            };
            builder.materialize(None, ItemPath::root())?;
            builder.containers
        };

        let wrapper = Self {
            object,
            session,
            capabilities,
            containers,
        };
        tracing::debug!(
            object_type = %object_type,
            status = %session.status,
            containers = wrapper.containers.len(),
            "Built object wrapper"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!("{}", wrapper.debug_dump());
        }
        Ok(wrapper)
    }

    /// The original object
    #[inline]
    #[must_use]
    pub fn object(&self) -> &PrismObject {
        &self.object
    }

    /// Adding or modifying
    #[inline]
    #[must_use]
    pub fn status(&self) -> ObjectStatus {
        self.session.status
    }

    /// Session context
    #[inline]
    #[must_use]
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Check if the whole object is view-only
    #[inline]
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.session.options.readonly
    }

    /// Check if empty fields are shown
    #[inline]
    #[must_use]
    pub fn is_show_empty(&self) -> bool {
        self.session.options.show_empty
    }

    /// Check if inherited attributes are shown
    #[inline]
    #[must_use]
    pub fn is_show_inherited_attributes(&self) -> bool {
        self.session.options.show_inherited_attributes
    }

    /// Check if assignments are materialized
    #[inline]
    #[must_use]
    pub fn is_show_assignments(&self) -> bool {
        self.session.options.show_assignments
    }

    /// Capabilities of a shadow's resource, if known
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> Option<&CapabilityDescriptor> {
        self.capabilities.as_ref()
    }

    /// Raw association values of the object
    #[must_use]
    pub fn association_values(&self) -> Vec<&ContainerValue> {
        self.object.root().container_values(names::ASSOCIATION).collect()
    }

    /// All containers, main first, then pre-order
    #[inline]
    #[must_use]
    pub fn containers(&self) -> &[ContainerWrapper] {
        &self.containers
    }

    /// The root container
    #[inline]
    #[must_use]
    pub fn main_container(&self) -> &ContainerWrapper {
        &self.containers[ContainerId::MAIN.index()]
    }

    /// Container by handle
    #[inline]
    #[must_use]
    pub fn container(&self, id: ContainerId) -> Option<&ContainerWrapper> {
        self.containers.get(id.index())
    }

    /// Container by handle, for editing its items
    #[inline]
    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut ContainerWrapper> {
        self.containers.get_mut(id.index())
    }

    /// First container whose path equals `path`
    #[must_use]
    pub fn find_container_wrapper(&self, path: &ItemPath) -> Option<&ContainerWrapper> {
        self.containers.iter().find(|container| container.path() == path)
    }

    /// First container whose path equals `path`, for editing its items
    pub fn find_container_wrapper_mut(&mut self, path: &ItemPath) -> Option<&mut ContainerWrapper> {
        self.containers.iter_mut().find(|container| container.path() == path)
    }

    /// Check if any value differs from the original object
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.containers.iter().any(ContainerWrapper::has_changed)
    }

    /// Change set turning the original object into the edited state
    ///
    /// Does not modify the tree; repeated calls return equal change sets.
    #[must_use]
    pub fn compute_delta(&self) -> ChangeSet {
        delta::compute_delta(self)
    }

    /// Indented text dump of the whole tree
    #[must_use]
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        if let Err(err) = self.write_tree(&mut out) {
            tracing::warn!(error = %err, "Tree dump truncated");
        }
        out
    }

    fn write_tree(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(
            out,
            "ObjectWrapper({} {} {}, {})",
            self.object.object_type(),
            self.object.oid().unwrap_or("(new)"),
            self.object.name().unwrap_or("(unnamed)"),
            self.session.status
        )?;
        self.write_container(out, ContainerId::MAIN, 1)
    }

    fn write_container(&self, out: &mut impl fmt::Write, id: ContainerId, depth: usize) -> fmt::Result {
        let Some(container) = self.container(id) else {
            return Ok(());
        };
        let indent = "  ".repeat(depth);
        write!(
            out,
            "{indent}{container} path='{}' kind={:?}",
            container.path(),
            container.kind()
        )?;
        if container.is_readonly() {
            out.write_str(" readonly")?;
        }
        if !container.outcome().is_success() {
            write!(out, " [{}]", container.outcome())?;
        }
        out.write_char('\n')?;

        for item in container.items() {
            writeln!(
                out,
                "{indent}  {} ({:?}{}{}){}",
                item.display_name(),
                item.kind(),
                if item.is_readonly() { ", readonly" } else { "" },
                if item.is_synthetic() { ", synthetic" } else { "" },
                if container.is_item_visible(item) { "" } else { " hidden" }
            )?;
            for value in item.values() {
                match value.value() {
                    Some(v) => writeln!(out, "{indent}    {}: {v}", value.status())?,
                    None => writeln!(out, "{indent}    {}: (empty)", value.status())?,
                }
            }
        }
        for child in container.children() {
            self.write_container(out, *child, depth + 1)?;
        }
        Ok(())
    }
}

/// Materializes containers depth first into the arena
struct TreeBuilder<'c, 'a> {
    ctx: &'c PopulationContext<'a>,
    containers: Vec<ContainerWrapper>,
}

impl TreeBuilder<'_, '_> {
    fn materialize(&mut self, parent: Option<ContainerId>, path: ItemPath) -> Result<ContainerId, WrapperError> {
        let id = ContainerId::new(self.containers.len());
        let wrapper = ContainerWrapper::build(self.ctx, id, parent, path)?;

        let descend = wrapper.kind() == ContainerKind::Generic && wrapper.has_field_pass();
        let nested: Vec<ItemDefinition> = match wrapper.definition() {
            Some(definition) if descend => definition
                .children()
                .iter()
                .filter(|child| child.is_container())
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        let main = wrapper.is_main();
        let base = wrapper.path().clone();

        self.containers.push(wrapper);
        if let Some(parent) = parent.and_then(|parent| self.containers.get_mut(parent.index())) {
            parent.add_child(id);
        }

        for child in nested {
            if !self.should_materialize(&child, main) {
                continue;
            }
            let path = self.child_path(&base, &child);
            self.materialize(Some(id), path)?;
        }
        Ok(id)
    }

    fn should_materialize(&self, definition: &ItemDefinition, parent_is_main: bool) -> bool {
        let options = self.ctx.session.options;
        let name = definition.name().as_str();
        if rules::is_excluded(definition) {
            return false;
        }
        if !options.show_inherited_attributes && !parent_is_main && rules::is_inherited_object_attribute(name) {
            return false;
        }
        if definition.is_of_type(types::ASSIGNMENT_TYPE) && !options.show_assignments {
            tracing::debug!(container = name, "Assignments not shown in this session");
            return false;
        }
        true
    }

    /// Path of a nested container; a generic multi-valued container holding
    /// a single identified value is addressed through that id
    ///
    /// Assignment and association containers cover every value of their
    /// item and always keep the bare name.
    fn child_path(&self, base: &ItemPath, definition: &ItemDefinition) -> ItemPath {
        let path = base.child(definition.name().clone());
        if definition.is_single_valued() {
            return path;
        }
        let kind = ContainerKind::resolve(self.ctx.object.object_type(), Some(definition), &path);
        if kind != ContainerKind::Generic {
            return path;
        }
        match self.ctx.object.find_container_values(&path).as_slice() {
            [only] => match only.id() {
                Some(id) => path.child_id(id),
                None => path,
            },
            _ => path,
        }
    }
}

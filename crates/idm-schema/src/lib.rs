//! IDM Schema
//!
//! Typed identity objects, the schema metadata describing them, and the
//! change sets produced when they are edited.
//!
//! # Core Concepts
//!
//! - [`PrismObject`]: A typed object; a tree of container, property and reference values
//! - [`ItemDefinition`]: Schema metadata (kind, multiplicity, permissions, display hints)
//! - [`ItemPath`]: Hierarchical addressing within objects
//! - [`DefinitionLookup`] / [`RefinementService`]: External metadata services
//! - [`ChangeSet`]: Path-keyed delta handed to change execution
//!
//! # Example
//!
//! ```rust
//! use idm_schema::{ContainerValue, ItemPath, ObjectType, PrismObject};
//!
//! let jack = PrismObject::new(ObjectType::User)
//!     .with_oid("c0c010c0-d34d-b33f-f00d-111111111111")
//!     .with_root(ContainerValue::new().with_property("name", "jack"));
//!
//! assert_eq!(jack.name(), Some("jack"));
//! assert_eq!("activation/validFrom".parse::<ItemPath>().unwrap().len(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod definition;
mod delta;
mod lookup;
mod name;
mod object;
mod path;

// Re-exports
pub use definition::{Access, DefinitionError, ItemDefinition, ItemKind, Multiplicity, ObjectDefinition};
pub use delta::{ChangeSet, ChangeType, DeltaOperation, ItemDelta};
pub use lookup::{
    ActivationCapability, CapabilityDescriptor, DefinitionLookup, NoRefinement, RefinementError,
    RefinementService, RegistryError, ResourceEntry, ResourceRegistry, SchemaRegistry,
};
pub use name::{names, types, ItemName};
pub use object::{ContainerValue, ObjectType, PrismObject, PrismValue, PropertyValue, ReferenceValue};
pub use path::{ItemPath, PathError, PathSegment};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for schema work
    pub use crate::{
        ContainerValue, DefinitionLookup, ItemDefinition, ItemName, ItemPath, ObjectDefinition,
        ObjectType, PrismObject, PrismValue, PropertyValue, ReferenceValue, RefinementService,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

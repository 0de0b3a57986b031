//! IDM Wrapper
//!
//! Schema-driven editing engine. Given a typed object, its schema and an
//! edit session, builds an editable mirror of the object (the wrapper
//! tree), tracks value edits, and computes the change set to submit.
//!
//! # Core Concepts
//!
//! - [`ObjectWrapper`]: Root of the tree; owns the object, session and containers
//! - [`ContainerWrapper`]: One container, populated once from the schema
//! - [`ItemWrapper`]: One field (property, reference or association)
//! - [`ValueWrapper`]: One value with its [`ValueStatus`]
//! - [`compute_delta`]: Pure tree-to-[`ChangeSet`](idm_schema::ChangeSet) diff
//!
//! # Example
//!
//! ```rust
//! use idm_schema::{ContainerValue, ItemDefinition, NoRefinement, ObjectDefinition, ObjectType, PrismObject, SchemaRegistry};
//! use idm_wrapper::{EditSession, ObjectWrapper, Services};
//!
//! let schema = SchemaRegistry::new().with(ObjectDefinition::new(
//!     ObjectType::User,
//!     ItemDefinition::container("user", "UserType").with_child(ItemDefinition::property("name")),
//! ));
//! let jack = PrismObject::new(ObjectType::User)
//!     .with_root(ContainerValue::new().with_property("name", "jack"));
//!
//! let wrapper = ObjectWrapper::new(jack, EditSession::modifying(), Services::new(&schema, &NoRefinement)).unwrap();
//! assert!(wrapper.compute_delta().is_empty());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod config;
mod container;
mod delta;
mod error;
mod item;
mod object;
mod outcome;
mod status;
mod value;

// Population helpers
pub mod assignment;
pub mod association;
pub mod rules;

// Re-exports
pub use config::{ConfigError, EditSession, SessionOptions};
pub use container::{ContainerId, ContainerWrapper};
pub use delta::compute_delta;
pub use error::{ValueError, WrapperError};
pub use item::{compare_items, ItemWrapper, ItemWrapperKind};
pub use object::{ObjectWrapper, Services};
pub use outcome::{OperationOutcome, OutcomeStatus, PopulationProblem};
pub use rules::ContainerKind;
pub use status::{ObjectStatus, ParseStatusError, ValueStatus};
pub use value::ValueWrapper;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for editing sessions
    pub use crate::{
        ContainerWrapper, EditSession, ItemWrapper, ObjectStatus, ObjectWrapper, Services, SessionOptions,
        ValueStatus, ValueWrapper, WrapperError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

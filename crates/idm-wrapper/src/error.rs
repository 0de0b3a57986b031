//! Error types for wrapper construction and value mutation

use idm_schema::{DefinitionError, ItemKind, ItemName};

/// Errors constructing an object wrapper
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WrapperError {
    /// No root definition for the object's type
    #[error(transparent)]
    MissingObjectDefinition(#[from] DefinitionError),

    /// Object breaks a structural rule the engine relies on
    #[error("schema violation: {message}")]
    SchemaViolation { message: String },
}

impl WrapperError {
    /// Create schema violation error
    #[must_use]
    pub fn schema_violation(message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            message: message.into(),
        }
    }
}

/// Errors mutating the values of an item
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// Item cannot be edited in this session
    #[error("item '{item}' is read-only")]
    ReadOnly { item: ItemName },

    /// Value index out of range
    #[error("item '{item}' has no value at index {index}")]
    NoSuchValue { item: ItemName, index: usize },

    /// Value was already removed
    #[error("value {index} of item '{item}' is already deleted")]
    AlreadyDeleted { item: ItemName, index: usize },

    /// Single-valued item already holds a value
    #[error("item '{item}' is single-valued and already holds a value")]
    SingleValued { item: ItemName },

    /// Value does not fit the item
    #[error("item '{item}' holds {expected:?} values, got {actual:?}")]
    KindMismatch {
        item: ItemName,
        expected: ItemKind,
        actual: ItemKind,
    },
}

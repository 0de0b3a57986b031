//! Item wrapper: one schema field of a container and its values

use crate::container::ContainerId;
use crate::error::ValueError;
use crate::status::ValueStatus;
use crate::value::ValueWrapper;
use idm_schema::{
    names, ContainerValue, ItemDefinition, ItemKind, ItemName, ItemPath, PrismValue, ReferenceValue,
};
use std::cmp::Ordering;

/// Variant of an item wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemWrapperKind {
    /// Scalar field
    Property,
    /// Link to another object
    Reference,
    /// Shadow association values sharing one association name
    Association,
}

impl ItemWrapperKind {
    /// Kind of value this item holds
    #[inline]
    #[must_use]
    pub fn value_kind(self) -> ItemKind {
        match self {
            Self::Property => ItemKind::Property,
            Self::Reference => ItemKind::Reference,
            Self::Association => ItemKind::Container,
        }
    }
}

/// One field of a container wrapper
///
/// # Invariants
/// - a single-valued item holds at most one value wrapper
/// - every value matches [`ItemWrapperKind::value_kind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemWrapper {
    kind: ItemWrapperKind,
    definition: ItemDefinition,
    container: ContainerId,
    path: ItemPath,
    readonly: bool,
    status: ValueStatus,
    synthetic: bool,
    values: Vec<ValueWrapper>,
}

impl ItemWrapper {
    /// Property or reference item over the values found in the object
    ///
    /// A field with no value gets one empty ADDED slot.
    pub(crate) fn from_values(
        kind: ItemWrapperKind,
        definition: ItemDefinition,
        container: ContainerId,
        path: ItemPath,
        readonly: bool,
        values: &[PrismValue],
    ) -> Self {
        let (status, values) = if values.is_empty() {
            (ValueStatus::Added, vec![ValueWrapper::added(None)])
        } else {
            (
                ValueStatus::NotChanged,
                values.iter().cloned().map(ValueWrapper::existing).collect(),
            )
        };
        Self {
            kind,
            definition,
            container,
            path,
            readonly,
            status,
            synthetic: false,
            values,
        }
    }

    /// Association item for one association name
    ///
    /// Legal names without values get an empty value list.
    pub(crate) fn association(
        definition: ItemDefinition,
        container: ContainerId,
        path: ItemPath,
        readonly: bool,
        values: Vec<ContainerValue>,
    ) -> Self {
        let status = if values.is_empty() {
            ValueStatus::Added
        } else {
            ValueStatus::NotChanged
        };
        Self {
            kind: ItemWrapperKind::Association,
            definition,
            container,
            path,
            readonly,
            status,
            synthetic: false,
            values: values
                .into_iter()
                .map(|value| ValueWrapper::existing(PrismValue::Container(value)))
                .collect(),
        }
    }

    /// Read-only display item that is never diffed
    pub(crate) fn summary(
        definition: ItemDefinition,
        container: ContainerId,
        path: ItemPath,
        text: String,
    ) -> Self {
        Self {
            kind: ItemWrapperKind::Property,
            definition,
            container,
            path,
            readonly: true,
            status: ValueStatus::NotChanged,
            synthetic: true,
            values: vec![ValueWrapper::existing(PrismValue::Property(text.into()))],
        }
    }

    /// Item variant
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ItemWrapperKind {
        self.kind
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &ItemName {
        self.definition.name()
    }

    /// Field definition
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &ItemDefinition {
        &self.definition
    }

    /// Owning container
    #[inline]
    #[must_use]
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Path of this item in change sets
    #[inline]
    #[must_use]
    pub fn path(&self) -> &ItemPath {
        &self.path
    }

    /// Check if values can be edited
    #[inline]
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Status at materialization: ADDED without original values, NOT_CHANGED otherwise
    #[inline]
    #[must_use]
    pub fn status(&self) -> ValueStatus {
        self.status
    }

    /// Check if this item was synthesized for display only
    #[inline]
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Value wrappers in order
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[ValueWrapper] {
        &self.values
    }

    /// Label shown for this item
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.definition
            .display_name()
            .unwrap_or_else(|| self.name().as_str())
    }

    /// Check if the item holds anything beyond an empty ADDED slot
    #[must_use]
    pub fn has_meaningful_value(&self) -> bool {
        match self.values.as_slice() {
            [] => false,
            [only] => only.status() != ValueStatus::Added,
            _ => true,
        }
    }

    /// Check if any value differs from the original object
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.values.iter().any(ValueWrapper::has_changed)
    }

    /// Append a new value
    ///
    /// Returns the index of the new value wrapper.
    ///
    /// # Errors
    /// Returns error if the item is read-only, the value kind does not fit,
    /// or a single-valued item already holds a value
    pub fn add_value(&mut self, value: Option<PrismValue>) -> Result<usize, ValueError> {
        self.ensure_editable()?;
        if let Some(value) = &value {
            self.ensure_kind(value)?;
        }
        if self.definition.is_single_valued() && !self.values.is_empty() {
            return Err(ValueError::SingleValued {
                item: self.name().clone(),
            });
        }
        self.values.push(ValueWrapper::added(value));
        Ok(self.values.len() - 1)
    }

    /// Change the value at `index`; `None` clears it
    ///
    /// # Errors
    /// Returns error if the item is read-only, the index is unknown, the
    /// value was deleted, or the value kind does not fit
    pub fn set_value(&mut self, index: usize, value: Option<PrismValue>) -> Result<(), ValueError> {
        self.ensure_editable()?;
        if let Some(value) = &value {
            self.ensure_kind(value)?;
        }
        let slot = self.live_value_mut(index)?;
        slot.set(value);
        Ok(())
    }

    /// Remove the value at `index`
    ///
    /// ADDED values are discarded; values from the original object are
    /// kept and marked DELETED.
    ///
    /// # Errors
    /// Returns error if the item is read-only, the index is unknown, or the
    /// value was already deleted
    pub fn remove_value(&mut self, index: usize) -> Result<(), ValueError> {
        self.ensure_editable()?;
        if self.live_value_mut(index)?.status() == ValueStatus::Added {
            self.values.remove(index);
        } else {
            self.values[index].mark_deleted();
        }
        Ok(())
    }

    /// Associate a target shadow under this item's association name
    ///
    /// # Errors
    /// Returns error if this is not an association item or it is read-only
    pub fn add_association_target(&mut self, target: ReferenceValue) -> Result<usize, ValueError> {
        if self.kind != ItemWrapperKind::Association {
            return Err(ValueError::KindMismatch {
                item: self.name().clone(),
                expected: self.kind.value_kind(),
                actual: ItemKind::Container,
            });
        }
        let value = ContainerValue::new()
            .with_property(names::NAME, self.name().as_str())
            .with_reference(names::SHADOW_REF, target);
        self.add_value(Some(PrismValue::Container(value)))
    }

    fn ensure_editable(&self) -> Result<(), ValueError> {
        if self.readonly {
            return Err(ValueError::ReadOnly {
                item: self.name().clone(),
            });
        }
        Ok(())
    }

    fn ensure_kind(&self, value: &PrismValue) -> Result<(), ValueError> {
        let expected = self.kind.value_kind();
        if value.kind() != expected {
            return Err(ValueError::KindMismatch {
                item: self.name().clone(),
                expected,
                actual: value.kind(),
            });
        }
        Ok(())
    }

    fn live_value_mut(&mut self, index: usize) -> Result<&mut ValueWrapper, ValueError> {
        let item = self.definition.name().clone();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(ValueError::NoSuchValue {
                item: item.clone(),
                index,
            })?;
        if slot.status() == ValueStatus::Deleted {
            return Err(ValueError::AlreadyDeleted { item, index });
        }
        Ok(slot)
    }
}

/// Display ordering of items
///
/// Items with a display order come first, ascending; then display name
/// (case-insensitive); then field name.
#[must_use]
pub fn compare_items(a: &ItemWrapper, b: &ItemWrapper) -> Ordering {
    let by_order = match (a.definition.display_order(), b.definition.display_order()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_order
        .then_with(|| {
            a.display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase())
        })
        .then_with(|| a.name().cmp(b.name()))
}

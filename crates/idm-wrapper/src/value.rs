//! Value wrapper: one concrete value plus its lifecycle status

use crate::status::ValueStatus;
use idm_schema::PrismValue;

/// One concrete value of an item
///
/// # Invariants
/// - `old_value` is the value copied from the original object and never
///   changes after construction; it is `None` for ADDED values
/// - a MODIFIED value differs from `old_value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueWrapper {
    value: Option<PrismValue>,
    old_value: Option<PrismValue>,
    status: ValueStatus,
}

impl ValueWrapper {
    /// New slot not present in the original object
    #[inline]
    #[must_use]
    pub fn added(value: Option<PrismValue>) -> Self {
        Self {
            value,
            old_value: None,
            status: ValueStatus::Added,
        }
    }

    /// Value copied from the original object
    #[inline]
    #[must_use]
    pub fn existing(value: PrismValue) -> Self {
        Self {
            value: Some(value.clone()),
            old_value: Some(value),
            status: ValueStatus::NotChanged,
        }
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&PrismValue> {
        self.value.as_ref()
    }

    /// Value in the original object
    #[inline]
    #[must_use]
    pub fn old_value(&self) -> Option<&PrismValue> {
        self.old_value.as_ref()
    }

    /// Lifecycle status
    #[inline]
    #[must_use]
    pub fn status(&self) -> ValueStatus {
        self.status
    }

    /// Check if this value contributes to a change set
    #[must_use]
    pub fn has_changed(&self) -> bool {
        match self.status {
            ValueStatus::Added => self.value.is_some(),
            ValueStatus::NotChanged => false,
            ValueStatus::Modified | ValueStatus::Deleted => true,
        }
    }

    /// Replace the current value
    ///
    /// Callers must reject DELETED values first.
    pub(crate) fn set(&mut self, value: Option<PrismValue>) {
        self.value = value;
        if self.status != ValueStatus::Added {
            self.status = if self.value == self.old_value {
                ValueStatus::NotChanged
            } else {
                ValueStatus::Modified
            };
        }
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.status = ValueStatus::Deleted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idm_schema::PropertyValue;

    fn text(s: &str) -> PrismValue {
        PrismValue::Property(PropertyValue::from(s))
    }

    #[test]
    fn added_placeholder_has_no_change() {
        let mut value = ValueWrapper::added(None);
        assert_eq!(value.status(), ValueStatus::Added);
        assert!(!value.has_changed());

        value.set(Some(text("Jack")));
        assert_eq!(value.status(), ValueStatus::Added);
        assert!(value.has_changed());
    }

    #[test]
    fn edit_transitions_to_modified_and_back() {
        let mut value = ValueWrapper::existing(text("Jack"));
        assert_eq!(value.status(), ValueStatus::NotChanged);

        value.set(Some(text("Jackie")));
        assert_eq!(value.status(), ValueStatus::Modified);
        assert_eq!(value.old_value(), Some(&text("Jack")));

        value.set(Some(text("Jack")));
        assert_eq!(value.status(), ValueStatus::NotChanged);
        assert!(!value.has_changed());
    }

    #[test]
    fn clearing_existing_value_is_modification() {
        let mut value = ValueWrapper::existing(text("Jack"));
        value.set(None);
        assert_eq!(value.status(), ValueStatus::Modified);
        assert_eq!(value.value(), None);
    }
}

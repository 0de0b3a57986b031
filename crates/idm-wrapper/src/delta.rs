//! Delta computation
//!
//! Walks every value of a wrapper tree and folds the edits into one
//! path-keyed [`ChangeSet`]. Pure: the tree is only read.

use crate::item::ItemWrapper;
use crate::object::ObjectWrapper;
use crate::status::{ObjectStatus, ValueStatus};
use crate::value::ValueWrapper;
use idm_schema::{ChangeSet, ChangeType, DeltaOperation};

/// Compute the change set of a wrapper tree
///
/// - ADDED values with content are added; empty ADDED slots are ignored
/// - MODIFIED values replace a single-valued item, or delete the original
///   and add the new value on a multi-valued one
/// - DELETED values delete the original value
/// - synthetic summaries are never diffed
#[must_use]
pub fn compute_delta(wrapper: &ObjectWrapper) -> ChangeSet {
    let change_type = match wrapper.status() {
        ObjectStatus::Adding => ChangeType::Add,
        ObjectStatus::Modifying => ChangeType::Modify,
    };
    let object = wrapper.object();
    let mut change_set = ChangeSet::new(object.oid().map(str::to_owned), object.object_type(), change_type);

    for container in wrapper.containers() {
        for item in container.items().iter().filter(|item| !item.is_synthetic()) {
            for value in item.values() {
                for operation in value_operations(item, value) {
                    change_set.record(item.path().clone(), operation);
                }
            }
        }
    }

    tracing::debug!(paths = change_set.len(), "Computed change set");
    change_set
}

fn value_operations(item: &ItemWrapper, value: &ValueWrapper) -> Vec<DeltaOperation> {
    match value.status() {
        ValueStatus::NotChanged => Vec::new(),
        ValueStatus::Added => value.value().cloned().map(DeltaOperation::Add).into_iter().collect(),
        ValueStatus::Deleted => value
            .old_value()
            .cloned()
            .map(DeltaOperation::Delete)
            .into_iter()
            .collect(),
        ValueStatus::Modified if item.definition().is_single_valued() => {
            vec![DeltaOperation::Replace(value.value().cloned().into_iter().collect())]
        }
        ValueStatus::Modified => value
            .old_value()
            .cloned()
            .map(DeltaOperation::Delete)
            .into_iter()
            .chain(value.value().cloned().map(DeltaOperation::Add))
            .collect(),
    }
}

//! Association grouping
//!
//! Raw shadow association values carry their association name as a `name`
//! property. They are grouped into one bucket per name, and every legal
//! name without values gets an empty bucket so it can still be edited.

use idm_schema::{names, ContainerValue, ItemName, PropertyValue};
use indexmap::IndexMap;

/// Group association values by association name
///
/// Buckets keep first-seen order; legal names without values follow as
/// empty buckets. Values without a name are dropped.
#[must_use]
pub fn group_by_name<'a>(
    values: impl IntoIterator<Item = &'a ContainerValue>,
    legal_names: &[ItemName],
) -> IndexMap<ItemName, Vec<ContainerValue>> {
    let mut groups: IndexMap<ItemName, Vec<ContainerValue>> = IndexMap::new();
    for value in values {
        match association_name(value) {
            Some(name) => groups.entry(ItemName::new(name)).or_default().push(value.clone()),
            None => tracing::debug!("Skipping association value without a name"),
        }
    }
    for name in legal_names {
        groups.entry(name.clone()).or_default();
    }
    groups
}

/// Association name of a raw value
#[inline]
#[must_use]
pub fn association_name(value: &ContainerValue) -> Option<&str> {
    value.property(names::NAME).and_then(PropertyValue::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idm_schema::{ObjectType, ReferenceValue};
    use pretty_assertions::assert_eq;

    fn assoc(name: &str, target: &str) -> ContainerValue {
        ContainerValue::new()
            .with_property("name", name)
            .with_reference("shadowRef", ReferenceValue::new(target, ObjectType::Shadow))
    }

    #[test]
    fn groups_and_fills_legal_names() {
        let values = vec![assoc("group", "g-1"), assoc("group", "g-2"), assoc("priv", "p-1")];
        let legal: Vec<ItemName> = vec!["group".into(), "priv".into(), "role".into()];

        let groups = group_by_name(&values, &legal);
        let keys: Vec<&str> = groups.keys().map(ItemName::as_str).collect();
        assert_eq!(keys, vec!["group", "priv", "role"]);
        assert_eq!(groups["group"].len(), 2);
        assert!(groups["role"].is_empty());
    }

    #[test]
    fn unnamed_values_are_dropped() {
        let values = vec![ContainerValue::new()];
        assert!(group_by_name(&values, &[]).is_empty());
    }
}

//! Change set computation over edited wrapper trees.
//!
//! Core guarantees exercised here:
//! - An untouched tree yields an empty change set, and computing it twice
//!   yields the same result.
//! - Edits are keyed by the item path, container ids included.
//! - Association edits aggregate at the single `association` path.
//! - Placeholders that were filled and then removed leave no trace.

use idm_schema::{
    ChangeType, ContainerValue, ItemPath, ObjectType, PrismObject, PrismValue, ReferenceValue,
};
use idm_test_utils::{
    association_value, dummy_resources, new_user, role_pirate, shadow_jack, standard_schema, text, user_jack,
    SHADOW_GROUP_OID, SHADOW_JACK_OID,
};
use idm_wrapper::{ContainerId, EditSession, ItemWrapper, ObjectWrapper, Services, ValueStatus};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn build(object: PrismObject, session: EditSession) -> ObjectWrapper {
    let schema = standard_schema();
    let resources = dummy_resources();
    ObjectWrapper::new(object, session, Services::new(&schema, &resources)).unwrap()
}

fn item_mut<'w>(wrapper: &'w mut ObjectWrapper, container: &str, name: &str) -> &'w mut ItemWrapper {
    let path = if container.is_empty() {
        ItemPath::root()
    } else {
        container.parse().unwrap()
    };
    wrapper
        .find_container_wrapper_mut(&path)
        .unwrap()
        .find_item_mut(name)
        .unwrap()
}

#[test]
fn untouched_trees_have_empty_deltas() {
    for object in [user_jack(), role_pirate(), shadow_jack()] {
        let wrapper = build(object, EditSession::modifying());
        let delta = wrapper.compute_delta();
        assert!(delta.is_empty(), "unexpected changes: {delta}");
        assert_eq!(delta.change_type(), ChangeType::Modify);
        assert_eq!(delta, wrapper.compute_delta());
    }
}

#[test]
fn nested_single_value_is_replaced() {
    let mut wrapper = build(user_jack(), EditSession::modifying());
    item_mut(&mut wrapper, "activation", "administrativeStatus")
        .set_value(0, Some(text("disabled")))
        .unwrap();

    let delta = wrapper.compute_delta();
    assert_eq!(delta.len(), 1);
    let item_delta = delta
        .item_delta(&"activation/administrativeStatus".parse().unwrap())
        .unwrap();
    assert_eq!(item_delta.values_to_replace(), Some(&[text("disabled")][..]));
}

#[test]
fn restoring_original_value_clears_the_change() {
    let mut wrapper = build(user_jack(), EditSession::modifying());
    let given_name = item_mut(&mut wrapper, "", "givenName");
    given_name.set_value(0, Some(text("Jackie"))).unwrap();
    assert_eq!(given_name.values()[0].status(), ValueStatus::Modified);
    given_name.set_value(0, Some(text("Jack"))).unwrap();
    assert_eq!(given_name.values()[0].status(), ValueStatus::NotChanged);
    assert_eq!(given_name.status(), ValueStatus::NotChanged);

    assert!(!wrapper.has_changed());
    assert!(wrapper.compute_delta().is_empty());
}

/// Identified container values keep their id in the delta path.
#[test]
fn inducement_edit_is_keyed_by_id() {
    let mut wrapper = build(role_pirate(), EditSession::modifying());
    item_mut(&mut wrapper, "inducement/5", "description")
        .set_value(0, Some(text("Captains in waiting")))
        .unwrap();

    let delta = wrapper.compute_delta();
    let paths: Vec<String> = delta.paths().map(ToString::to_string).collect();
    assert_eq!(paths, vec!["inducement/5/description"]);
}

#[test]
fn filled_then_removed_placeholder_is_no_op() {
    let mut wrapper = build(user_jack(), EditSession::modifying());
    let email = item_mut(&mut wrapper, "", "emailAddress");
    email.set_value(0, Some(text("jack@blackpearl.com"))).unwrap();
    assert!(email.has_changed());
    email.remove_value(0).unwrap();
    assert!(email.values().is_empty());

    assert!(wrapper.compute_delta().is_empty());
}

#[test]
fn multi_valued_property_additions_and_deletions() {
    let mut wrapper = build(user_jack(), EditSession::modifying());
    let employee_type = item_mut(&mut wrapper, "", "employeeType");
    employee_type.remove_value(1).unwrap();
    let index = employee_type.add_value(Some(text("ADMIRAL"))).unwrap();
    assert_eq!(index, 2);
    assert_eq!(employee_type.values()[1].status(), ValueStatus::Deleted);

    let delta = wrapper.compute_delta();
    let item_delta = delta.item_delta(&ItemPath::single("employeeType")).unwrap();
    assert_eq!(item_delta.values_to_delete(), &[text("PIRATE")]);
    assert_eq!(item_delta.values_to_add(), &[text("ADMIRAL")]);
}

/// Adding a `priv` target and dropping the `group` value both land on the
/// one `association` path.
#[test]
fn association_edits_aggregate_on_one_path() {
    let mut wrapper = build(shadow_jack(), EditSession::modifying());
    let association = wrapper
        .find_container_wrapper_mut(&ItemPath::single("association"))
        .unwrap();
    association
        .find_item_mut("priv")
        .unwrap()
        .add_association_target(ReferenceValue::new(SHADOW_JACK_OID, ObjectType::Shadow))
        .unwrap();
    association.find_item_mut("group").unwrap().remove_value(0).unwrap();

    let delta = wrapper.compute_delta();
    assert_eq!(delta.len(), 1);
    let item_delta = delta.item_delta(&ItemPath::single("association")).unwrap();
    assert_eq!(
        item_delta.values_to_add(),
        &[PrismValue::Container(association_value("priv", SHADOW_JACK_OID))]
    );
    assert_eq!(
        item_delta.values_to_delete(),
        &[PrismValue::Container(association_value("group", SHADOW_GROUP_OID))]
    );
}

#[test]
fn assignment_summaries_never_reach_the_delta() {
    let wrapper = build(user_jack(), EditSession::modifying());
    let assignments = wrapper
        .find_container_wrapper(&ItemPath::single("assignment"))
        .unwrap();
    assert!(!assignments.items().is_empty());
    assert!(wrapper
        .compute_delta()
        .paths()
        .all(|path| !path.to_string().starts_with("assignment")));
}

#[test]
fn new_object_delta_lists_entered_values() {
    let mut wrapper = build(new_user(), EditSession::adding());
    item_mut(&mut wrapper, "", "name").set_value(0, Some(text("elaine"))).unwrap();
    item_mut(&mut wrapper, "activation", "administrativeStatus")
        .set_value(0, Some(text("enabled")))
        .unwrap();

    let delta = wrapper.compute_delta();
    assert_eq!(delta.change_type(), ChangeType::Add);
    assert_eq!(delta.oid(), None);
    assert_eq!(delta.object_type(), ObjectType::User);
    let paths: Vec<String> = delta.paths().map(ToString::to_string).collect();
    assert_eq!(paths, vec!["name", "activation/administrativeStatus"]);
}

#[test]
fn main_container_is_first_in_arena() {
    let wrapper = build(
        PrismObject::new(ObjectType::Role).with_root(ContainerValue::new().with_property("name", "Captain")),
        EditSession::modifying(),
    );
    assert_eq!(wrapper.containers()[0].id(), ContainerId::MAIN);
    assert!(wrapper.container(ContainerId::MAIN).unwrap().is_main());
}

proptest! {
    /// Setting every editable single value back to itself never produces a
    /// change.
    #[test]
    fn prop_reassigning_original_values_is_empty(rounds in 1usize..4) {
        let mut wrapper = build(user_jack(), EditSession::modifying());
        for _ in 0..rounds {
            for container in ["", "activation"] {
                let path = if container.is_empty() { ItemPath::root() } else { ItemPath::single(container) };
                let target = wrapper.find_container_wrapper_mut(&path).unwrap();
                let names: Vec<String> = target
                    .items()
                    .iter()
                    .filter(|item| !item.is_readonly() && item.definition().is_single_valued())
                    .map(|item| item.name().to_string())
                    .collect();
                for name in names {
                    let item = target.find_item_mut(&name).unwrap();
                    let original = item.values()[0].value().cloned();
                    item.set_value(0, original).unwrap();
                }
            }
        }
        prop_assert!(wrapper.compute_delta().is_empty());
    }
}

//! Visibility and read-only rules as seen by a form renderer.

use idm_schema::{ItemPath, PrismValue, PropertyValue};
use idm_test_utils::{dummy_resources, new_user, standard_schema, user_jack};
use idm_wrapper::{EditSession, ObjectWrapper, Services, SessionOptions, ValueError};
use pretty_assertions::assert_eq;

fn build(object: idm_schema::PrismObject, session: EditSession) -> ObjectWrapper {
    let schema = standard_schema();
    let resources = dummy_resources();
    ObjectWrapper::new(object, session, Services::new(&schema, &resources)).unwrap()
}

fn visible_main(wrapper: &ObjectWrapper) -> Vec<String> {
    wrapper
        .main_container()
        .visible_items()
        .map(|item| item.name().to_string())
        .collect()
}

#[test]
fn modifying_shows_fields_with_values() {
    let wrapper = build(user_jack(), EditSession::modifying());
    assert_eq!(
        visible_main(&wrapper),
        vec![
            "name",
            "fullName",
            "givenName",
            "familyName",
            "costCenter",
            "description",
            "employeeNumber",
            "employeeType",
            "parentOrgRef",
        ]
    );
}

/// Empty placeholders show up once empty fields are requested; operational
/// and unreadable fields never do.
#[test]
fn show_empty_reveals_placeholders() {
    let wrapper = build(
        user_jack(),
        EditSession::modifying().with_options(SessionOptions::new().with_show_empty(true)),
    );
    let visible = visible_main(&wrapper);

    assert!(visible.contains(&"emailAddress".to_string()));
    assert!(visible.contains(&"linkRef".to_string()));
    assert!(!visible.contains(&"lockoutExpiration".to_string()));
    assert!(!visible.contains(&"securityClearance".to_string()));
    assert_eq!(visible.len(), 11);
}

#[test]
fn adding_shows_what_can_be_added() {
    let wrapper = build(new_user(), EditSession::adding());
    let visible = visible_main(&wrapper);

    assert!(visible.contains(&"costCenter".to_string()));
    assert!(visible.contains(&"emailAddress".to_string()));
    assert!(!visible.contains(&"employeeNumber".to_string()));
    assert!(!visible.contains(&"securityClearance".to_string()));
}

/// Readable but not addable fields stay hidden on a create form even when
/// empty fields are shown.
#[test]
fn adding_hides_unaddable_fields_with_show_empty() {
    let wrapper = build(
        new_user(),
        EditSession::adding().with_options(SessionOptions::new().with_show_empty(true)),
    );
    let main = wrapper.main_container();
    let employee_number = main.find_item("employeeNumber").unwrap();

    assert!(!employee_number.definition().can_add());
    assert!(employee_number.definition().can_read());
    assert!(!main.is_item_visible(employee_number));
    assert!(!visible_main(&wrapper).contains(&"employeeNumber".to_string()));
}

#[test]
fn field_access_drives_readonly_flags() {
    let wrapper = build(user_jack(), EditSession::modifying());
    let main = wrapper.main_container();

    assert!(!main.is_readonly());
    assert!(main.find_item("employeeNumber").unwrap().is_readonly());
    assert!(main.find_item("costCenter").unwrap().is_readonly());
    assert!(!main.find_item("fullName").unwrap().is_readonly());

    let added = build(new_user(), EditSession::adding());
    assert!(!added.main_container().find_item("costCenter").unwrap().is_readonly());
}

#[test]
fn readonly_session_rejects_edits() {
    let mut wrapper = build(
        user_jack(),
        EditSession::modifying().with_options(SessionOptions::new().with_readonly(true)),
    );
    assert!(wrapper.is_readonly());
    assert!(wrapper.containers().iter().all(|container| container.is_readonly()));

    let activation = wrapper
        .find_container_wrapper_mut(&ItemPath::single("activation"))
        .unwrap();
    let status = activation.find_item_mut("administrativeStatus").unwrap();
    let err = status
        .set_value(0, Some(PrismValue::Property(PropertyValue::from("disabled"))))
        .unwrap_err();
    assert!(matches!(err, ValueError::ReadOnly { .. }));
    assert!(wrapper.compute_delta().is_empty());
}

#[test]
fn session_options_load_from_toml() {
    let options = SessionOptions::from_toml_str("show_empty = true\nshow_assignments = false\n").unwrap();
    let wrapper = build(user_jack(), EditSession::modifying().with_options(options));

    assert!(wrapper.is_show_empty());
    assert!(!wrapper.is_show_assignments());
    assert!(wrapper
        .find_container_wrapper(&ItemPath::single("assignment"))
        .is_none());
    assert!(wrapper.is_show_inherited_attributes());
}

//! Assignment summaries
//!
//! Assignment values are not edited field by field. Each one with a role or
//! org target is shown as a single read-only line: target name, validity
//! window, administrative status.

use chrono::{DateTime, Utc};
use idm_schema::{names, ContainerValue, ObjectType, PropertyValue};
use std::fmt::Write;

const DATE_FORMAT: &str = "%b %-d, %Y";

/// Display data for one assignment value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSummary {
    /// Label of the target kind
    pub label: &'static str,
    /// Display order of the target kind
    pub display_order: u32,
    /// One-line description
    pub brief: String,
}

/// Summarize an assignment value
///
/// Returns `None` when the value has no target or targets something other
/// than a role or an org.
#[must_use]
pub fn summarize(assignment: &ContainerValue) -> Option<AssignmentSummary> {
    let target = assignment.reference(names::TARGET_REF)?;
    let (label, display_order) = match target.target_type {
        ObjectType::Org => ("Org.Unit", 100),
        ObjectType::Role => ("Role", 200),
        _ => return None,
    };
    Some(AssignmentSummary {
        label,
        display_order,
        brief: format_brief(assignment),
    })
}

/// One-line description of an assignment
#[must_use]
pub fn format_brief(assignment: &ContainerValue) -> String {
    let mut brief = String::new();
    if let Some(target) = assignment.reference(names::TARGET_REF) {
        brief.push_str(target.target_name.as_deref().unwrap_or(&target.oid));
    }

    let Some(activation) = assignment.container_values(names::ACTIVATION).next() else {
        return brief;
    };
    let from = timestamp(activation, names::VALID_FROM);
    let to = timestamp(activation, names::VALID_TO);
    if let Some(window) = format_validity(from, to) {
        let _ = write!(brief, " ({window})");
    }
    if let Some(status) = activation
        .property(names::ADMINISTRATIVE_STATUS)
        .and_then(PropertyValue::as_str)
    {
        let word = match status.to_ascii_lowercase().as_str() {
            "enabled" => Some("enabled"),
            "disabled" => Some("disabled"),
            "archived" => Some("archived"),
            _ => None,
        };
        if let Some(word) = word {
            let _ = write!(brief, ", {word}");
        }
    }
    brief
}

/// Validity window text, `None` when neither bound is set
#[must_use]
pub fn format_validity(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Option<String> {
    match (from, to) {
        (Some(from), Some(to)) => Some(format!(
            "{}-{}",
            from.format(DATE_FORMAT),
            to.format(DATE_FORMAT)
        )),
        (Some(from), None) => Some(format!("from {}", from.format(DATE_FORMAT))),
        (None, Some(to)) => Some(format!("to {}", to.format(DATE_FORMAT))),
        (None, None) => None,
    }
}

fn timestamp(container: &ContainerValue, name: &str) -> Option<DateTime<Utc>> {
    container.property(name).and_then(PropertyValue::as_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use idm_schema::ReferenceValue;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn assignment(target: ReferenceValue) -> ContainerValue {
        ContainerValue::with_id(1).with_reference("targetRef", target)
    }

    #[test]
    fn role_and_org_targets_are_labelled() {
        let role = summarize(&assignment(
            ReferenceValue::new("r-1", ObjectType::Role).with_target_name("Pirate"),
        ))
        .unwrap();
        assert_eq!(role.label, "Role");
        assert_eq!(role.display_order, 200);
        assert_eq!(role.brief, "Pirate");

        let org = summarize(&assignment(ReferenceValue::new("o-1", ObjectType::Org))).unwrap();
        assert_eq!(org.label, "Org.Unit");
        assert_eq!(org.display_order, 100);
        assert_eq!(org.brief, "o-1");
    }

    #[test]
    fn other_targets_and_missing_targets_are_skipped() {
        assert!(summarize(&assignment(ReferenceValue::new("res-1", ObjectType::Resource))).is_none());
        assert!(summarize(&ContainerValue::with_id(2)).is_none());
    }

    #[test]
    fn brief_includes_window_and_status() {
        let value = assignment(ReferenceValue::new("r-1", ObjectType::Role).with_target_name("Captain"))
            .with_container(
                "activation",
                ContainerValue::new()
                    .with_property("validFrom", PropertyValue::Timestamp(date(2024, 3, 1)))
                    .with_property("validTo", PropertyValue::Timestamp(date(2024, 12, 31)))
                    .with_property("administrativeStatus", "ENABLED"),
            );
        assert_eq!(format_brief(&value), "Captain (Mar 1, 2024-Dec 31, 2024), enabled");
    }

    #[test]
    fn validity_window_variants() {
        assert_eq!(
            format_validity(Some(date(2025, 1, 5)), None).as_deref(),
            Some("from Jan 5, 2025")
        );
        assert_eq!(
            format_validity(None, Some(date(2025, 7, 14))).as_deref(),
            Some("to Jul 14, 2025")
        );
        assert_eq!(format_validity(None, None), None);
    }
}

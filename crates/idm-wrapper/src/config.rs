//! Edit session configuration
//!
//! [`SessionOptions`] holds the display preferences of an edit session and
//! can be loaded from TOML, YAML or JSON. [`EditSession`] pairs them with
//! the [`ObjectStatus`] fixed at wrapper construction.

use crate::status::ObjectStatus;
use serde::{Deserialize, Serialize};

/// Display preferences of an edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Show fields that have no value yet
    pub show_empty: bool,
    /// Show attributes every object inherits (name, description, parent org links)
    pub show_inherited_attributes: bool,
    /// Materialize the assignment container
    pub show_assignments: bool,
    /// Whole object is view-only
    pub readonly: bool,
}

impl SessionOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With empty fields shown or hidden
    #[inline]
    #[must_use]
    pub fn with_show_empty(mut self, show_empty: bool) -> Self {
        self.show_empty = show_empty;
        self
    }

    /// With inherited attributes shown or hidden
    #[inline]
    #[must_use]
    pub fn with_show_inherited_attributes(mut self, show: bool) -> Self {
        self.show_inherited_attributes = show;
        self
    }

    /// With assignments shown or hidden
    #[inline]
    #[must_use]
    pub fn with_show_assignments(mut self, show: bool) -> Self {
        self.show_assignments = show;
        self
    }

    /// With the object view-only or editable
    #[inline]
    #[must_use]
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns error if TOML is invalid
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse from YAML
    ///
    /// # Errors
    /// Returns error if YAML is invalid
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns error if JSON is invalid
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            show_empty: false,
            show_inherited_attributes: true,
            show_assignments: true,
            readonly: false,
        }
    }
}

/// Status and options of one edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSession {
    /// Creating or editing
    pub status: ObjectStatus,
    /// Display preferences
    pub options: SessionOptions,
}

impl EditSession {
    /// Session with default options
    #[inline]
    #[must_use]
    pub fn new(status: ObjectStatus) -> Self {
        Self {
            status,
            options: SessionOptions::default(),
        }
    }

    /// Session creating a new object
    #[inline]
    #[must_use]
    pub fn adding() -> Self {
        Self::new(ObjectStatus::Adding)
    }

    /// Session editing an existing object
    #[inline]
    #[must_use]
    pub fn modifying() -> Self {
        Self::new(ObjectStatus::Modifying)
    }

    /// Replace options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Errors loading session configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("invalid toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed YAML
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed JSON
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = SessionOptions::new();
        assert!(!options.show_empty);
        assert!(options.show_inherited_attributes);
        assert!(options.show_assignments);
        assert!(!options.readonly);
    }

    #[test]
    fn toml_fills_missing_fields_from_defaults() {
        let options = SessionOptions::from_toml_str("show_empty = true\nreadonly = true\n").unwrap();
        assert!(options.show_empty);
        assert!(options.readonly);
        assert!(options.show_assignments);
    }

    #[test]
    fn yaml_and_json_load() {
        let yaml = SessionOptions::from_yaml_str("show_assignments: false\n").unwrap();
        assert!(!yaml.show_assignments);
        let json = SessionOptions::from_json_str(r#"{"show_inherited_attributes": false}"#).unwrap();
        assert!(!json.show_inherited_attributes);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = SessionOptions::from_toml_str("show_empty = maybe").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn session_builders() {
        let session = EditSession::modifying().with_options(SessionOptions::new().with_show_empty(true));
        assert_eq!(session.status, ObjectStatus::Modifying);
        assert!(session.options.show_empty);
        assert!(EditSession::adding().status.is_adding());
    }
}

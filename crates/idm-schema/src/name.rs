//! Item names
//!
//! Provides [`ItemName`], the local name of a schema item, plus the
//! well-known names and complex type names the engine dispatches on.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

/// Local name of a schema item
///
/// # Examples
/// - `givenName`
/// - `activation`
/// - `group` (an association name)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(String);

impl ItemName {
    /// Create new item name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ItemName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for ItemName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ItemName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Well-known item names
pub mod names {
    //! Item names with engine-level meaning

    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const FETCH_RESULT: &str = "fetchResult";
    pub const PARENT_ORG: &str = "parentOrg";
    pub const PARENT_ORG_REF: &str = "parentOrgRef";
    pub const TENANT_REF: &str = "tenantRef";
    pub const LINK: &str = "link";
    pub const LINK_REF: &str = "linkRef";

    pub const ACTIVATION: &str = "activation";
    pub const ADMINISTRATIVE_STATUS: &str = "administrativeStatus";
    pub const EFFECTIVE_STATUS: &str = "effectiveStatus";
    pub const VALIDITY_STATUS: &str = "validityStatus";
    pub const VALID_FROM: &str = "validFrom";
    pub const VALID_TO: &str = "validTo";

    pub const FAILED_LOGINS: &str = "failedLogins";
    pub const LAST_FAILED_LOGIN: &str = "lastFailedLogin";
    pub const LAST_SUCCESSFUL_LOGIN: &str = "lastSuccessfulLogin";
    pub const PREVIOUS_SUCCESSFUL_LOGIN: &str = "previousSuccessfulLogin";

    pub const RESULT: &str = "result";
    pub const APPROVAL_PROCESS: &str = "approvalProcess";
    pub const APPROVER_EXPRESSION: &str = "approverExpression";
    pub const AUTOMATICALLY_APPROVED: &str = "automaticallyApproved";
    pub const CONDITION: &str = "condition";

    pub const ASSIGNMENT: &str = "assignment";
    pub const TARGET_REF: &str = "targetRef";

    pub const ATTRIBUTES: &str = "attributes";
    pub const ASSOCIATION: &str = "association";
    pub const RESOURCE_REF: &str = "resourceRef";
    pub const SHADOW_REF: &str = "shadowRef";
}

/// Well-known complex type names
pub mod types {
    //! Container type names with engine-level meaning

    pub const ASSIGNMENT_TYPE: &str = "AssignmentType";
    pub const ACTIVATION_TYPE: &str = "ActivationType";
    pub const SHADOW_ATTRIBUTES_TYPE: &str = "ShadowAttributesType";
    pub const SHADOW_ASSOCIATION_TYPE: &str = "ShadowAssociationType";
}

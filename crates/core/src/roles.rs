//! Well-known role names and the permission checks built on them.
//!
//! Profiles store the role as text. `client` is an older spelling of
//! `church` that still exists in some rows and is read as `church`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_AGENCY: &str = "agency";
pub const ROLE_CHURCH: &str = "church";
pub const ROLE_CLIENT_ALIAS: &str = "client";

/// The role attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Agency staff. Manages branding and client accounts.
    Agency,
    /// A church (client) account. Owns the ordering of its campaigns.
    #[serde(alias = "client")]
    Church,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Agency => ROLE_AGENCY,
            Role::Church => ROLE_CHURCH,
        }
    }

    /// Both roles may create, edit, complete and delete campaigns.
    pub fn can_edit_campaigns(self) -> bool {
        matches!(self, Role::Agency | Role::Church)
    }

    /// Drag-and-drop reordering is reserved for the client.
    pub fn can_reorder(self) -> bool {
        self == Role::Church
    }

    /// Branding settings and client listings are agency-only.
    pub fn can_manage_clients(self) -> bool {
        self == Role::Agency
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_AGENCY => Ok(Role::Agency),
            ROLE_CHURCH | ROLE_CLIENT_ALIAS => Ok(Role::Church),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{other}'. Must be one of: {ROLE_AGENCY}, {ROLE_CHURCH}"
            ))),
        }
    }
}

/// Reject roles that may not modify campaigns.
pub fn require_editor(role: Role) -> Result<(), CoreError> {
    if role.can_edit_campaigns() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "No permission to modify campaigns".into(),
        ))
    }
}

/// Reject roles that may not reorder the board.
pub fn require_reorder(role: Role) -> Result<(), CoreError> {
    if role.can_reorder() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the client account can reorder campaigns".into(),
        ))
    }
}

/// Reject everything except agency staff.
pub fn require_agency(role: Role) -> Result<(), CoreError> {
    if role.can_manage_clients() {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Agency role required".into()))
    }
}

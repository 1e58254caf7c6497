//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Validates the Bearer token.
//! - [`auth::Viewer`] -- `AuthUser` plus profile and a user-scoped store handle.
//! - [`rbac::RequireAgency`] -- Requires the `agency` role.
//! - [`rbac::RequireEditor`] -- Requires a role that may edit campaigns.
//! - [`rbac::RequireReorder`] -- Requires the `church` role.

pub mod auth;
pub mod rbac;

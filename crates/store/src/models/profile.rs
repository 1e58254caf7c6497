//! Profile entity model and DTOs.

use missionboard_core::roles::Role;
use missionboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::full_name_field;

/// A row from the `profiles` table. `id` equals the auth user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: DbId,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Row written when a profile is created on first sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: DbId,
    pub full_name: Option<String>,
    pub role: Role,
}

impl NewProfile {
    /// Default profile for a first sign-in: church role, name taken from
    /// the local part of the email address.
    pub fn first_sign_in(id: DbId, email: Option<&str>) -> Self {
        let full_name = email
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .map(str::to_string);
        Self {
            id,
            full_name,
            role: Role::Church,
        }
    }
}

impl NewProfile {
    /// Profile of a client account created by an agency.
    pub fn client(id: DbId, full_name: &str) -> Self {
        Self {
            id,
            full_name: Some(full_name.to_string()),
            role: Role::Church,
        }
    }
}

/// Shown in the client list when the auth service has no address.
pub const MISSING_EMAIL: &str = "Keine E-Mail";

/// DTO for onboarding a client account.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateClient {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "name")]
    #[validate(custom(function = "full_name_field"))]
    pub full_name: String,
}

impl CreateClient {
    /// Whether every field has a non-blank value.
    pub fn is_complete(&self) -> bool {
        [&self.email, &self.password, &self.full_name]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Email and name without surrounding whitespace. The password is kept
    /// as entered.
    pub fn trimmed(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
        }
    }
}

/// A client profile with the account's email address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientView {
    #[serde(flatten)]
    pub profile: Profile,
    pub email: String,
}

impl ClientView {
    pub fn new(profile: Profile, email: Option<String>) -> Self {
        Self {
            profile,
            email: email.unwrap_or_else(|| MISSING_EMAIL.to_string()),
        }
    }
}

/// DTO for updating one's own profile.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateProfile {
    #[validate(custom(function = "full_name_field"))]
    pub full_name: String,
}

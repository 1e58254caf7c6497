//! Per-church branding of the dashboard.

use chrono::Utc;
use missionboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::hex_color_field;

pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Hier sind eure aktuellen Missionen.";
pub const DEFAULT_SHOW_FUTURE_PROJECTS: bool = true;

/// A row from the `dashboard_settings` table, one per church.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default)]
    pub id: Option<DbId>,
    pub church_id: DbId,
    #[serde(default)]
    pub agency_id: Option<DbId>,
    pub primary_color: String,
    pub welcome_message: String,
    pub show_future_projects: bool,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// The settings as the dashboard renders them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branding {
    pub primary_color: String,
    pub welcome_message: String,
    pub show_future_projects: bool,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            show_future_projects: DEFAULT_SHOW_FUTURE_PROJECTS,
        }
    }
}

impl From<&DashboardSettings> for Branding {
    fn from(settings: &DashboardSettings) -> Self {
        Self {
            primary_color: settings.primary_color.clone(),
            welcome_message: settings.welcome_message.clone(),
            show_future_projects: settings.show_future_projects,
        }
    }
}

/// DTO for saving branding. Missing fields keep the stored (or default)
/// value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpsertDashboardSettings {
    #[validate(custom(function = "hex_color_field"))]
    pub primary_color: Option<String>,
    #[validate(length(max = 500))]
    pub welcome_message: Option<String>,
    pub show_future_projects: Option<bool>,
}

/// Row written by the upsert, keyed on `church_id`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSettingsRow {
    pub church_id: DbId,
    pub agency_id: Option<DbId>,
    pub primary_color: String,
    pub welcome_message: String,
    pub show_future_projects: bool,
    pub updated_at: Timestamp,
}

impl DashboardSettingsRow {
    /// Settings stored when an agency onboards a new client.
    pub fn welcome(church_id: DbId, agency_id: DbId, full_name: &str) -> Self {
        Self {
            church_id,
            agency_id: Some(agency_id),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            welcome_message: format!("Willkommen, {full_name}!"),
            show_future_projects: DEFAULT_SHOW_FUTURE_PROJECTS,
            updated_at: Utc::now(),
        }
    }

    /// Overlay `input` on `current`.
    pub fn merged(
        church_id: DbId,
        agency_id: Option<DbId>,
        current: Branding,
        input: &UpsertDashboardSettings,
    ) -> Self {
        Self {
            church_id,
            agency_id,
            primary_color: input
                .primary_color
                .clone()
                .unwrap_or(current.primary_color),
            welcome_message: input
                .welcome_message
                .clone()
                .unwrap_or(current.welcome_message),
            show_future_projects: input
                .show_future_projects
                .unwrap_or(current.show_future_projects),
            updated_at: Utc::now(),
        }
    }
}

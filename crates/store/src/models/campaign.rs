//! Campaign DTOs. The row type itself is [`Campaign`] from the core crate.

use chrono::NaiveDate;
use missionboard_core::campaign::{CampaignStatus, PriorityLevel};
use missionboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{info_link_field, title_field};

pub use missionboard_core::campaign::Campaign;

/// DTO for creating a new campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaign {
    #[validate(custom(function = "title_field"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom(function = "info_link_field"))]
    pub info_link: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub priority_level: Option<PriorityLevel>,
}

/// DTO for editing campaign details. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCampaign {
    #[validate(custom(function = "title_field"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "info_link_field"))]
    pub info_link: Option<String>,
    pub start_date: Option<NaiveDate>,
}

/// Completion report submitted when a campaign is closed out.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CompleteCampaign {
    /// Required; kept optional so a missing value is a validation error
    /// rather than a body rejection.
    pub goals_reached: Option<bool>,
    pub goals_reached_reason: Option<String>,
    pub performance_summary: Option<String>,
    pub lessons_learned: Option<String>,
}

/// Row written by an insert.
#[derive(Debug, Clone, Serialize)]
pub struct NewCampaign {
    pub title: String,
    pub description: Option<String>,
    pub info_link: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub status: CampaignStatus,
    pub priority: i32,
    pub priority_level: PriorityLevel,
    pub created_by: Option<DbId>,
}

/// Partial update of a campaign row. `None` leaves the column alone.
///
/// `archived_at` is doubly optional so it can be cleared: `Some(None)`
/// writes `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<PriorityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<Option<Timestamp>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_reached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_reached_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lessons_learned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl From<&UpdateCampaign> for CampaignPatch {
    fn from(input: &UpdateCampaign) -> Self {
        Self {
            title: input.title.as_ref().map(|t| t.trim().to_string()),
            description: input.description.clone(),
            info_link: input.info_link.clone(),
            start_date: input.start_date,
            ..Self::default()
        }
    }
}

impl CampaignPatch {
    pub fn status(status: CampaignStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn priority_level(level: PriorityLevel) -> Self {
        Self {
            priority_level: Some(level),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The same patch with `updated_at` set to `now` unless already set.
    pub fn stamped(&self, now: Timestamp) -> Self {
        Self {
            updated_at: Some(self.updated_at.unwrap_or(now)),
            ..self.clone()
        }
    }
}

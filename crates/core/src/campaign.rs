//! Campaign record and the small enums that drive its placement.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a campaign.
///
/// Normal use moves forward (`waiting` -> `in_preparation` -> `live` ->
/// `completed`), but any transition is allowed: reuse takes a completed
/// campaign back to `waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Waiting,
    InPreparation,
    Live,
    Completed,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 4] = [
        CampaignStatus::Waiting,
        CampaignStatus::InPreparation,
        CampaignStatus::Live,
        CampaignStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Waiting => "waiting",
            CampaignStatus::InPreparation => "in_preparation",
            CampaignStatus::Live => "live",
            CampaignStatus::Completed => "completed",
        }
    }

    /// Bucket a campaign with this status lands in under the status-driven
    /// policy. Completed campaigns belong to no bucket.
    pub fn bucket(self) -> Option<Bucket> {
        match self {
            CampaignStatus::Live | CampaignStatus::InPreparation => Some(Bucket::Active),
            CampaignStatus::Waiting => Some(Bucket::Future),
            CampaignStatus::Completed => None,
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampaignStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid campaign status '{s}'. Must be one of: waiting, in_preparation, live, completed"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Priority level
// ---------------------------------------------------------------------------

/// Coarse priority tag. Only orders the future bucket and is independent of
/// the numeric `priority` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl PriorityLevel {
    /// Sort rank: `high` (0) before `medium` (1) before `low` (2).
    pub fn rank(self) -> u8 {
        match self {
            PriorityLevel::High => 0,
            PriorityLevel::Medium => 1,
            PriorityLevel::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::High => "high",
            PriorityLevel::Medium => "medium",
            PriorityLevel::Low => "low",
        }
    }
}

impl FromStr for PriorityLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(PriorityLevel::High),
            "medium" => Ok(PriorityLevel::Medium),
            "low" => Ok(PriorityLevel::Low),
            other => Err(CoreError::Validation(format!(
                "Invalid priority level '{other}'. Must be one of: high, medium, low"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Bucket
// ---------------------------------------------------------------------------

/// One of the two display lists of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Active,
    Future,
}

impl Bucket {
    /// Status a campaign receives when it is dragged into this bucket.
    pub fn entry_status(self) -> CampaignStatus {
        match self {
            Bucket::Active => CampaignStatus::InPreparation,
            Bucket::Future => CampaignStatus::Waiting,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Active => "active",
            Bucket::Future => "future",
        }
    }
}

// ---------------------------------------------------------------------------
// Campaign
// ---------------------------------------------------------------------------

/// A row of the `campaigns` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: DbId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub info_link: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub priority: i32,
    /// Stored as nullable; read through [`Campaign::level`].
    #[serde(default)]
    pub priority_level: Option<PriorityLevel>,
    #[serde(default)]
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub archived_at: Option<Timestamp>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub performance_summary: Option<String>,
    #[serde(default)]
    pub goals_reached: Option<bool>,
    #[serde(default)]
    pub goals_reached_reason: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
}

impl Campaign {
    /// A campaign with only the required fields set.
    pub fn new(
        id: DbId,
        title: impl Into<String>,
        status: CampaignStatus,
        priority: i32,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            info_link: None,
            start_date: None,
            status,
            priority,
            priority_level: None,
            created_by: None,
            created_at,
            updated_at: None,
            archived_at: None,
            completed_at: None,
            performance_summary: None,
            goals_reached: None,
            goals_reached_reason: None,
            lessons_learned: None,
        }
    }

    /// Priority level with the storage default applied.
    pub fn level(&self) -> PriorityLevel {
        self.priority_level.unwrap_or_default()
    }
}

//! Leads collected for a campaign (written by the ad-platform webhook).

use missionboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// A row from the `leads` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: DbId,
    pub campaign_id: DbId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub meta_lead_id: Option<String>,
    #[serde(default)]
    pub meta_form_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    pub created_at: Timestamp,
}

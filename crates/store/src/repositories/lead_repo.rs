//! Repository for the `leads` table (read-only here).

use missionboard_core::types::DbId;

use crate::error::StoreError;
use crate::models::lead::Lead;
use crate::remote::{decode_rows, Direction, Filter, Query, RemoteStore};

pub const TABLE: &str = "leads";

pub struct LeadRepo;

impl LeadRepo {
    /// Leads of one campaign, newest first.
    pub async fn list_by_campaign(
        store: &dyn RemoteStore,
        campaign_id: DbId,
    ) -> Result<Vec<Lead>, StoreError> {
        let query = Query::new()
            .filter(Filter::eq("campaign_id", campaign_id))
            .order_by("created_at", Direction::Desc);
        decode_rows(TABLE, store.select(TABLE, &query).await?)
    }
}

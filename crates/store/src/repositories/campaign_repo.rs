//! Repository for the `campaigns` table.

use chrono::Utc;
use missionboard_core::campaign::{Campaign, CampaignStatus};
use missionboard_core::partition::ArchiveModel;
use missionboard_core::reorder::OrderWrite;
use missionboard_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::error::StoreError;
use crate::models::campaign::{CampaignPatch, NewCampaign};
use crate::remote::{
    decode_first, decode_row, decode_rows, encode_row, Direction, Filter, Query, RemoteStore,
};

pub const TABLE: &str = "campaigns";

/// One row of a bulk order write.
#[derive(Serialize)]
struct OrderRow<'a> {
    #[serde(flatten)]
    write: &'a OrderWrite,
    updated_at: Timestamp,
}

/// Provides CRUD and bulk-order operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Campaigns still on the board under `model`, lowest `priority` first.
    pub async fn list(
        store: &dyn RemoteStore,
        model: ArchiveModel,
    ) -> Result<Vec<Campaign>, StoreError> {
        let open = match model {
            ArchiveModel::CompletedStatus => Filter::neq("status", CampaignStatus::Completed),
            ArchiveModel::ArchivedAt => Filter::is_null("archived_at"),
        };
        let query = Query::new()
            .filter(open)
            .order_by("priority", Direction::Asc);
        decode_rows(TABLE, store.select(TABLE, &query).await?)
    }

    /// Closed campaigns for the archive page, most recently closed first.
    pub async fn list_archived(
        store: &dyn RemoteStore,
        model: ArchiveModel,
    ) -> Result<Vec<Campaign>, StoreError> {
        let query = match model {
            ArchiveModel::CompletedStatus => Query::new()
                .filter(Filter::eq("status", CampaignStatus::Completed))
                .order_by("updated_at", Direction::Desc),
            ArchiveModel::ArchivedAt => Query::new()
                .filter(Filter::not_null("archived_at"))
                .order_by("archived_at", Direction::Desc),
        };
        decode_rows(TABLE, store.select(TABLE, &query).await?)
    }

    pub async fn find_by_id(
        store: &dyn RemoteStore,
        id: DbId,
    ) -> Result<Option<Campaign>, StoreError> {
        let query = Query::new().filter(Filter::eq("id", id)).limit(1);
        store
            .select(TABLE, &query)
            .await?
            .into_iter()
            .next()
            .map(|row| decode_row(TABLE, row))
            .transpose()
    }

    /// Insert a new campaign, returning the created row.
    pub async fn create(
        store: &dyn RemoteStore,
        input: &NewCampaign,
    ) -> Result<Campaign, StoreError> {
        let row = store.insert(TABLE, encode_row(TABLE, input)?).await?;
        decode_row(TABLE, row)
    }

    /// Apply `patch` to one campaign, stamping `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` is visible.
    pub async fn update(
        store: &dyn RemoteStore,
        id: DbId,
        patch: &CampaignPatch,
    ) -> Result<Option<Campaign>, StoreError> {
        let rows = store
            .update(
                TABLE,
                encode_row(TABLE, &patch.stamped(Utc::now()))?,
                &[Filter::eq("id", id)],
            )
            .await?;
        if rows.is_empty() {
            return Ok(None);
        }
        decode_first(TABLE, rows).map(Some)
    }

    /// Persist a reorder in one bulk upsert keyed on `id`.
    pub async fn upsert_order(
        store: &dyn RemoteStore,
        writes: &[OrderWrite],
    ) -> Result<(), StoreError> {
        let updated_at = Utc::now();
        let rows = writes
            .iter()
            .map(|write| encode_row(TABLE, &OrderRow { write, updated_at }))
            .collect::<Result<Vec<_>, _>>()?;
        store.upsert(TABLE, rows, "id").await?;
        Ok(())
    }

    /// Permanently delete a campaign. Returns `true` if a row was removed.
    pub async fn delete(store: &dyn RemoteStore, id: DbId) -> Result<bool, StoreError> {
        Ok(store.delete(TABLE, &[Filter::eq("id", id)]).await? > 0)
    }
}

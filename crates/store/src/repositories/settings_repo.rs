//! Repository for the `dashboard_settings` table.

use missionboard_core::types::DbId;

use crate::error::StoreError;
use crate::models::dashboard_settings::{DashboardSettings, DashboardSettingsRow};
use crate::remote::{decode_first, decode_row, encode_row, Filter, Query, RemoteStore};

pub const TABLE: &str = "dashboard_settings";

pub struct DashboardSettingsRepo;

impl DashboardSettingsRepo {
    pub async fn find_by_church(
        store: &dyn RemoteStore,
        church_id: DbId,
    ) -> Result<Option<DashboardSettings>, StoreError> {
        let query = Query::new()
            .filter(Filter::eq("church_id", church_id))
            .limit(1);
        store
            .select(TABLE, &query)
            .await?
            .into_iter()
            .next()
            .map(|row| decode_row(TABLE, row))
            .transpose()
    }

    /// Insert or replace the settings of `row.church_id`.
    pub async fn upsert(
        store: &dyn RemoteStore,
        row: &DashboardSettingsRow,
    ) -> Result<DashboardSettings, StoreError> {
        let rows = store
            .upsert(TABLE, vec![encode_row(TABLE, row)?], "church_id")
            .await?;
        decode_first(TABLE, rows)
    }
}

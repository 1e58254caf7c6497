//! Repository for the `profiles` table.

use missionboard_core::roles::{ROLE_CHURCH, ROLE_CLIENT_ALIAS};
use missionboard_core::types::DbId;

use crate::error::StoreError;
use crate::models::profile::{NewProfile, Profile, UpdateProfile};
use crate::remote::{
    decode_row, decode_rows, encode_row, Direction, Filter, Query, RemoteStore,
};

pub const TABLE: &str = "profiles";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(
        store: &dyn RemoteStore,
        id: DbId,
    ) -> Result<Option<Profile>, StoreError> {
        let query = Query::new().filter(Filter::eq("id", id)).limit(1);
        store
            .select(TABLE, &query)
            .await?
            .into_iter()
            .next()
            .map(|row| decode_row(TABLE, row))
            .transpose()
    }

    pub async fn create(store: &dyn RemoteStore, input: &NewProfile) -> Result<Profile, StoreError> {
        let row = store.insert(TABLE, encode_row(TABLE, input)?).await?;
        decode_row(TABLE, row)
    }

    /// Load the profile for `id`, creating the first-sign-in default if
    /// there is none yet.
    pub async fn find_or_create(
        store: &dyn RemoteStore,
        id: DbId,
        email: Option<&str>,
    ) -> Result<Profile, StoreError> {
        if let Some(profile) = Self::find_by_id(store, id).await? {
            return Ok(profile);
        }
        tracing::info!(user_id = %id, "Creating profile on first sign-in");
        Self::create(store, &NewProfile::first_sign_in(id, email)).await
    }

    /// Returns `None` if no row with the given `id` is visible.
    pub async fn update(
        store: &dyn RemoteStore,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, StoreError> {
        let rows = store
            .update(TABLE, encode_row(TABLE, input)?, &[Filter::eq("id", id)])
            .await?;
        rows.into_iter()
            .next()
            .map(|row| decode_row(TABLE, row))
            .transpose()
    }

    /// Church accounts (legacy `client` rows included), newest first.
    pub async fn list_churches(store: &dyn RemoteStore) -> Result<Vec<Profile>, StoreError> {
        let query = Query::new()
            .filter(Filter::any_of("role", [ROLE_CHURCH, ROLE_CLIENT_ALIAS]))
            .order_by("created_at", Direction::Desc);
        decode_rows(TABLE, store.select(TABLE, &query).await?)
    }
}

//! A viewer's board session: the local list of open campaigns plus the
//! operations that keep it and the store in step.
//!
//! Drag gestures are optimistic. `drag_end` shows the planned order right
//! away, sends one bulk upsert, and on failure throws the local state away
//! and refetches. Status and level edits are not optimistic: the local list
//! only changes once the store has accepted the write.

use chrono::Utc;
use missionboard_core::campaign::{Campaign, CampaignStatus, PriorityLevel};
use missionboard_core::error::CoreError;
use missionboard_core::partition::{partition, ArchiveModel, Partition, PartitionPolicy};
use missionboard_core::reorder::{plan_drag_end, DragEvent, StatusChange};
use missionboard_core::types::DbId;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::campaign::{
    CampaignPatch, CompleteCampaign, CreateCampaign, NewCampaign, UpdateCampaign,
};
use crate::models::validate_input;
use crate::remote::RemoteStore;
use crate::repositories::CampaignRepo;

const ENTITY: &str = "campaign";

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a finished drag did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DragOutcome {
    /// Nothing to do; the list is back to its pre-drag state.
    Noop,
    /// The new order was written.
    Persisted {
        writes: usize,
        status_change: Option<StatusChange>,
    },
    /// The write failed and the list was refetched from the store.
    Reverted { error: String },
}

#[derive(Debug, Clone)]
pub struct Board {
    policy: PartitionPolicy,
    items: Vec<Campaign>,
    /// List as it was when the current drag started.
    drag_origin: Option<Vec<Campaign>>,
}

impl Board {
    pub fn new(policy: PartitionPolicy) -> Self {
        Self {
            policy,
            items: Vec::new(),
            drag_origin: None,
        }
    }

    pub async fn load(store: &dyn RemoteStore, policy: PartitionPolicy) -> Result<Self, BoardError> {
        let mut board = Self::new(policy);
        board.sync(store).await?;
        Ok(board)
    }

    /// Replace the local list with the store's open campaigns. Any drag in
    /// progress is dropped.
    pub async fn sync(&mut self, store: &dyn RemoteStore) -> Result<(), BoardError> {
        let policy = self.policy;
        self.items = CampaignRepo::list(store, policy.archive_model()).await?;
        self.drag_origin = None;
        tracing::debug!(count = self.items.len(), policy = policy.name(), "Board synced");
        Ok(())
    }

    /// Sync unless a drag is in progress. Returns whether a sync ran.
    ///
    /// A drag keeps planning against the list it started from, so edits
    /// made elsewhere show up once the gesture is over.
    pub async fn refresh_if_idle(&mut self, store: &dyn RemoteStore) -> Result<bool, BoardError> {
        if self.is_dragging() {
            return Ok(false);
        }
        self.sync(store).await?;
        Ok(true)
    }

    pub fn policy(&self) -> PartitionPolicy {
        self.policy
    }

    pub fn items(&self) -> &[Campaign] {
        &self.items
    }

    pub fn get(&self, id: DbId) -> Option<&Campaign> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn partition(&self) -> Partition {
        partition(&self.items, self.policy)
    }

    /// Priority given to a newly created or reused campaign.
    pub fn next_priority(&self) -> i32 {
        self.items.len() as i32 + 1
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    // -----------------------------------------------------------------------
    // Drag and drop
    // -----------------------------------------------------------------------

    /// Preview `event` locally. Nothing is written. Returns whether the
    /// preview differs from the pre-drag list.
    pub fn drag_over(&mut self, event: &DragEvent) -> bool {
        let origin = self
            .drag_origin
            .get_or_insert_with(|| self.items.clone());
        match plan_drag_end(origin, event, self.policy) {
            Some(plan) => {
                self.items = plan.items;
                true
            }
            None => {
                self.items = origin.clone();
                false
            }
        }
    }

    /// Restore the pre-drag list. Returns `false` if no drag was running.
    pub fn drag_cancel(&mut self) -> bool {
        match self.drag_origin.take() {
            Some(origin) => {
                self.items = origin;
                true
            }
            None => false,
        }
    }

    /// Finish a drag: apply the plan locally, persist it with one bulk
    /// upsert, and refetch if the upsert fails.
    pub async fn drag_end(
        &mut self,
        store: &dyn RemoteStore,
        event: &DragEvent,
    ) -> Result<DragOutcome, BoardError> {
        let base = self
            .drag_origin
            .take()
            .unwrap_or_else(|| self.items.clone());
        let Some(plan) = plan_drag_end(&base, event, self.policy) else {
            self.items = base;
            return Ok(DragOutcome::Noop);
        };

        self.items = plan.items;
        match CampaignRepo::upsert_order(store, &plan.writes).await {
            Ok(()) => {
                tracing::info!(
                    campaign_id = %event.active_id,
                    writes = plan.writes.len(),
                    status_changed = plan.status_change.is_some(),
                    "Reorder persisted"
                );
                Ok(DragOutcome::Persisted {
                    writes: plan.writes.len(),
                    status_change: plan.status_change,
                })
            }
            Err(err) => {
                tracing::error!(
                    campaign_id = %event.active_id,
                    error = %err,
                    "Failed to persist reorder, refetching"
                );
                if let Err(sync_err) = self.sync(store).await {
                    self.items = base;
                    return Err(sync_err);
                }
                Ok(DragOutcome::Reverted {
                    error: err.to_string(),
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Single-campaign mutations
    // -----------------------------------------------------------------------

    pub async fn set_status(
        &mut self,
        store: &dyn RemoteStore,
        id: DbId,
        status: CampaignStatus,
    ) -> Result<Campaign, BoardError> {
        self.patch(store, id, &CampaignPatch::status(status)).await
    }

    pub async fn set_priority_level(
        &mut self,
        store: &dyn RemoteStore,
        id: DbId,
        level: PriorityLevel,
    ) -> Result<Campaign, BoardError> {
        self.patch(store, id, &CampaignPatch::priority_level(level)).await
    }

    /// New campaigns start as `waiting` at the end of the list.
    pub async fn create(
        &mut self,
        store: &dyn RemoteStore,
        input: &CreateCampaign,
        created_by: Option<DbId>,
    ) -> Result<Campaign, BoardError> {
        validate_input(input)?;
        let new = NewCampaign {
            title: input.title.trim().to_string(),
            description: input.description.clone(),
            info_link: input.info_link.clone(),
            start_date: input.start_date,
            status: CampaignStatus::Waiting,
            priority: self.next_priority(),
            priority_level: input.priority_level.unwrap_or_default(),
            created_by,
        };
        let created = CampaignRepo::create(store, &new).await?;
        tracing::info!(campaign_id = %created.id, priority = created.priority, "Campaign created");
        self.apply(created.clone());
        Ok(created)
    }

    pub async fn update_details(
        &mut self,
        store: &dyn RemoteStore,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Campaign, BoardError> {
        validate_input(input)?;
        let patch = CampaignPatch::from(input);
        if patch.is_empty() {
            return CampaignRepo::find_by_id(store, id)
                .await?
                .ok_or(BoardError::Core(CoreError::NotFound { entity: ENTITY, id }));
        }
        self.patch(store, id, &patch).await
    }

    /// Close a campaign with its report. Sets both `completed_at` and
    /// `archived_at`, so it leaves the board under either policy.
    pub async fn complete(
        &mut self,
        store: &dyn RemoteStore,
        id: DbId,
        input: &CompleteCampaign,
    ) -> Result<Campaign, BoardError> {
        let goals_reached = input.goals_reached.ok_or_else(|| {
            CoreError::Validation("goals_reached is required to complete a campaign".into())
        })?;
        let now = Utc::now();
        let patch = CampaignPatch {
            status: Some(CampaignStatus::Completed),
            completed_at: Some(now),
            archived_at: Some(Some(now)),
            goals_reached: Some(goals_reached),
            goals_reached_reason: input.goals_reached_reason.clone(),
            performance_summary: input.performance_summary.clone(),
            lessons_learned: input.lessons_learned.clone(),
            ..CampaignPatch::default()
        };
        self.patch(store, id, &patch).await
    }

    /// Archive without a report, using the policy's archival field.
    pub async fn archive(&mut self, store: &dyn RemoteStore, id: DbId) -> Result<Campaign, BoardError> {
        let now = Utc::now();
        let patch = match self.policy.archive_model() {
            ArchiveModel::CompletedStatus => CampaignPatch {
                status: Some(CampaignStatus::Completed),
                completed_at: Some(now),
                ..CampaignPatch::default()
            },
            ArchiveModel::ArchivedAt => CampaignPatch {
                archived_at: Some(Some(now)),
                ..CampaignPatch::default()
            },
        };
        self.patch(store, id, &patch).await
    }

    /// Bring an archived or completed campaign back as `waiting`, appended
    /// to the end of the list.
    pub async fn reuse(&mut self, store: &dyn RemoteStore, id: DbId) -> Result<Campaign, BoardError> {
        let others = self.items.iter().filter(|c| c.id != id).count();
        let patch = CampaignPatch {
            status: Some(CampaignStatus::Waiting),
            archived_at: Some(None),
            priority: Some(others as i32 + 1),
            ..CampaignPatch::default()
        };
        self.patch(store, id, &patch).await
    }

    pub async fn delete(&mut self, store: &dyn RemoteStore, id: DbId) -> Result<(), BoardError> {
        if !CampaignRepo::delete(store, id).await? {
            return Err(CoreError::NotFound { entity: ENTITY, id }.into());
        }
        self.items.retain(|c| c.id != id);
        tracing::info!(campaign_id = %id, "Campaign deleted");
        Ok(())
    }

    // ---- private helpers ----

    /// Write `patch` and fold the returned row into the local list.
    async fn patch(
        &mut self,
        store: &dyn RemoteStore,
        id: DbId,
        patch: &CampaignPatch,
    ) -> Result<Campaign, BoardError> {
        let updated = CampaignRepo::update(store, id, patch)
            .await?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
        self.apply(updated.clone());
        Ok(updated)
    }

    /// Replace, insert or drop `campaign` depending on whether it is open.
    fn apply(&mut self, campaign: Campaign) {
        let position = self.items.iter().position(|c| c.id == campaign.id);
        match (self.policy.is_open(&campaign), position) {
            (true, Some(index)) => self.items[index] = campaign,
            (true, None) => self.items.push(campaign),
            (false, Some(index)) => {
                self.items.remove(index);
            }
            (false, None) => {}
        }
    }
}

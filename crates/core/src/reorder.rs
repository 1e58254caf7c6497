//! Translating a finished drag gesture into a new ordering and a write set.
//!
//! [`plan_drag_end`] is pure: it returns the list the board should show
//! next and the rows that must be upserted to persist it. Sending the
//! writes, and recovering when they fail, is the caller's job.

use serde::{Deserialize, Serialize};

use crate::campaign::{Bucket, Campaign, CampaignStatus};
use crate::partition::{partition, Partition, PartitionPolicy};
use crate::types::DbId;

/// What the dragged card was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    /// Another campaign card.
    Campaign(DbId),
    /// The empty area of a bucket.
    Bucket(Bucket),
}

/// A drag event as emitted by the sortable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEvent {
    pub active_id: DbId,
    #[serde(default)]
    pub over: Option<DropTarget>,
}

/// One row of the bulk upsert that persists a reorder.
///
/// `title` is carried so the upsert's insert path satisfies the table's
/// NOT NULL constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWrite {
    pub id: DbId,
    pub title: String,
    pub priority: i32,
    pub status: CampaignStatus,
}

impl From<&Campaign> for OrderWrite {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            priority: c.priority,
            status: c.status,
        }
    }
}

/// The status transition caused by a cross-bucket move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub id: DbId,
    pub from: CampaignStatus,
    pub to: CampaignStatus,
}

/// Result of planning a drag end.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan {
    /// Open campaigns in render order after the move.
    pub items: Vec<Campaign>,
    /// Rows to upsert, one per campaign in the affected bucket(s).
    pub writes: Vec<OrderWrite>,
    pub status_change: Option<StatusChange>,
}

/// Plan the effect of dropping `event.active_id` on `event.over`.
///
/// Returns `None` when the gesture changes nothing: the dragged campaign or
/// the target is unknown, the card was dropped on itself or nowhere, the
/// index did not change, or the move stays inside the status-driven future
/// bucket (whose order is derived from level and age).
pub fn plan_drag_end(
    items: &[Campaign],
    event: &DragEvent,
    policy: PartitionPolicy,
) -> Option<ReorderPlan> {
    let over = event.over?;
    if over == DropTarget::Campaign(event.active_id) {
        return None;
    }

    match policy {
        PartitionPolicy::StatusDriven => plan_status_driven(items, event.active_id, over),
        PartitionPolicy::Positional { active_slots } => {
            plan_positional(items, event.active_id, over, active_slots)
        }
    }
}

/// Move the element at `from` to `to`, shifting the ones in between.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Priority for a campaign appended to the end of `bucket`.
pub fn next_priority(bucket: &[Campaign]) -> i32 {
    bucket.iter().map(|c| c.priority).max().unwrap_or(0) + 1
}

fn renumber(items: &mut [Campaign]) {
    for (index, campaign) in items.iter_mut().enumerate() {
        campaign.priority = index as i32 + 1;
    }
}

fn plan_status_driven(items: &[Campaign], active_id: DbId, over: DropTarget) -> Option<ReorderPlan> {
    let policy = PartitionPolicy::StatusDriven;
    let part = partition(items, policy);
    let from = part.bucket_of(active_id)?;
    let to = match over {
        DropTarget::Bucket(bucket) => bucket,
        DropTarget::Campaign(id) => part.bucket_of(id)?,
    };
    let Partition {
        mut active,
        mut future,
    } = part;

    if from != to {
        let (source, target) = match from {
            Bucket::Active => (&mut active, &mut future),
            Bucket::Future => (&mut future, &mut active),
        };
        let index = source.iter().position(|c| c.id == active_id)?;
        let mut moved = source.remove(index);
        let previous = moved.status;
        moved.status = to.entry_status();
        if to == Bucket::Active {
            moved.priority = next_priority(target);
        }
        let change = StatusChange {
            id: moved.id,
            from: previous,
            to: moved.status,
        };
        target.push(moved);

        let merged: Vec<Campaign> = active.into_iter().chain(future).collect();
        let items = partition(&merged, policy).into_items();
        let writes = items.iter().map(OrderWrite::from).collect();
        return Some(ReorderPlan {
            items,
            writes,
            status_change: Some(change),
        });
    }

    if from == Bucket::Future {
        return None;
    }

    let old_index = active.iter().position(|c| c.id == active_id)?;
    let new_index = match over {
        DropTarget::Campaign(id) => active.iter().position(|c| c.id == id)?,
        DropTarget::Bucket(_) => active.len() - 1,
    };
    if old_index == new_index {
        return None;
    }

    array_move(&mut active, old_index, new_index);
    renumber(&mut active);
    let writes = active.iter().map(OrderWrite::from).collect();
    Some(ReorderPlan {
        items: active.into_iter().chain(future).collect(),
        writes,
        status_change: None,
    })
}

fn plan_positional(
    items: &[Campaign],
    active_id: DbId,
    over: DropTarget,
    active_slots: usize,
) -> Option<ReorderPlan> {
    let mut ordered = partition(items, PartitionPolicy::Positional { active_slots }).into_items();
    let old_index = ordered.iter().position(|c| c.id == active_id)?;
    let last = ordered.len() - 1;
    let new_index = match over {
        DropTarget::Campaign(id) => ordered.iter().position(|c| c.id == id)?,
        DropTarget::Bucket(Bucket::Active) => active_slots.min(ordered.len()).saturating_sub(1),
        DropTarget::Bucket(Bucket::Future) => last,
    };
    if old_index == new_index {
        return None;
    }

    array_move(&mut ordered, old_index, new_index);
    renumber(&mut ordered);
    let writes = ordered.iter().map(OrderWrite::from).collect();
    Some(ReorderPlan {
        items: ordered,
        writes,
        status_change: None,
    })
}

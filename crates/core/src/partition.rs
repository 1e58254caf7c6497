//! Splitting the open campaigns into the active and future buckets.
//!
//! Two policies exist and they are not equivalent:
//!
//! - **Positional**: the first `active_slots` campaigns by `priority` are
//!   active. Editing a priority can move a campaign across the boundary
//!   without touching its status. Archival is the `archived_at` timestamp.
//! - **Status-driven**: `live` and `in_preparation` are active, `waiting` is
//!   future. Membership only changes with the status. Archival is the
//!   `completed` status.

use serde::{Deserialize, Serialize};

use crate::campaign::{Bucket, Campaign, CampaignStatus};
use crate::error::CoreError;
use crate::types::DbId;

/// Number of active slots under the positional policy.
pub const DEFAULT_ACTIVE_SLOTS: usize = 6;

pub const POLICY_STATUS: &str = "status";
pub const POLICY_POSITIONAL: &str = "positional";

/// How campaigns are assigned to buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartitionPolicy {
    Positional {
        active_slots: usize,
    },
    #[default]
    StatusDriven,
}

/// Which field marks a campaign as no longer open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveModel {
    /// `status = completed`.
    CompletedStatus,
    /// `archived_at IS NOT NULL`.
    ArchivedAt,
}

impl ArchiveModel {
    pub fn is_archived(self, campaign: &Campaign) -> bool {
        match self {
            ArchiveModel::CompletedStatus => campaign.status == CampaignStatus::Completed,
            ArchiveModel::ArchivedAt => campaign.archived_at.is_some(),
        }
    }
}

impl PartitionPolicy {
    /// Parse a policy name (`status` or `positional`).
    pub fn parse(name: &str, active_slots: usize) -> Result<Self, CoreError> {
        match name {
            POLICY_STATUS => Ok(PartitionPolicy::StatusDriven),
            POLICY_POSITIONAL => Ok(PartitionPolicy::Positional { active_slots }),
            other => Err(CoreError::Validation(format!(
                "Unknown partition policy '{other}'. Must be one of: {POLICY_STATUS}, {POLICY_POSITIONAL}"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PartitionPolicy::Positional { .. } => POLICY_POSITIONAL,
            PartitionPolicy::StatusDriven => POLICY_STATUS,
        }
    }

    pub fn archive_model(self) -> ArchiveModel {
        match self {
            PartitionPolicy::Positional { .. } => ArchiveModel::ArchivedAt,
            PartitionPolicy::StatusDriven => ArchiveModel::CompletedStatus,
        }
    }

    /// Whether the campaign is shown on the board at all.
    pub fn is_open(self, campaign: &Campaign) -> bool {
        !self.archive_model().is_archived(campaign)
    }
}

/// The two ordered display lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Partition {
    pub active: Vec<Campaign>,
    pub future: Vec<Campaign>,
}

impl Partition {
    pub fn bucket(&self, bucket: Bucket) -> &[Campaign] {
        match bucket {
            Bucket::Active => &self.active,
            Bucket::Future => &self.future,
        }
    }

    /// Bucket holding the campaign with `id`, if any.
    pub fn bucket_of(&self, id: DbId) -> Option<Bucket> {
        if self.active.iter().any(|c| c.id == id) {
            Some(Bucket::Active)
        } else if self.future.iter().any(|c| c.id == id) {
            Some(Bucket::Future)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.future.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.future.is_empty()
    }

    /// Flatten back into render order: active first, then future.
    pub fn into_items(self) -> Vec<Campaign> {
        self.active.into_iter().chain(self.future).collect()
    }
}

/// Split `campaigns` into buckets under `policy`.
///
/// Archived campaigns are dropped. All sorts are stable, so equal keys keep
/// their input order.
pub fn partition(campaigns: &[Campaign], policy: PartitionPolicy) -> Partition {
    let open = campaigns.iter().filter(|c| policy.is_open(c)).cloned();

    match policy {
        PartitionPolicy::Positional { active_slots } => {
            let mut ordered: Vec<Campaign> = open.collect();
            sort_by_priority(&mut ordered);
            let split = active_slots.min(ordered.len());
            let future = ordered.split_off(split);
            Partition {
                active: ordered,
                future,
            }
        }
        PartitionPolicy::StatusDriven => {
            let (mut active, mut future): (Vec<Campaign>, Vec<Campaign>) =
                open.partition(|c| c.status.bucket() == Some(Bucket::Active));
            sort_by_priority(&mut active);
            sort_future(&mut future);
            Partition { active, future }
        }
    }
}

fn sort_by_priority(items: &mut [Campaign]) {
    items.sort_by_key(|c| c.priority);
}

/// `high` before `medium` before `low`; oldest first within a level.
fn sort_future(items: &mut [Campaign]) {
    items.sort_by(|a, b| {
        a.level()
            .rank()
            .cmp(&b.level().rank())
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::campaign::PriorityLevel;
    use crate::types::Timestamp;

    fn t(minutes: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn campaign(title: &str, status: CampaignStatus, priority: i32) -> Campaign {
        Campaign::new(Uuid::new_v4(), title, status, priority, t(priority as i64))
    }

    fn titles(items: &[Campaign]) -> Vec<&str> {
        items.iter().map(|c| c.title.as_str()).collect()
    }

    // -----------------------------------------------------------------------
    // Status-driven
    // -----------------------------------------------------------------------

    #[test]
    fn status_policy_splits_by_status() {
        let items = vec![
            campaign("live", CampaignStatus::Live, 2),
            campaign("waiting", CampaignStatus::Waiting, 1),
            campaign("prep", CampaignStatus::InPreparation, 1),
        ];
        let part = partition(&items, PartitionPolicy::StatusDriven);
        assert_eq!(titles(&part.active), ["prep", "live"]);
        assert_eq!(titles(&part.future), ["waiting"]);
    }

    #[test]
    fn status_policy_excludes_completed() {
        let items = vec![
            campaign("done", CampaignStatus::Completed, 1),
            campaign("live", CampaignStatus::Live, 2),
        ];
        let part = partition(&items, PartitionPolicy::StatusDriven);
        assert_eq!(part.len(), 1);
        assert_eq!(part.bucket_of(items[0].id), None);
    }

    #[test]
    fn high_level_sorts_before_low_regardless_of_age() {
        let mut a = campaign("A", CampaignStatus::Waiting, 1);
        a.priority_level = Some(PriorityLevel::Low);
        a.created_at = t(1);
        let mut b = campaign("B", CampaignStatus::Waiting, 2);
        b.priority_level = Some(PriorityLevel::High);
        b.created_at = t(2);

        let part = partition(&[a, b], PartitionPolicy::StatusDriven);
        assert_eq!(titles(&part.future), ["B", "A"]);
    }

    #[test]
    fn equal_levels_are_fifo() {
        let mut older = campaign("older", CampaignStatus::Waiting, 9);
        older.priority_level = Some(PriorityLevel::Medium);
        older.created_at = t(1);
        let mut newer = campaign("newer", CampaignStatus::Waiting, 1);
        newer.priority_level = Some(PriorityLevel::Medium);
        newer.created_at = t(2);

        let part = partition(&[newer, older], PartitionPolicy::StatusDriven);
        assert_eq!(titles(&part.future), ["older", "newer"]);
    }

    #[test]
    fn equal_level_and_timestamp_keep_input_order() {
        let mut first = campaign("first", CampaignStatus::Waiting, 5);
        first.created_at = t(0);
        let mut second = campaign("second", CampaignStatus::Waiting, 1);
        second.created_at = t(0);
        second.priority_level = Some(PriorityLevel::Medium);

        let part = partition(&[first, second], PartitionPolicy::StatusDriven);
        assert_eq!(titles(&part.future), ["first", "second"]);
    }

    #[test]
    fn equal_priorities_keep_input_order() {
        let items = vec![
            campaign("x", CampaignStatus::Live, 1),
            campaign("y", CampaignStatus::InPreparation, 1),
        ];
        let part = partition(&items, PartitionPolicy::StatusDriven);
        assert_eq!(titles(&part.active), ["x", "y"]);
    }

    // -----------------------------------------------------------------------
    // Positional
    // -----------------------------------------------------------------------

    #[test]
    fn positional_policy_takes_first_slots() {
        let items: Vec<Campaign> = (1..=8)
            .rev()
            .map(|p| campaign(&format!("c{p}"), CampaignStatus::Waiting, p))
            .collect();
        let part = partition(&items, PartitionPolicy::Positional { active_slots: 6 });
        assert_eq!(titles(&part.active), ["c1", "c2", "c3", "c4", "c5", "c6"]);
        assert_eq!(titles(&part.future), ["c7", "c8"]);
    }

    #[test]
    fn positional_policy_ignores_status() {
        let items = vec![
            campaign("waiting", CampaignStatus::Waiting, 1),
            campaign("live", CampaignStatus::Live, 2),
        ];
        let part = partition(&items, PartitionPolicy::Positional { active_slots: 1 });
        assert_eq!(titles(&part.active), ["waiting"]);
        assert_eq!(titles(&part.future), ["live"]);
    }

    #[test]
    fn positional_policy_drops_archived_only() {
        let mut archived = campaign("archived", CampaignStatus::Live, 1);
        archived.archived_at = Some(t(10));
        let completed = campaign("completed", CampaignStatus::Completed, 2);

        let part = partition(
            &[archived, completed],
            PartitionPolicy::Positional { active_slots: 6 },
        );
        assert_eq!(titles(&part.active), ["completed"]);
    }

    #[test]
    fn short_list_fills_active_only() {
        let items = vec![campaign("only", CampaignStatus::Waiting, 1)];
        let part = partition(&items, PartitionPolicy::Positional { active_slots: 6 });
        assert_eq!(part.active.len(), 1);
        assert!(part.future.is_empty());
    }

    #[test]
    fn empty_input_gives_empty_buckets() {
        let part = partition(&[], PartitionPolicy::StatusDriven);
        assert!(part.is_empty());
    }

    // -----------------------------------------------------------------------
    // Disjoint cover
    // -----------------------------------------------------------------------

    #[test]
    fn buckets_are_disjoint_and_cover_open_items() {
        let mut items = Vec::new();
        for (i, status) in CampaignStatus::ALL.iter().cycle().take(12).enumerate() {
            items.push(campaign(&format!("c{i}"), *status, (i % 4) as i32));
        }

        for policy in [
            PartitionPolicy::StatusDriven,
            PartitionPolicy::Positional { active_slots: 6 },
        ] {
            let part = partition(&items, policy);
            let mut seen: Vec<DbId> = part
                .active
                .iter()
                .chain(part.future.iter())
                .map(|c| c.id)
                .collect();
            let total = seen.len();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), total, "buckets overlap under {policy:?}");

            let mut open: Vec<DbId> = items
                .iter()
                .filter(|c| policy.is_open(c))
                .map(|c| c.id)
                .collect();
            open.sort();
            assert_eq!(seen, open, "buckets do not cover open items under {policy:?}");
        }
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(
            PartitionPolicy::parse("status", 6).unwrap(),
            PartitionPolicy::StatusDriven
        );
        assert_eq!(
            PartitionPolicy::parse("positional", 4).unwrap(),
            PartitionPolicy::Positional { active_slots: 4 }
        );
        assert!(PartitionPolicy::parse("random", 6).is_err());
    }
}

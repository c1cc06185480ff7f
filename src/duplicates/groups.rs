//! On-demand group membership.
//!
//! # Overview
//!
//! Groups are never materialized. Membership is recomputed from
//! `group_id` equality every time it is needed, because the working
//! collection can change between calls (deletions, removals, repairs).
//! Keeping no parallel structure means there is only one source of truth.
//!
//! # Example
//!
//! ```
//! use dupekeep::duplicates::{peers, DuplicateItem};
//!
//! let items = vec![
//!     DuplicateItem::new("/a.mp4", "g1"),
//!     DuplicateItem::new("/b.mp4", "g1"),
//!     DuplicateItem::new("/c.mp4", "g2"),
//! ];
//!
//! let found = peers(&items[0], &items);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].path.to_str(), Some("/b.mp4"));
//! ```

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::item::{DuplicateItem, GroupId};

/// All members of `items` sharing `item`'s group, excluding `item` itself (by path).
#[must_use]
pub fn peers<'a>(item: &DuplicateItem, items: &'a [DuplicateItem]) -> Vec<&'a DuplicateItem> {
    items.iter().filter(|other| item.is_peer_of(other)).collect()
}

/// Indices of the peers of `items[index]`.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
#[must_use]
pub fn peer_indices(index: usize, items: &[DuplicateItem]) -> Vec<usize> {
    let item = &items[index];
    items
        .iter()
        .enumerate()
        .filter(|(_, other)| item.is_peer_of(other))
        .map(|(i, _)| i)
        .collect()
}

/// Whether `items[index]` has at least one peer left.
#[must_use]
pub fn has_peer(index: usize, items: &[DuplicateItem]) -> bool {
    items
        .get(index)
        .is_some_and(|item| items.iter().any(|other| item.is_peer_of(other)))
}

/// Distinct group ids in order of first appearance.
#[must_use]
pub fn group_ids(items: &[DuplicateItem]) -> Vec<GroupId> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(&item.group_id))
        .map(|item| item.group_id.clone())
        .collect()
}

/// Number of distinct groups.
#[must_use]
pub fn group_count(items: &[DuplicateItem]) -> usize {
    items
        .iter()
        .map(|item| &item.group_id)
        .collect::<HashSet<_>>()
        .len()
}

/// Indices of all items belonging to `group_id`, in collection order.
#[must_use]
pub fn group_members(group_id: &GroupId, items: &[DuplicateItem]) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| &item.group_id == group_id)
        .map(|(i, _)| i)
        .collect()
}

/// Statistics about the groups currently in a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    /// Number of items in the collection
    pub total_items: usize,
    /// Total size of all items in bytes
    pub total_size: u64,
    /// Number of distinct groups
    pub groups: usize,
    /// Groups with fewer than two members
    pub degenerate_groups: usize,
    /// Items marked for removal
    pub checked_items: usize,
    /// Bytes freed if every checked item were deleted
    pub reclaimable_space: u64,
    /// Groups in which every member is checked
    pub fully_checked_groups: usize,
}

impl GroupStats {
    /// Compute statistics for a collection.
    #[must_use]
    pub fn compute(items: &[DuplicateItem]) -> Self {
        let mut members: HashMap<&GroupId, (usize, usize)> = HashMap::new();
        let mut stats = Self {
            total_items: items.len(),
            ..Self::default()
        };

        for item in items {
            stats.total_size += item.size_bytes;
            let entry = members.entry(&item.group_id).or_default();
            entry.0 += 1;
            if item.checked {
                entry.1 += 1;
                stats.checked_items += 1;
                stats.reclaimable_space += item.size_bytes;
            }
        }

        stats.groups = members.len();
        stats.degenerate_groups = members.values().filter(|(total, _)| *total < 2).count();
        stats.fully_checked_groups = members
            .values()
            .filter(|(total, checked)| *total > 0 && total == checked)
            .count();
        stats
    }
}

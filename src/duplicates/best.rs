//! Per-group "best attribute" predicates.
//!
//! Each predicate answers whether an item holds the maximum of one metric
//! within its group. Ties count as best: two items sharing the largest
//! frame size are both flagged, which is what the list highlighting relies on.

use serde::Serialize;

use super::groups::peers;
use super::item::DuplicateItem;

/// No peer is larger on disk.
#[must_use]
pub fn is_largest_size(item: &DuplicateItem, peers: &[&DuplicateItem]) -> bool {
    !peers.iter().any(|p| p.size_bytes > item.size_bytes)
}

/// No peer has a larger frame.
#[must_use]
pub fn is_largest_frame(item: &DuplicateItem, peers: &[&DuplicateItem]) -> bool {
    !peers.iter().any(|p| p.frame_size > item.frame_size)
}

/// No peer has a higher bitrate.
#[must_use]
pub fn is_highest_bitrate(item: &DuplicateItem, peers: &[&DuplicateItem]) -> bool {
    !peers.iter().any(|p| p.bitrate_kbps > item.bitrate_kbps)
}

/// No peer plays longer, compared on whole seconds.
#[must_use]
pub fn is_longest_duration(item: &DuplicateItem, peers: &[&DuplicateItem]) -> bool {
    !peers.iter().any(|p| p.duration_secs() > item.duration_secs())
}

/// All best-attribute flags of one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BestFlags {
    /// Largest file in its group
    pub size: bool,
    /// Largest frame in its group
    pub frame_size: bool,
    /// Highest bitrate in its group
    pub bitrate: bool,
    /// Longest duration in its group
    pub duration: bool,
}

impl BestFlags {
    /// Resolve the flags of `item` against its peers in `items`.
    #[must_use]
    pub fn resolve(item: &DuplicateItem, items: &[DuplicateItem]) -> Self {
        let peers = peers(item, items);
        Self {
            size: is_largest_size(item, &peers),
            frame_size: is_largest_frame(item, &peers),
            bitrate: is_highest_bitrate(item, &peers),
            duration: is_longest_duration(item, &peers),
        }
    }

    /// Resolve flags for every item, in collection order.
    #[must_use]
    pub fn resolve_all(items: &[DuplicateItem]) -> Vec<Self> {
        items.iter().map(|item| Self::resolve(item, items)).collect()
    }
}

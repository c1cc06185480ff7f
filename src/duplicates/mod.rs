//! Duplicate group resolution.
//!
//! This module provides functionality for:
//! - The duplicate item record handed over by the scan stage
//! - On-demand group membership (no materialized groups)
//! - Ties-inclusive "best attribute" predicates
//! - Selection policies that mark items for removal
//! - The shared, lock-protected working collection

pub mod best;
pub mod groups;
pub mod item;
pub mod list;
pub mod selection;

// Re-export main types
pub use best::{is_highest_bitrate, is_largest_frame, is_largest_size, is_longest_duration, BestFlags};
pub use groups::{group_count, group_ids, group_members, has_peer, peer_indices, peers, GroupStats};
pub use item::{DuplicateItem, GroupId};
pub use list::DuplicateList;
pub use selection::{
    Equivalence, PatternSelection, SelectionError, SelectionPolicy, SelectionSummary,
};

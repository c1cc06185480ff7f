//! Selection policies: decide which members of each group to mark for removal.
//!
//! # Overview
//!
//! A policy walks the whole working collection and writes `checked` flags.
//! For every group it resolves, it designates exactly one survivor
//! (`checked = false`) before marking the others, so a resolved group can
//! never end up with every member checked.
//!
//! Groups are resolved at most once per run. The first item of a group that
//! has at least one qualifying duplicate among its peers becomes the
//! baseline `f`; when an item has no qualifying duplicate the scan moves on,
//! and a later member of the same group may still become the baseline.
//!
//! | Policy | Duplicates of `f` | Survivor |
//! |--------|-------------------|----------|
//! | `IdenticalOnly` | peers equal in every metric | `f` |
//! | `IdenticalIgnoringSize` | peers equal except size | smallest file |
//! | `LowestQuality` | peers with the same size and frame | best by quality cascade |
//! | `ClearAll` | - | everything unchecked |
//! | `PathPattern` | peers matching a regex | at least one per group |
//!
//! # Example
//!
//! ```
//! use dupekeep::duplicates::{DuplicateItem, SelectionPolicy};
//!
//! let mut items = vec![
//!     DuplicateItem::new("/a.mp4", "g").with_size(10),
//!     DuplicateItem::new("/b.mp4", "g").with_size(20),
//! ];
//!
//! SelectionPolicy::IdenticalIgnoringSize.apply(&mut items);
//! assert!(!items[0].checked);
//! assert!(items[1].checked);
//! ```

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use thiserror::Error;

use super::groups::{group_ids, group_members, peer_indices};
use super::item::{DuplicateItem, GroupId};

/// Errors raised while building a selection policy.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The path pattern is not a valid regular expression.
    #[error("invalid path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Equality relation used to find the duplicates of a baseline item.
///
/// None of the relations look at `path`, `checked` or `is_image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    /// Every tracked metric equal, numeric fields compared exactly.
    Full,
    /// Every tracked metric except the file size.
    IgnoringSize,
    /// Only size and frame size; bitrate, fps, duration and sample rate are ignored.
    IgnoringQuality,
}

impl Equivalence {
    /// Whether `a` and `b` are equal under this relation.
    #[must_use]
    pub fn matches(self, a: &DuplicateItem, b: &DuplicateItem) -> bool {
        match self {
            Self::Full => a.size_bytes == b.size_bytes && same_quality(a, b),
            Self::IgnoringSize => same_quality(a, b),
            Self::IgnoringQuality => a.size_bytes == b.size_bytes && a.frame_size == b.frame_size,
        }
    }
}

fn same_quality(a: &DuplicateItem, b: &DuplicateItem) -> bool {
    a.frame_size == b.frame_size
        && a.bitrate_kbps == b.bitrate_kbps
        && a.duration == b.duration
        && a.fps.to_bits() == b.fps.to_bits()
        && a.audio_sample_rate == b.audio_sample_rate
}

/// One step of the lowest-quality cascade.
struct CascadeStep {
    metric: &'static str,
    beats: fn(&DuplicateItem, &DuplicateItem) -> bool,
}

fn longer_duration(candidate: &DuplicateItem, keep: &DuplicateItem) -> bool {
    candidate.duration_secs() > keep.duration_secs()
}

fn higher_fps(candidate: &DuplicateItem, keep: &DuplicateItem) -> bool {
    candidate.fps > keep.fps
}

fn higher_bitrate(candidate: &DuplicateItem, keep: &DuplicateItem) -> bool {
    candidate.bitrate_kbps > keep.bitrate_kbps
}

fn higher_sample_rate(candidate: &DuplicateItem, keep: &DuplicateItem) -> bool {
    candidate.audio_sample_rate > keep.audio_sample_rate
}

/// Tie-break order for `LowestQuality`.
///
/// The fps step appears twice; the second pass can never change the outcome.
// TODO: confirm with product owners whether the second fps pass was meant to compare frame size.
const QUALITY_CASCADE: [CascadeStep; 5] = [
    CascadeStep {
        metric: "duration",
        beats: longer_duration,
    },
    CascadeStep {
        metric: "fps",
        beats: higher_fps,
    },
    CascadeStep {
        metric: "fps",
        beats: higher_fps,
    },
    CascadeStep {
        metric: "bitrate",
        beats: higher_bitrate,
    },
    CascadeStep {
        metric: "audio sample rate",
        beats: higher_sample_rate,
    },
];

/// Pick the survivor among `candidates` (baseline first) with the quality cascade.
///
/// Later steps only run while the survivor is still the baseline.
fn pick_highest_quality(items: &[DuplicateItem], candidates: &[usize]) -> usize {
    let baseline = candidates[0];
    let mut keep = baseline;

    for (step_index, step) in QUALITY_CASCADE.iter().enumerate() {
        if step_index > 0 && keep != baseline {
            break;
        }
        for &candidate in &candidates[1..] {
            if (step.beats)(&items[candidate], &items[keep]) {
                keep = candidate;
            }
        }
        if keep != baseline {
            log::trace!(
                "Quality cascade decided on {}: keeping {}",
                step.metric,
                items[keep].path.display()
            );
        }
    }

    keep
}

/// Path-based selection, the custom selection of the review list.
#[derive(Debug, Clone)]
pub struct PatternSelection {
    regex: Regex,
    select_matches: bool,
}

impl PatternSelection {
    /// Compile a pattern selection.
    ///
    /// # Arguments
    ///
    /// * `pattern` - Regular expression matched against the full path
    /// * `case_sensitive` - Match case exactly (default is case-insensitive)
    /// * `select_matches` - Check matching items (`true`) or uncheck them (`false`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the regex fails to compile.
    pub fn new(
        pattern: &str,
        case_sensitive: bool,
        select_matches: bool,
    ) -> Result<Self, SelectionError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|source| SelectionError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            regex,
            select_matches,
        })
    }

    /// Whether the item's path matches the pattern.
    #[must_use]
    pub fn is_match(&self, item: &DuplicateItem) -> bool {
        self.regex.is_match(&item.path.to_string_lossy())
    }

    fn apply(&self, items: &mut [DuplicateItem], summary: &mut SelectionSummary) {
        for group_id in group_ids(items) {
            let members = group_members(&group_id, items);
            let mut touched = false;

            if self.select_matches {
                let unchecked: Vec<usize> =
                    members.into_iter().filter(|&i| !items[i].checked).collect();
                let mut to_check: Vec<usize> = unchecked
                    .iter()
                    .copied()
                    .filter(|&i| self.is_match(&items[i]))
                    .collect();
                // Never check the last unchecked member of a group.
                if !to_check.is_empty() && to_check.len() == unchecked.len() {
                    to_check.pop();
                }
                for i in to_check {
                    items[i].checked = true;
                    summary.items_checked += 1;
                    touched = true;
                }
            } else {
                for i in members {
                    if items[i].checked && self.is_match(&items[i]) {
                        items[i].checked = false;
                        summary.items_unchecked += 1;
                        touched = true;
                    }
                }
            }

            if touched {
                summary.groups_resolved += 1;
            }
        }
    }
}

/// Counts produced by one policy run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    /// Groups in which the policy assigned flags
    pub groups_resolved: usize,
    /// Flags written as `checked = true`
    pub items_checked: usize,
    /// Flags written as `checked = false`
    pub items_unchecked: usize,
}

/// A deterministic rule for marking group members for removal.
#[derive(Debug, Clone)]
pub enum SelectionPolicy {
    /// Keep one copy of items identical in every metric.
    IdenticalOnly,
    /// Keep the smallest of items identical apart from their size.
    IdenticalIgnoringSize,
    /// Keep the highest quality item among same-size copies.
    LowestQuality,
    /// Uncheck everything.
    ClearAll,
    /// Check or uncheck items by path pattern.
    PathPattern(PatternSelection),
}

impl SelectionPolicy {
    /// Short policy name for logs and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::IdenticalOnly => "identical",
            Self::IdenticalIgnoringSize => "identical-ignoring-size",
            Self::LowestQuality => "lowest-quality",
            Self::ClearAll => "clear",
            Self::PathPattern(_) => "pattern",
        }
    }

    /// Run the policy over the whole collection.
    pub fn apply(&self, items: &mut [DuplicateItem]) -> SelectionSummary {
        let mut summary = SelectionSummary::default();

        match self {
            Self::IdenticalOnly => {
                resolve_groups(items, Equivalence::Full, &mut summary, |_, _, first| first);
            }
            Self::IdenticalIgnoringSize => {
                resolve_groups(
                    items,
                    Equivalence::IgnoringSize,
                    &mut summary,
                    |items, duplicates, first| {
                        let mut ordered = duplicates.to_vec();
                        ordered.push(first);
                        // Stable: equal sizes keep their relative order.
                        ordered.sort_by_key(|&i| items[i].size_bytes);
                        ordered[0]
                    },
                );
            }
            Self::LowestQuality => {
                resolve_groups(
                    items,
                    Equivalence::IgnoringQuality,
                    &mut summary,
                    |items, duplicates, first| {
                        let mut candidates = Vec::with_capacity(duplicates.len() + 1);
                        candidates.push(first);
                        candidates.extend_from_slice(duplicates);
                        pick_highest_quality(items, &candidates)
                    },
                );
            }
            Self::ClearAll => {
                for item in items.iter_mut() {
                    item.checked = false;
                }
                summary.items_unchecked = items.len();
            }
            Self::PathPattern(selection) => selection.apply(items, &mut summary),
        }

        log::info!(
            "Selection '{}': {} group(s) resolved, {} checked, {} unchecked",
            self.name(),
            summary.groups_resolved,
            summary.items_checked,
            summary.items_unchecked
        );
        summary
    }
}

/// Shared driver of the group-resolving policies.
///
/// `choose_survivor` receives the duplicates of the baseline (collection
/// order) and the baseline itself, and returns the index to keep.
fn resolve_groups<F>(
    items: &mut [DuplicateItem],
    equivalence: Equivalence,
    summary: &mut SelectionSummary,
    choose_survivor: F,
) where
    F: Fn(&[DuplicateItem], &[usize], usize) -> usize,
{
    let mut resolved: HashSet<GroupId> = HashSet::new();

    for first in 0..items.len() {
        if resolved.contains(&items[first].group_id) {
            continue;
        }

        let duplicates: Vec<usize> = peer_indices(first, items)
            .into_iter()
            .filter(|&i| equivalence.matches(&items[i], &items[first]))
            .collect();
        if duplicates.is_empty() {
            log::trace!(
                "No {:?} duplicates for {}",
                equivalence,
                items[first].path.display()
            );
            continue;
        }

        let keep = choose_survivor(items, &duplicates, first);

        items[keep].checked = false;
        summary.items_unchecked += 1;
        for &i in duplicates.iter().chain(std::iter::once(&first)) {
            if i != keep {
                items[i].checked = true;
                summary.items_checked += 1;
            }
        }

        log::debug!(
            "Group {}: keeping {} over {} duplicate(s)",
            items[first].group_id,
            items[keep].path.display(),
            duplicates.len()
        );
        resolved.insert(items[first].group_id.clone());
        summary.groups_resolved += 1;
    }
}

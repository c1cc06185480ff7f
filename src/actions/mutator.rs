//! Destructive operations on the working collection.
//!
//! # Overview
//!
//! [`GroupMutator`] removes checked items (optionally deleting the files),
//! clears selections and drives copy/move of the selection. Every removal is
//! followed by group repair, so no group with fewer than two members stays
//! in the collection.
//!
//! A failed file removal never keeps the item: the failure is logged and
//! recorded in the [`MutationReport`], and the item leaves the collection
//! like the others.
//!
//! # Example
//!
//! ```
//! use dupekeep::actions::{DeleteConfig, GroupMutator};
//! use dupekeep::duplicates::DuplicateItem;
//!
//! let mut items = vec![
//!     DuplicateItem::new("/a.mp4", "g"),
//!     DuplicateItem::new("/b.mp4", "g").with_checked(true),
//! ];
//!
//! let mutator = GroupMutator::new(DeleteConfig::trash().remover());
//! let report = mutator.remove_from_list(&mut items);
//!
//! // "/a.mp4" lost its only peer and was collapsed away.
//! assert!(items.is_empty());
//! assert_eq!(report.collapsed.len(), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::duplicates::{DuplicateItem, GroupId};
use crate::progress::BatchProgressCallback;

use super::delete::{ActionError, DeleteConfig, DeleteResult, FileRemover};
use super::transfer::{transfer_selection, TransferMode, TransferReport};

/// Outcome of a delete or remove-from-list batch.
#[derive(Debug, Clone, Default)]
pub struct MutationReport {
    /// Checked items taken out of the collection.
    pub removed: Vec<PathBuf>,
    /// Files successfully removed from disk.
    pub deleted: Vec<DeleteResult>,
    /// Files that could not be removed from disk, with the reason.
    pub failures: Vec<(PathBuf, String)>,
    /// Items dropped by group repair because no peer remained.
    pub collapsed: Vec<PathBuf>,
    /// The batch stopped early on a shutdown request.
    pub interrupted: bool,
}

impl MutationReport {
    /// Bytes released on disk.
    #[must_use]
    pub fn bytes_freed(&self) -> u64 {
        self.deleted.iter().map(|d| d.size).sum()
    }

    /// Check if any file operation failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Removed {} item(s), deleted {} file(s) ({}), collapsed {} group remnant(s)",
            self.removed.len(),
            self.deleted.len(),
            bytesize::ByteSize(self.bytes_freed()),
            self.collapsed.len()
        );
        if !self.failures.is_empty() {
            text.push_str(&format!(", {} failed", self.failures.len()));
        }
        if self.interrupted {
            text.push_str(" (interrupted)");
        }
        text
    }
}

/// Set every removal flag to `false`.
///
/// Returns the number of flags that changed. Membership is untouched.
pub fn clear_selection(items: &mut [DuplicateItem]) -> usize {
    let mut cleared = 0;
    for item in items.iter_mut().filter(|item| item.checked) {
        item.checked = false;
        cleared += 1;
    }
    cleared
}

/// Drop every item that has no remaining peer.
///
/// Returns the dropped items in collection order.
pub fn repair_groups(items: &mut Vec<DuplicateItem>) -> Vec<DuplicateItem> {
    let mut paths_by_group: HashMap<&GroupId, HashSet<&Path>> = HashMap::new();
    for item in items.iter() {
        paths_by_group
            .entry(&item.group_id)
            .or_default()
            .insert(item.path.as_path());
    }

    let keep: Vec<bool> = items
        .iter()
        .map(|item| paths_by_group.get(&item.group_id).map_or(0, HashSet::len) >= 2)
        .collect();

    let mut collapsed = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for (item, keep) in items.drain(..).zip(keep) {
        if keep {
            kept.push(item);
        } else {
            log::debug!("Collapsing degenerate group {}: {}", item.group_id, item.path.display());
            collapsed.push(item);
        }
    }
    *items = kept;
    collapsed
}

/// Groups whose members are all checked.
fn fully_checked_groups(items: &[DuplicateItem]) -> Vec<GroupId> {
    let mut all_checked: Vec<(GroupId, bool)> = Vec::new();
    for item in items {
        match all_checked.iter_mut().find(|(id, _)| *id == item.group_id) {
            Some((_, checked)) => *checked &= item.checked,
            None => all_checked.push((item.group_id.clone(), item.checked)),
        }
    }
    all_checked
        .into_iter()
        .filter_map(|(id, checked)| checked.then_some(id))
        .collect()
}

/// Applies destructive operations to a collection.
pub struct GroupMutator {
    remover: Box<dyn FileRemover>,
    shutdown: Option<Arc<AtomicBool>>,
}

impl GroupMutator {
    /// Create a mutator that removes files with `remover`.
    #[must_use]
    pub fn new(remover: Box<dyn FileRemover>) -> Self {
        Self {
            remover,
            shutdown: None,
        }
    }

    /// Create a mutator from a delete configuration.
    #[must_use]
    pub fn from_config(config: &DeleteConfig) -> Self {
        Self::new(config.remover())
    }

    /// Stop issuing file operations once `flag` is set.
    #[must_use]
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Remove every checked item, deleting its file first when `from_disk`.
    ///
    /// Items are visited from the end of the collection backwards. A failed
    /// file removal is logged and recorded; the item is removed regardless.
    /// Group repair runs afterwards, also when the batch was interrupted.
    pub fn delete(
        &self,
        items: &mut Vec<DuplicateItem>,
        from_disk: bool,
        callback: Option<&dyn BatchProgressCallback>,
    ) -> MutationReport {
        let operation = if from_disk { "delete" } else { "remove" };
        let mut report = MutationReport::default();

        for group in fully_checked_groups(items) {
            log::warn!("Every member of group {} is checked; none will survive", group);
        }

        let selected: Vec<usize> = (0..items.len()).rev().filter(|&i| items[i].checked).collect();
        if let Some(cb) = callback {
            cb.on_batch_start(operation, selected.len());
        }

        for (position, index) in selected.into_iter().enumerate() {
            if self.is_shutdown_requested() {
                log::info!("Stopping {} batch: shutdown requested", operation);
                report.interrupted = true;
                break;
            }

            let path = items[index].path.clone();
            if let Some(cb) = callback {
                cb.on_item(position, &path);
            }

            if from_disk {
                match self.remover.remove(&path) {
                    Ok(result) => {
                        if let Some(cb) = callback {
                            cb.on_item_success(&path, result.size);
                        }
                        report.deleted.push(result);
                    }
                    Err(e) => {
                        log::warn!("Failed to delete {}: {}", path.display(), e);
                        if let Some(cb) = callback {
                            cb.on_item_failure(&path, &e.to_string());
                        }
                        report.failures.push((path.clone(), e.to_string()));
                    }
                }
            } else if let Some(cb) = callback {
                cb.on_item_success(&path, 0);
            }

            log::trace!("Removing {} from the collection", path.display());
            items.remove(index);
            report.removed.push(path);
        }

        report.collapsed = repair_groups(items)
            .into_iter()
            .map(|item| item.path)
            .collect();

        if let Some(cb) = callback {
            cb.on_batch_end(operation);
        }
        log::info!("{}", report.summary());

        report
    }

    /// Take the checked items out of the collection without touching disk.
    pub fn remove_from_list(&self, items: &mut Vec<DuplicateItem>) -> MutationReport {
        self.delete(items, false, None)
    }

    /// Copy every checked item into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be used as a destination directory.
    pub fn copy_selection(
        &self,
        items: &[DuplicateItem],
        dir: &Path,
        callback: Option<&dyn BatchProgressCallback>,
    ) -> Result<TransferReport, ActionError> {
        transfer_selection(items, dir, TransferMode::Copy, self.shutdown.as_deref(), callback)
    }

    /// Move every checked item into `dir`.
    ///
    /// The collection still lists the old paths afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be used as a destination directory.
    pub fn move_selection(
        &self,
        items: &[DuplicateItem],
        dir: &Path,
        callback: Option<&dyn BatchProgressCallback>,
    ) -> Result<TransferReport, ActionError> {
        transfer_selection(items, dir, TransferMode::Move, self.shutdown.as_deref(), callback)
    }
}

impl std::fmt::Debug for GroupMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupMutator")
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}

//! The shared working collection.
//!
//! # Overview
//!
//! [`DuplicateList`] owns the flat list of [`DuplicateItem`]s on behalf of the
//! orchestrating layer. Engine operations borrow the items mutably for the
//! duration of one call through [`DuplicateList::with_items_mut`], holding the
//! write lock for the whole operation. Observers (a progress display, a
//! report writer, another thread) take [`DuplicateList::snapshot`] and never
//! see a half-applied batch.
//!
//! # Thread Safety
//!
//! `DuplicateList` is `Send + Sync` and cheap to clone; clones share the
//! same items.
//!
//! # Example
//!
//! ```
//! use dupekeep::duplicates::{DuplicateItem, DuplicateList, SelectionPolicy};
//!
//! let list = DuplicateList::new(vec![
//!     DuplicateItem::new("/a.mp4", "g"),
//!     DuplicateItem::new("/b.mp4", "g"),
//! ]);
//!
//! let observer = list.clone();
//! list.apply_policy(&SelectionPolicy::IdenticalOnly);
//!
//! let snapshot = observer.snapshot();
//! assert!(!snapshot[0].checked);
//! assert!(snapshot[1].checked);
//! ```

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::groups::GroupStats;
use super::item::DuplicateItem;
use super::selection::{SelectionPolicy, SelectionSummary};

/// Lock-protected, shareable collection of duplicate items.
#[derive(Debug, Clone, Default)]
pub struct DuplicateList {
    items: Arc<RwLock<Vec<DuplicateItem>>>,
}

impl DuplicateList {
    /// Wrap an existing collection.
    #[must_use]
    pub fn new(items: Vec<DuplicateItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    // Items are plain values; a panic in another holder cannot leave them
    // structurally broken, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Vec<DuplicateItem>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<DuplicateItem>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Owned copy of the current items.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DuplicateItem> {
        self.read().clone()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Group statistics of the current items.
    #[must_use]
    pub fn stats(&self) -> GroupStats {
        GroupStats::compute(&self.read())
    }

    /// Run `f` with shared access to the items.
    pub fn with_items<R>(&self, f: impl FnOnce(&[DuplicateItem]) -> R) -> R {
        f(&self.read())
    }

    /// Run `f` with exclusive access to the items.
    ///
    /// The write lock is held until `f` returns.
    pub fn with_items_mut<R>(&self, f: impl FnOnce(&mut Vec<DuplicateItem>) -> R) -> R {
        f(&mut self.write())
    }

    /// Append items delivered by the scan stage.
    pub fn extend(&self, items: impl IntoIterator<Item = DuplicateItem>) {
        self.write().extend(items);
    }

    /// Drop every item.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Apply a selection policy under the write lock.
    pub fn apply_policy(&self, policy: &SelectionPolicy) -> SelectionSummary {
        self.with_items_mut(|items| policy.apply(items))
    }

    /// Set the removal flag of a single item.
    ///
    /// Returns `false` if no item has that path.
    pub fn set_checked(&self, path: &Path, checked: bool) -> bool {
        let mut items = self.write();
        match items.iter_mut().find(|item| item.path == path) {
            Some(item) => {
                item.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Consume the list, returning the items.
    ///
    /// Falls back to a copy when other clones are still alive.
    #[must_use]
    pub fn into_items(self) -> Vec<DuplicateItem> {
        match Arc::try_unwrap(self.items) {
            Ok(lock) => lock.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => {
                let items = shared.read().unwrap_or_else(PoisonError::into_inner).clone();
                items
            }
        }
    }
}

impl From<Vec<DuplicateItem>> for DuplicateList {
    fn from(items: Vec<DuplicateItem>) -> Self {
        Self::new(items)
    }
}

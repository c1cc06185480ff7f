//! Data structures for sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duplicates::{DuplicateItem, DuplicateList};

/// Current version of the session file format.
pub const SESSION_VERSION: u32 = 1;

/// The working collection as exchanged with the scan stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Format version.
    pub version: u32,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Duplicate items in collection order, with their removal flags.
    pub items: Vec<DuplicateItem>,
}

impl Session {
    /// Create a new session with current timestamp and default version.
    #[must_use]
    pub fn new(items: Vec<DuplicateItem>) -> Self {
        Self {
            version: SESSION_VERSION,
            created_at: Utc::now(),
            items,
        }
    }

    /// Move the items into a shared working collection.
    #[must_use]
    pub fn into_list(self) -> DuplicateList {
        DuplicateList::new(self.items)
    }

    /// Replace the items, keeping version and creation time.
    #[must_use]
    pub fn with_items(self, items: Vec<DuplicateItem>) -> Self {
        Self { items, ..self }
    }
}

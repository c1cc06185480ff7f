//! File actions module.
//!
//! This module provides functionality for:
//! - Safe deletion via trash crate
//! - Permanent deletion (with explicit configuration)
//! - Removing checked items and repairing degenerate groups
//! - Copying or moving the selection without overwriting
//!
//! ```no_run
//! use dupekeep::actions::{DeleteConfig, GroupMutator};
//! use dupekeep::duplicates::DuplicateItem;
//!
//! let mut items: Vec<DuplicateItem> = Vec::new();
//! let mutator = GroupMutator::from_config(&DeleteConfig::trash());
//! let report = mutator.delete(&mut items, true, None);
//! println!("{}", report.summary());
//! ```

pub mod delete;
pub mod mutator;
pub mod transfer;

// Re-export commonly used types
pub use delete::{
    delete_to_trash, permanent_delete, ActionError, DeleteConfig, DeleteResult, FileRemover,
    PermanentRemover, TrashRemover,
};
pub use mutator::{clear_selection, repair_groups, GroupMutator, MutationReport};
pub use transfer::{
    create_unique_file, prepare_destination, transfer_file, transfer_selection,
    unique_destination, TransferMode, TransferReport, TransferResult,
};

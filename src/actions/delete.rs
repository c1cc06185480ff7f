//! File removal primitives.
//!
//! # Overview
//!
//! This module provides the filesystem side of deleting a duplicate:
//! - Move to system trash (default, recoverable)
//! - Permanent deletion (with explicit flag)
//! - A [`FileRemover`] seam so batch operations can be driven by either,
//!   or by a test double
//!
//! # Example
//!
//! ```no_run
//! use dupekeep::actions::delete::{DeleteConfig, FileRemover};
//! use std::path::Path;
//!
//! let remover = DeleteConfig::trash().remover();
//! match remover.remove(Path::new("/path/to/copy.mp4")) {
//!     Ok(result) => println!("Removed: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for file actions (delete, copy, move).
#[derive(Debug, Error)]
pub enum ActionError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when touching the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// Copying to the destination failed.
    #[error("copy of {path} to {destination} failed: {message}")]
    CopyFailed {
        path: PathBuf,
        destination: PathBuf,
        message: String,
    },

    /// The copy/move target exists but is not a directory.
    #[error("destination is not a directory: {0}")]
    DestinationNotDirectory(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::DestinationNotDirectory(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::CopyFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    /// Classify an `io::Error` raised while accessing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Result of a successful removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was removed.
    pub path: PathBuf,
    /// Size of the removed file in bytes.
    pub size: u64,
    /// Whether removal was permanent (true) or to trash (false).
    pub permanent: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, permanent: bool) -> Self {
        Self {
            path,
            size,
            permanent,
        }
    }
}

/// Removes one file from disk.
pub trait FileRemover: Send + Sync {
    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an `ActionError` describing why the file could not be removed.
    fn remove(&self, path: &Path) -> Result<DeleteResult, ActionError>;
}

/// Moves files to the system trash.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrashRemover;

impl FileRemover for TrashRemover {
    fn remove(&self, path: &Path) -> Result<DeleteResult, ActionError> {
        delete_to_trash(path)
    }
}

/// Unlinks files permanently.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermanentRemover;

impl FileRemover for PermanentRemover {
    fn remove(&self, path: &Path) -> Result<DeleteResult, ActionError> {
        permanent_delete(path)
    }
}

/// Configuration for deletion.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Use permanent deletion instead of trash.
    pub permanent: bool,
}

impl DeleteConfig {
    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self::default()
    }

    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self { permanent: true }
    }

    /// The remover matching this configuration.
    #[must_use]
    pub fn remover(&self) -> Box<dyn FileRemover> {
        if self.permanent {
            Box::new(PermanentRemover)
        } else {
            Box::new(TrashRemover)
        }
    }
}

fn file_size(path: &Path) -> Result<u64, ActionError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| ActionError::from_io(path, e))
}

/// Delete a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata can't be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, ActionError> {
    let size = file_size(path)?;

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        ActionError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, false))
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata can't be read
/// - `PermanentDeleteFailed` if the delete operation fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, ActionError> {
    let size = file_size(path)?;

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        ActionError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

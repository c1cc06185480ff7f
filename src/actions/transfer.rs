//! Copy and move of selected items.
//!
//! Every checked item is copied into a target directory. Existing files in
//! the target are never overwritten: a colliding name gets a ` (1)`, ` (2)`, ...
//! suffix before the extension. A move deletes the source only after its copy
//! succeeded.
//!
//! Transfers never touch the working collection; the items keep their paths
//! and flags.

use bytesize::ByteSize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::duplicates::DuplicateItem;
use crate::progress::BatchProgressCallback;

use super::delete::ActionError;

/// Whether the source survives a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Leave the source in place.
    Copy,
    /// Delete the source after a successful copy.
    Move,
}

impl TransferMode {
    /// Operation name for logs and progress.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Move => "move",
        }
    }
}

/// One completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    /// Original file.
    pub source: PathBuf,
    /// Where the copy was written.
    pub destination: PathBuf,
    /// Bytes copied.
    pub bytes: u64,
}

/// Results of a batch copy or move.
#[derive(Debug, Clone, Default)]
pub struct TransferReport {
    /// Completed transfers.
    pub successes: Vec<TransferResult>,
    /// Failed transfers with their errors.
    pub failures: Vec<(PathBuf, String)>,
    /// The batch stopped early on a shutdown request.
    pub interrupted: bool,
}

impl TransferReport {
    /// Check if every transfer succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total bytes written to the destination.
    #[must_use]
    pub fn bytes_transferred(&self) -> u64 {
        self.successes.iter().map(|t| t.bytes).sum()
    }

    /// Human-readable summary.
    #[must_use]
    pub fn summary(&self, mode: TransferMode) -> String {
        let verb = match mode {
            TransferMode::Copy => "Copied",
            TransferMode::Move => "Moved",
        };
        let mut text = format!(
            "{} {} file(s), {}",
            verb,
            self.successes.len(),
            ByteSize::b(self.bytes_transferred())
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

/// Names tried for `file_name`: the name itself, then `stem (1).ext`, `stem (2).ext`, ...
fn candidate_names(file_name: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = file_name
        .extension()
        .map(|s| s.to_string_lossy().into_owned());

    std::iter::once(file_name.to_path_buf()).chain((1u32..).map(move |counter| {
        PathBuf::from(match &extension {
            Some(ext) => format!("{} ({}).{}", stem, counter, ext),
            None => format!("{} ({})", stem, counter),
        })
    }))
}

/// First path in `dir` named `file_name` that does not exist yet.
///
/// `clip.mp4` becomes `clip (1).mp4`, `clip (2).mp4`, ... on collision. The
/// answer can be stale by the time it is used; [`create_unique_file`] claims
/// the name atomically.
#[must_use]
pub fn unique_destination(dir: &Path, file_name: &Path) -> PathBuf {
    candidate_names(file_name)
        .map(|name| dir.join(name))
        .find(|path| !path.exists())
        .unwrap_or_else(|| dir.join(file_name))
}

/// Create a new file in `dir` under the first free name derived from `file_name`.
///
/// The file is opened with `create_new`, so an existing file is never
/// truncated, even one created after the name was picked.
///
/// # Errors
///
/// Returns any I/O error other than `AlreadyExists`.
pub fn create_unique_file(dir: &Path, file_name: &Path) -> io::Result<(PathBuf, File)> {
    for name in candidate_names(file_name) {
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log::trace!("{} is taken, trying the next name", path.display());
            }
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no free destination name",
    ))
}

/// Copy `source` into a freshly created file, removing it again on failure.
fn copy_into_new_file(source: &Path, dir: &Path, file_name: &Path) -> io::Result<(PathBuf, u64)> {
    let mut reader = File::open(source)?;
    let (destination, mut writer) = create_unique_file(dir, file_name)?;

    let copied = io::copy(&mut reader, &mut writer).and_then(|bytes| {
        writer.flush()?;
        Ok(bytes)
    });
    match copied {
        Ok(bytes) => {
            if let Err(e) = reader
                .metadata()
                .and_then(|meta| fs::set_permissions(&destination, meta.permissions()))
            {
                log::debug!("Could not copy permissions to {}: {}", destination.display(), e);
            }
            Ok((destination, bytes))
        }
        Err(e) => {
            let _ = fs::remove_file(&destination);
            Err(e)
        }
    }
}

/// Make sure `dir` exists and is a directory.
///
/// # Errors
///
/// `DestinationNotDirectory` if a non-directory is in the way, `Io` if it
/// cannot be created.
pub fn prepare_destination(dir: &Path) -> Result<(), ActionError> {
    if dir.exists() {
        if dir.is_dir() {
            return Ok(());
        }
        return Err(ActionError::DestinationNotDirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(|e| ActionError::from_io(dir, e))?;
    log::debug!("Created destination directory {}", dir.display());
    Ok(())
}

/// Copy or move one file into `dir`.
///
/// # Errors
///
/// - `NotFound` if the source has no file name or doesn't exist
/// - `CopyFailed` if writing the copy fails
/// - `PermanentDeleteFailed` if a move could not remove the source (the copy is kept)
pub fn transfer_file(
    source: &Path,
    dir: &Path,
    mode: TransferMode,
) -> Result<TransferResult, ActionError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| ActionError::NotFound(source.to_path_buf()))?;
    if !source.is_file() {
        return Err(ActionError::NotFound(source.to_path_buf()));
    }

    let (destination, bytes) =
        copy_into_new_file(source, dir, Path::new(file_name)).map_err(|e| {
            ActionError::CopyFailed {
                path: source.to_path_buf(),
                destination: dir.join(file_name),
                message: e.to_string(),
            }
        })?;

    if mode == TransferMode::Move {
        fs::remove_file(source).map_err(|e| ActionError::PermanentDeleteFailed {
            path: source.to_path_buf(),
            message: format!("copied to {} but source not removed: {}", destination.display(), e),
        })?;
    }

    log::info!(
        "{} {} -> {}",
        if mode == TransferMode::Move { "Moved" } else { "Copied" },
        source.display(),
        destination.display()
    );

    Ok(TransferResult {
        source: source.to_path_buf(),
        destination,
        bytes,
    })
}

/// Copy or move every checked item into `dir`.
///
/// Failures are logged and recorded; the batch always continues. When
/// `shutdown` is set no further transfer is started.
///
/// # Errors
///
/// Returns an error only if the destination directory cannot be prepared.
pub fn transfer_selection(
    items: &[DuplicateItem],
    dir: &Path,
    mode: TransferMode,
    shutdown: Option<&AtomicBool>,
    callback: Option<&dyn BatchProgressCallback>,
) -> Result<TransferReport, ActionError> {
    prepare_destination(dir)?;

    let selected: Vec<&DuplicateItem> = items.iter().filter(|item| item.checked).collect();
    let mut report = TransferReport::default();

    if let Some(cb) = callback {
        cb.on_batch_start(mode.name(), selected.len());
    }

    for (index, item) in selected.into_iter().enumerate() {
        if shutdown.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
            log::info!("Stopping {} batch: shutdown requested", mode.name());
            report.interrupted = true;
            break;
        }
        if let Some(cb) = callback {
            cb.on_item(index, &item.path);
        }

        match transfer_file(&item.path, dir, mode) {
            Ok(result) => {
                if let Some(cb) = callback {
                    cb.on_item_success(&item.path, result.bytes);
                }
                report.successes.push(result);
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("Failed to {} {}: {}", mode.name(), item.path.display(), message);
                if let Some(cb) = callback {
                    cb.on_item_failure(&item.path, &message);
                }
                report.failures.push((item.path.clone(), message));
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_batch_end(mode.name());
    }
    log::info!("{}", report.summary(mode));

    Ok(report)
}

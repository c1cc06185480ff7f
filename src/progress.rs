//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`BatchProgressCallback`] seam used by the batch
//! file operations and [`Progress`], which implements it with a terminal
//! progress bar.
//!
//! # Plain Mode
//!
//! When plain mode is enabled (`--no-color`), the bar uses ASCII characters
//! and no colors.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for batch file operations (delete, copy, move).
pub trait BatchProgressCallback: Send + Sync {
    /// Called when a batch starts.
    ///
    /// # Arguments
    ///
    /// * `operation` - Name of the operation (e.g., "delete", "copy")
    /// * `total` - Number of items the batch will attempt
    fn on_batch_start(&self, operation: &str, total: usize);

    /// Called before each item is processed.
    ///
    /// # Arguments
    ///
    /// * `index` - Zero-based position in the batch
    /// * `path` - Path about to be processed
    fn on_item(&self, index: usize, path: &Path);

    /// Called after an item succeeded.
    fn on_item_success(&self, _path: &Path, _bytes: u64) {}

    /// Called after an item failed.
    fn on_item_failure(&self, _path: &Path, _error: &str) {}

    /// Called when the batch completes or stops early.
    fn on_batch_end(&self, operation: &str);
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
    plain: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupekeep::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self::with_plain(quiet, false)
    }

    /// Create a new progress reporter, optionally without colors or Unicode.
    #[must_use]
    pub fn with_plain(quiet: bool, plain: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
            plain,
        }
    }

    /// Check if plain mode is enabled.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.plain
    }

    fn style(&self) -> ProgressStyle {
        if self.plain {
            ProgressStyle::with_template("[{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-")
        } else {
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
        }
    }
}

impl BatchProgressCallback for Progress {
    fn on_batch_start(&self, operation: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(self.style());
        pb.set_message(operation.to_string());
        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_item(&self, index: usize, path: &Path) {
        if self.quiet {
            return;
        }

        if let Some(ref pb) = *self.bar.lock().unwrap_or_else(PoisonError::into_inner) {
            pb.set_position(index as u64);
            pb.set_message(truncate_path(&path.to_string_lossy(), 40));
        }
    }

    fn on_item_success(&self, _path: &Path, _bytes: u64) {
        if let Some(ref pb) = *self.bar.lock().unwrap_or_else(PoisonError::into_inner) {
            pb.inc(1);
        }
    }

    fn on_item_failure(&self, path: &Path, error: &str) {
        if let Some(ref pb) = *self.bar.lock().unwrap_or_else(PoisonError::into_inner) {
            pb.inc(1);
            pb.println(format!("failed: {}: {}", path.display(), error));
        }
    }

    fn on_batch_end(&self, operation: &str) {
        if let Some(pb) = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_with_message(format!("{} complete", operation));
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}

//! JSON output formatter for the working collection.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "group_id": "a1b2",
//!       "items": [
//!         {
//!           "path": "/media/clip.mp4",
//!           "size_bytes": 1048576,
//!           "frame_size": 2073600,
//!           "bitrate_kbps": 4500,
//!           "duration_ms": 61500,
//!           "fps": 29.97,
//!           "audio_sample_rate": 48000,
//!           "is_image": false,
//!           "checked": true,
//!           "best": { "size": true, "frame_size": true, "bitrate": false, "duration": true }
//!         }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "total_items": 2,
//!     "total_size": 2097152,
//!     "groups": 1,
//!     "degenerate_groups": 0,
//!     "checked_items": 1,
//!     "reclaimable_space": 1048576,
//!     "fully_checked_groups": 0
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{BestFlags, DuplicateItem, GroupStats};

use super::report_groups;

/// A single item in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonItem {
    /// Path as stored in the session
    pub path: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Frame size (0 for non-visual media)
    pub frame_size: u64,
    /// Bitrate in kbit/s
    pub bitrate_kbps: u32,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Frames per second
    pub fps: f32,
    /// Audio sample rate in Hz
    pub audio_sample_rate: u32,
    /// Whether the item is a still image
    pub is_image: bool,
    /// Marked for removal
    pub checked: bool,
    /// Best-attribute flags within the group
    pub best: BestFlags,
}

impl JsonItem {
    fn new(item: &DuplicateItem, best: BestFlags) -> Self {
        Self {
            path: item.path.to_string_lossy().into_owned(),
            size_bytes: item.size_bytes,
            frame_size: item.frame_size,
            bitrate_kbps: item.bitrate_kbps,
            duration_ms: u64::try_from(item.duration.as_millis()).unwrap_or(u64::MAX),
            fps: item.fps,
            audio_sample_rate: item.audio_sample_rate,
            is_image: item.is_image,
            checked: item.checked,
            best,
        }
    }
}

/// A duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// Shared group identifier
    pub group_id: String,
    /// Members in collection order
    pub items: Vec<JsonItem>,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Groups in order of first appearance
    pub groups: Vec<JsonGroup>,
    /// Collection statistics
    pub summary: GroupStats,
}

impl JsonOutput {
    /// Create a new JSON output from the collection.
    ///
    /// # Example
    ///
    /// ```
    /// use dupekeep::duplicates::DuplicateItem;
    /// use dupekeep::output::json::JsonOutput;
    ///
    /// let items = vec![
    ///     DuplicateItem::new("/a.mp4", "g"),
    ///     DuplicateItem::new("/b.mp4", "g"),
    /// ];
    /// let output = JsonOutput::new(&items);
    /// assert_eq!(output.groups.len(), 1);
    /// assert_eq!(output.summary.total_items, 2);
    /// ```
    #[must_use]
    pub fn new(items: &[DuplicateItem]) -> Self {
        let groups = report_groups(items)
            .into_iter()
            .map(|group| JsonGroup {
                group_id: group.group_id.to_string(),
                items: group
                    .entries
                    .into_iter()
                    .map(|(item, best)| JsonItem::new(item, best))
                    .collect(),
            })
            .collect();

        Self {
            groups,
            summary: GroupStats::compute(items),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}

//! CSV output formatter for the working collection.
//!
//! One row is generated for each item.
//!
//! # Columns
//!
//! - `group_id`: Group identifier from the scan stage
//! - `path`: Path to the file
//! - `size_bytes`, `frame_size`, `bitrate_kbps`, `duration_ms`, `fps`,
//!   `audio_sample_rate`: Item metrics
//! - `checked`: Marked for removal
//! - `best_size`, `best_frame`, `best_bitrate`, `best_duration`: Best-attribute
//!   flags within the group
//!
//! # Example
//!
//! ```
//! use dupekeep::duplicates::DuplicateItem;
//! use dupekeep::output::csv::CsvOutput;
//!
//! let items = vec![DuplicateItem::new("/a.mp4", "g"), DuplicateItem::new("/b.mp4", "g")];
//! let csv = CsvOutput::new(&items).to_string().unwrap();
//! assert!(csv.starts_with("group_id,path"));
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateItem;

use super::report_groups;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: &'a str,
    path: String,
    size_bytes: u64,
    frame_size: u64,
    bitrate_kbps: u32,
    duration_ms: u64,
    fps: f32,
    audio_sample_rate: u32,
    checked: bool,
    best_size: bool,
    best_frame: bool,
    best_bitrate: bool,
    best_duration: bool,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    items: &'a [DuplicateItem],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(items: &'a [DuplicateItem]) -> Self {
        Self { items }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for group in report_groups(self.items) {
            for (item, best) in group.entries {
                csv_writer.serialize(CsvRow {
                    group_id: group.group_id.as_str(),
                    path: item.path.to_string_lossy().into_owned(),
                    size_bytes: item.size_bytes,
                    frame_size: item.frame_size,
                    bitrate_kbps: item.bitrate_kbps,
                    duration_ms: u64::try_from(item.duration.as_millis()).unwrap_or(u64::MAX),
                    fps: item.fps,
                    audio_sample_rate: item.audio_sample_rate,
                    checked: item.checked,
                    best_size: best.size,
                    best_frame: best.frame_size,
                    best_bitrate: best.bitrate,
                    best_duration: best.duration,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

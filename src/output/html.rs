//! HTML output formatter for the working collection.
//!
//! Produces a self-contained report page using the `askama` template engine.
//! Paths are escaped by the template engine. Best attributes of each group
//! are highlighted and checked items are marked.

use std::io::Write;
use std::time::Duration;

use askama::Template;
use bytesize::ByteSize;
use chrono::Local;

use crate::duplicates::{DuplicateItem, GroupStats};

use super::report_groups;

/// Complete HTML output structure for the Askama template.
#[derive(Template)]
#[template(path = "report.html")]
pub struct HtmlOutput {
    /// Formatted generation timestamp
    pub timestamp: String,
    /// Application version
    pub version: String,
    /// Collection statistics
    pub stats: GroupStats,
    /// Human-readable total size
    pub total_size: String,
    /// Human-readable size of the checked items
    pub reclaimable_space: String,
    /// Groups formatted for HTML
    pub groups: Vec<HtmlGroup>,
}

/// A duplicate group formatted for HTML presentation.
pub struct HtmlGroup {
    /// Group identifier
    pub group_id: String,
    /// Members in collection order
    pub items: Vec<HtmlItem>,
}

/// An item formatted for HTML presentation.
pub struct HtmlItem {
    /// Path display string
    pub path_display: String,
    /// Human-readable file size
    pub size_formatted: String,
    /// Frame size, or a dash for non-visual media
    pub frame_formatted: String,
    /// Bitrate with unit
    pub bitrate_formatted: String,
    /// Duration as `h:mm:ss`
    pub duration_formatted: String,
    /// Frames per second
    pub fps_formatted: String,
    /// Audio sample rate with unit
    pub sample_rate_formatted: String,
    /// Marked for removal
    pub checked: bool,
    /// Still image
    pub is_image: bool,
    /// Largest file in the group
    pub best_size: bool,
    /// Largest frame in the group
    pub best_frame: bool,
    /// Highest bitrate in the group
    pub best_bitrate: bool,
    /// Longest duration in the group
    pub best_duration: bool,
}

impl HtmlOutput {
    /// Create a new HTML output from the collection.
    #[must_use]
    pub fn new(items: &[DuplicateItem]) -> Self {
        let stats = GroupStats::compute(items);
        let groups = report_groups(items)
            .into_iter()
            .map(|group| HtmlGroup {
                group_id: group.group_id.to_string(),
                items: group
                    .entries
                    .into_iter()
                    .map(|(item, best)| HtmlItem {
                        path_display: item.path.to_string_lossy().into_owned(),
                        size_formatted: ByteSize::b(item.size_bytes).to_string(),
                        frame_formatted: if item.frame_size == 0 {
                            "-".to_string()
                        } else {
                            item.frame_size.to_string()
                        },
                        bitrate_formatted: format!("{} kbps", item.bitrate_kbps),
                        duration_formatted: format_duration(item.duration),
                        fps_formatted: format!("{:.2}", item.fps),
                        sample_rate_formatted: format!("{} Hz", item.audio_sample_rate),
                        checked: item.checked,
                        is_image: item.is_image,
                        best_size: best.size,
                        best_frame: best.frame_size,
                        best_bitrate: best.bitrate,
                        best_duration: best.duration,
                    })
                    .collect(),
            })
            .collect();

        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            total_size: ByteSize::b(stats.total_size).to_string(),
            reclaimable_space: ByteSize::b(stats.reclaimable_space).to_string(),
            stats,
            groups,
        }
    }

    /// Generate the HTML string using the embedded template.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn to_html(&self) -> Result<String, askama::Error> {
        self.render()
    }

    /// Write HTML report to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), HtmlOutputError> {
        let html = self.to_html()?;
        writer.write_all(html.as_bytes())?;
        Ok(())
    }
}

/// Format a media duration as `h:mm:ss` (or `m:ss` under an hour).
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else {
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

/// Errors that can occur during HTML output generation.
#[derive(thiserror::Error, Debug)]
pub enum HtmlOutputError {
    /// Template rendering error
    #[error("HTML template error: {0}")]
    Template(#[from] askama::Error),

    /// I/O error during writing
    #[error("I/O error during HTML generation: {0}")]
    Io(#[from] std::io::Error),
}

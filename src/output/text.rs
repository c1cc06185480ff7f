//! Plain-text listing for the terminal.
//!
//! ```text
//! Group g1 (2 items)
//!   [ ] /media/a.mp4  1.0 MiB  4500 kbps  61s  29.97 fps  48000 Hz  best: size,frame,bitrate,duration
//!   [x] /media/b.mp4  980.0 KiB  3000 kbps  61s  29.97 fps  48000 Hz  best: frame,duration
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::{BestFlags, DuplicateItem, GroupStats};

use super::report_groups;

/// Terminal listing of the collection.
pub struct TextOutput<'a> {
    items: &'a [DuplicateItem],
    checked_only: bool,
}

impl<'a> TextOutput<'a> {
    /// List every item.
    #[must_use]
    pub fn new(items: &'a [DuplicateItem]) -> Self {
        Self {
            items,
            checked_only: false,
        }
    }

    /// Only list checked items; groups without one are skipped.
    #[must_use]
    pub fn checked_only(mut self, checked_only: bool) -> Self {
        self.checked_only = checked_only;
        self
    }

    /// Write the listing followed by a one-line summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in report_groups(self.items) {
            let shown: Vec<_> = group
                .entries
                .iter()
                .filter(|(item, _)| !self.checked_only || item.checked)
                .collect();
            if shown.is_empty() {
                continue;
            }

            writeln!(writer, "Group {} ({} items)", group.group_id, group.entries.len())?;
            for (item, best) in shown {
                writeln!(writer, "  {}", format_line(item, *best))?;
            }
        }

        let stats = GroupStats::compute(self.items);
        writeln!(
            writer,
            "{} items in {} groups, {} checked ({} reclaimable)",
            stats.total_items,
            stats.groups,
            stats.checked_items,
            ByteSize::b(stats.reclaimable_space)
        )
    }
}

fn format_line(item: &DuplicateItem, best: BestFlags) -> String {
    let mut line = format!(
        "[{}] {}  {}  {} kbps  {}s  {:.2} fps  {} Hz",
        if item.checked { "x" } else { " " },
        item.path.display(),
        ByteSize::b(item.size_bytes),
        item.bitrate_kbps,
        item.duration_secs(),
        item.fps,
        item.audio_sample_rate
    );

    let labels: Vec<&str> = [
        (best.size, "size"),
        (best.frame_size, "frame"),
        (best.bitrate, "bitrate"),
        (best.duration, "duration"),
    ]
    .into_iter()
    .filter_map(|(is_best, label)| is_best.then_some(label))
    .collect();
    if !labels.is_empty() {
        line.push_str("  best: ");
        line.push_str(&labels.join(","));
    }
    line
}

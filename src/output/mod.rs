//! Report formatters for the working collection.
//!
//! This module provides different output formats:
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//! - HTML for a standalone, shareable page
//! - Plain text for the `list` command
//!
//! Every format lists the items group by group, in order of first appearance,
//! with the removal flag and the best-attribute flags of each item.
//!
//! # Example
//!
//! ```
//! use dupekeep::duplicates::DuplicateItem;
//! use dupekeep::output::json::JsonOutput;
//!
//! let items = vec![
//!     DuplicateItem::new("/a.mp4", "g").with_size(10),
//!     DuplicateItem::new("/b.mp4", "g").with_size(20).with_checked(true),
//! ];
//!
//! let output = JsonOutput::new(&items);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

use std::collections::HashMap;

use crate::duplicates::{BestFlags, DuplicateItem, GroupId};

pub mod csv;
pub mod html;
pub mod json;
pub mod text;

// Re-export main types
pub use csv::CsvOutput;
pub use html::HtmlOutput;
pub use json::JsonOutput;
pub use text::TextOutput;

/// One group of a report.
#[derive(Debug)]
pub struct ReportGroup<'a> {
    /// Shared group identifier
    pub group_id: &'a GroupId,
    /// Members in collection order, with their best-attribute flags
    pub entries: Vec<(&'a DuplicateItem, BestFlags)>,
}

/// Arrange items into report groups, in order of first appearance.
#[must_use]
pub fn report_groups(items: &[DuplicateItem]) -> Vec<ReportGroup<'_>> {
    let mut positions: HashMap<&GroupId, usize> = HashMap::new();
    let mut groups: Vec<ReportGroup<'_>> = Vec::new();

    for item in items {
        let index = *positions.entry(&item.group_id).or_insert_with(|| {
            groups.push(ReportGroup {
                group_id: &item.group_id,
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index]
            .entries
            .push((item, BestFlags::resolve(item, items)));
    }

    groups
}

//! Command-line interface definitions for dupekeep.
//!
//! Every subcommand operates on a session file written by the scan stage.
//! Commands that change the selection or the membership write the session
//! back in place.
//!
//! # Example
//!
//! ```bash
//! # Mark exact copies, keeping the first of each group
//! dupekeep select session.json --policy identical
//!
//! # Mark everything under a backup folder
//! dupekeep select session.json --pattern '^/mnt/backup/'
//!
//! # Send the marked files to the trash
//! dupekeep delete session.json
//!
//! # Write an HTML report
//! dupekeep export session.json --format html --output report.html
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::SelectionPolicy;

/// Resolve near-duplicate media groups.
///
/// dupekeep marks which copies of each duplicate group to discard, then
/// deletes, moves or copies them while keeping every group consistent.
#[derive(Debug, Parser)]
#[command(name = "dupekeep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dupekeep.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the groups and the current selection
    List(ListArgs),
    /// Mark items for removal with a selection policy or a path pattern
    Select(SelectArgs),
    /// Unmark every item
    Clear(SessionArgs),
    /// Delete marked files from disk and drop them from the session
    Delete(DeleteArgs),
    /// Drop marked items from the session without touching disk
    Remove(SessionArgs),
    /// Copy marked files into a directory
    Copy(TransferArgs),
    /// Move marked files into a directory
    Move(TransferArgs),
    /// Write a report of the session
    Export(ExportArgs),
}

/// A session file argument.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session file produced by the scan stage
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,
}

/// Arguments for the list subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Session file produced by the scan stage
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Only print checked items
    #[arg(long)]
    pub checked_only: bool,
}

/// Arguments for the select subcommand.
#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Session file produced by the scan stage
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Selection policy (defaults to the configured policy)
    #[arg(long, value_enum, conflicts_with = "pattern")]
    pub policy: Option<PolicyArg>,

    /// Mark items whose path matches this regular expression
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Match the pattern case-sensitively
    #[arg(long, requires = "pattern")]
    pub case_sensitive: bool,

    /// Unmark matching items instead of marking them
    #[arg(long, requires = "pattern")]
    pub unselect: bool,
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Session file produced by the scan stage
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Use permanent deletion instead of moving to trash
    ///
    /// Warning: Files cannot be recovered after permanent deletion.
    #[arg(long)]
    pub permanent: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the copy and move subcommands.
#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Session file produced by the scan stage
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Target directory (created if missing)
    #[arg(value_name = "DIR")]
    pub destination: PathBuf,
}

/// Arguments for the export subcommand.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Session file produced by the scan stage
    #[arg(value_name = "SESSION")]
    pub session: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Named selection policies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyArg {
    /// Keep the first of each set of exact copies
    #[default]
    Identical,
    /// Keep the smallest of each set of copies that differ only in size
    IdenticalIgnoringSize,
    /// Keep the best-quality encoding of each set of same-size copies
    LowestQuality,
    /// Unmark everything
    Clear,
}

impl PolicyArg {
    /// The engine policy this name stands for.
    #[must_use]
    pub fn to_policy(self) -> SelectionPolicy {
        match self {
            Self::Identical => SelectionPolicy::IdenticalOnly,
            Self::IdenticalIgnoringSize => SelectionPolicy::IdenticalIgnoringSize,
            Self::LowestQuality => SelectionPolicy::LowestQuality,
            Self::Clear => SelectionPolicy::ClearAll,
        }
    }
}

/// Report formats for the export subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON for scripting
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Standalone HTML page
    Html,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Html => write!(f, "html"),
        }
    }
}

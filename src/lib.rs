//! dupekeep - Duplicate group resolution and selection
//!
//! Takes the duplicate groups produced by a scan stage, decides which copies
//! to keep with deterministic selection policies, and deletes, moves or
//! copies the rest while keeping every group consistent.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod session;
pub mod signal;

use std::fs::File;
use std::io::{self, BufRead, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::actions::{clear_selection, DeleteConfig, GroupMutator, TransferMode, TransferReport};
use crate::cli::{
    Cli, Commands, DeleteArgs, ExportArgs, ExportFormat, ListArgs, SelectArgs, SessionArgs,
    TransferArgs,
};
use crate::config::Config;
use crate::duplicates::{DuplicateList, PatternSelection, SelectionPolicy};
use crate::error::ExitCode;
use crate::output::{CsvOutput, HtmlOutput, JsonOutput, TextOutput};
use crate::progress::{BatchProgressCallback, Progress};
use crate::session::Session;
use crate::signal::ShutdownHandler;

/// Settings shared by every command handler.
struct AppContext {
    config: Config,
    shutdown: ShutdownHandler,
    progress: Progress,
    quiet: bool,
}

impl AppContext {
    fn progress(&self) -> Option<&dyn BatchProgressCallback> {
        Some(&self.progress as &dyn BatchProgressCallback)
    }

    fn report(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }
}

/// Run the application for parsed CLI arguments.
///
/// # Errors
///
/// Returns an error if the session or the configuration can't be read or
/// written, a pattern doesn't compile, or a report can't be produced.
/// Per-file failures of batch operations are not errors; they are reported
/// through the returned `ExitCode`.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);

    let config = match &cli.config {
        Some(path) => Config::load_from(Some(path))?,
        None => Config::load(),
    };
    log::debug!("Using configuration: {:?}", config);

    let shutdown = signal::install_handler()?;
    let ctx = AppContext {
        progress: Progress::with_plain(cli.quiet || !config.show_progress, cli.no_color),
        config,
        shutdown,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::List(args) => list(&args),
        Commands::Select(args) => select(&ctx, &args),
        Commands::Clear(args) => clear(&ctx, &args),
        Commands::Delete(args) => delete(&ctx, &args),
        Commands::Remove(args) => remove(&ctx, &args),
        Commands::Copy(args) => transfer(&ctx, &args, TransferMode::Copy),
        Commands::Move(args) => transfer(&ctx, &args, TransferMode::Move),
        Commands::Export(args) => export(&args),
    }
}

fn save_list(session: Session, list: DuplicateList, path: &Path) -> Result<()> {
    session.with_items(list.into_items()).save(path)
}

fn list(args: &ListArgs) -> Result<ExitCode> {
    let session = Session::load(&args.session)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    TextOutput::new(&session.items)
        .checked_only(args.checked_only)
        .write_to(&mut handle)
        .context("Failed to write listing")?;
    Ok(ExitCode::Success)
}

fn select(ctx: &AppContext, args: &SelectArgs) -> Result<ExitCode> {
    let policy = match &args.pattern {
        Some(pattern) => SelectionPolicy::PathPattern(PatternSelection::new(
            pattern,
            args.case_sensitive,
            !args.unselect,
        )?),
        None => args
            .policy
            .unwrap_or(ctx.config.default_policy)
            .to_policy(),
    };

    let mut session = Session::load(&args.session)?;
    let list = DuplicateList::new(std::mem::take(&mut session.items));
    let summary = list.apply_policy(&policy);
    let stats = list.stats();
    save_list(session, list, &args.session)?;

    ctx.report(&format!(
        "Policy {}: {} group(s) resolved, {} checked, {} unchecked; {} of {} item(s) now checked",
        policy.name(),
        summary.groups_resolved,
        summary.items_checked,
        summary.items_unchecked,
        stats.checked_items,
        stats.total_items
    ));
    Ok(ExitCode::Success)
}

fn clear(ctx: &AppContext, args: &SessionArgs) -> Result<ExitCode> {
    let mut session = Session::load(&args.session)?;
    let list = DuplicateList::new(std::mem::take(&mut session.items));
    let cleared = list.with_items_mut(|items| clear_selection(items));
    save_list(session, list, &args.session)?;

    ctx.report(&format!("Cleared {} selection(s)", cleared));
    Ok(ExitCode::Success)
}

/// Ask for confirmation on an interactive terminal.
fn confirm(prompt: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        anyhow::bail!("Refusing to continue without confirmation; pass --yes in non-interactive mode");
    }

    eprint!("{} [y/N] ", prompt);
    io::stderr().flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn delete(ctx: &AppContext, args: &DeleteArgs) -> Result<ExitCode> {
    let mut session = Session::load(&args.session)?;
    let selected = session.items.iter().filter(|item| item.checked).count();
    if selected == 0 {
        ctx.report("No items are checked; nothing to delete");
        return Ok(ExitCode::NothingSelected);
    }

    let delete_config = DeleteConfig {
        permanent: args.permanent || ctx.config.permanent,
    };
    if !args.yes && !ctx.config.skip_confirmation {
        let target = if delete_config.permanent {
            "permanently delete"
        } else {
            "move to trash"
        };
        if !confirm(&format!("About to {} {} file(s). Continue?", target, selected))? {
            ctx.report("Aborted");
            return Ok(ExitCode::Success);
        }
    }

    let mutator = GroupMutator::from_config(&delete_config).with_shutdown(ctx.shutdown.get_flag());
    let list = DuplicateList::new(std::mem::take(&mut session.items));
    let report = list.with_items_mut(|items| mutator.delete(items, true, ctx.progress()));
    save_list(session, list, &args.session)?;

    for (path, reason) in &report.failures {
        log::error!("Could not delete {}: {}", path.display(), reason);
    }
    ctx.report(&report.summary());
    Ok(ExitCode::for_batch(report.interrupted, report.has_failures()))
}

fn remove(ctx: &AppContext, args: &SessionArgs) -> Result<ExitCode> {
    let mut session = Session::load(&args.session)?;
    if !session.items.iter().any(|item| item.checked) {
        ctx.report("No items are checked; nothing to remove");
        return Ok(ExitCode::NothingSelected);
    }

    let mutator = GroupMutator::from_config(&DeleteConfig::default());
    let list = DuplicateList::new(std::mem::take(&mut session.items));
    let report = list.with_items_mut(|items| mutator.remove_from_list(items));
    save_list(session, list, &args.session)?;

    ctx.report(&report.summary());
    Ok(ExitCode::Success)
}

fn transfer(ctx: &AppContext, args: &TransferArgs, mode: TransferMode) -> Result<ExitCode> {
    let session = Session::load(&args.session)?;
    if !session.items.iter().any(|item| item.checked) {
        ctx.report(&format!("No items are checked; nothing to {}", mode.name()));
        return Ok(ExitCode::NothingSelected);
    }

    let mutator = GroupMutator::from_config(&DeleteConfig::default())
        .with_shutdown(ctx.shutdown.get_flag());
    let report: TransferReport = match mode {
        TransferMode::Copy => {
            mutator.copy_selection(&session.items, &args.destination, ctx.progress())
        }
        TransferMode::Move => {
            mutator.move_selection(&session.items, &args.destination, ctx.progress())
        }
    }
    .with_context(|| format!("Cannot {} into {}", mode.name(), args.destination.display()))?;

    for (path, reason) in &report.failures {
        log::error!("Could not {} {}: {}", mode.name(), path.display(), reason);
    }
    ctx.report(&report.summary(mode));
    Ok(ExitCode::for_batch(report.interrupted, !report.all_succeeded()))
}

fn export(args: &ExportArgs) -> Result<ExitCode> {
    let session = Session::load(&args.session)?;

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        ExportFormat::Json => JsonOutput::new(&session.items).write_to(&mut writer, true)?,
        ExportFormat::Csv => CsvOutput::new(&session.items).write_to(&mut writer)?,
        ExportFormat::Html => HtmlOutput::new(&session.items).write_to(&mut writer)?,
    }
    writer.flush().context("Failed to flush report")?;

    if let Some(path) = &args.output {
        log::info!("Wrote {} report to {}", args.format, path.display());
    }
    Ok(ExitCode::Success)
}

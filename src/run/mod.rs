//! Command execution.
//!
//! Every command owns one database connection for its whole duration and closes
//! it on every exit path. Configuration problems (bad page size, missing EAN
//! codes, unreadable EAN file) are reported before the connection is opened.

mod export;
mod inspect;
mod job;

use chrono::Local;
use log::warn;

use crate::config::{Command, DbSettings};
use crate::ean::collect_eans;
use crate::error_handling::ExportError;
use crate::export::ExportSummary;
use crate::storage::QueryExecutor;

pub use export::{export_with, run_export};
pub use inspect::{analyze_with, run_analyze, run_tables, TableAnalysis};
pub use job::{default_output_name, ExportJob};

/// What a command produced, for the binary to report.
#[derive(Debug)]
pub enum CommandOutcome {
    Tables(Vec<String>),
    Analysis(TableAnalysis),
    Export(ExportSummary),
}

/// Resolves the export job of an export command; `None` for the others.
///
/// # Errors
///
/// Returns a configuration error for an invalid page size or language list, or
/// when a `search` has no usable EAN code.
pub fn resolve_job(command: &Command) -> Result<Option<ExportJob>, ExportError> {
    let now = Local::now();
    let job = match command {
        Command::Tables | Command::Analyze { .. } => return Ok(None),
        Command::Export { with_ean, options } => ExportJob::full(*with_ean, options, now)?,
        Command::Sample { options } => ExportJob::sample(options, now)?,
        Command::Search { eans, options } => {
            let codes = collect_eans(&eans.values, eans.ean_file.as_deref())?;
            ExportJob::search(codes, eans.partial_match, options, now)?
        }
    };
    Ok(Some(job))
}

/// Runs `command` against the database described by `settings`.
pub async fn run_command(
    settings: &DbSettings,
    command: &Command,
) -> Result<CommandOutcome, ExportError> {
    if let Some(job) = resolve_job(command)? {
        return run_export(settings, &job).await.map(CommandOutcome::Export);
    }
    match command {
        Command::Analyze { table } => run_analyze(settings, table)
            .await
            .map(CommandOutcome::Analysis),
        _ => run_tables(settings).await.map(CommandOutcome::Tables),
    }
}

/// Closes the connection, logging instead of failing: the command's own result
/// is what the caller reports.
async fn close_quietly(executor: &mut dyn QueryExecutor) {
    if let Err(e) = executor.close().await {
        warn!("Error closing the {} connection: {e}", executor.backend());
    }
}

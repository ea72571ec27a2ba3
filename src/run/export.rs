//! One export invocation, from connection to closed file.

use log::info;

use crate::config::DbSettings;
use crate::error_handling::{ExportError, Stage};
use crate::export::{export, open_sink, ExportSummary, OutputSchema, RowMapper};
use crate::source::RowCursor;
use crate::storage::{connect, validate_requirements, QueryExecutor};

use super::close_quietly;
use super::job::ExportJob;

/// Connects, runs `job` and closes the connection on every exit path.
///
/// # Errors
///
/// The returned [`ExportError`] names the failing stage: `connect` when the
/// database is unreachable, `query` when the source schema does not match or a
/// statement is rejected, `fetch` when the connection drops mid-export and
/// `write` when the output file cannot be written.
pub async fn run_export(settings: &DbSettings, job: &ExportJob) -> Result<ExportSummary, ExportError> {
    info!("Connecting to {}", settings.target());
    let mut executor =
        connect(settings).await.map_err(|e| ExportError::source_at(Stage::Connect, 0, e))?;

    let result = export_with(executor.as_mut(), job).await;

    close_quietly(executor.as_mut()).await;
    result
}

/// Runs `job` over an already open connection. The connection is left open.
pub async fn export_with(
    executor: &mut dyn QueryExecutor,
    job: &ExportJob,
) -> Result<ExportSummary, ExportError> {
    validate_requirements(&mut *executor, &job.spec.requirements())
        .await
        .map_err(|e| ExportError::source_at(Stage::Query, 0, e))?;

    let schema = OutputSchema::for_layout(job.spec.layout);
    let mapper = RowMapper::new(&schema, &job.options.languages);

    let mut cursor = RowCursor::open(&mut *executor, job.spec.clone())
        .await
        .map_err(|e| ExportError::fetch(0, e))?;

    let mut sink = open_sink(&job.options.output, job.options.format, job.options.field_codes)?;
    info!(
        "Writing {} columns to {}",
        schema.len(),
        job.options.output.display()
    );

    let summary = export(&mut cursor, &mapper, sink.as_mut(), job.requested_eans()).await?;
    info!("{} page queries issued", cursor.page_calls());
    Ok(summary)
}

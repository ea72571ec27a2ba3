//! The export pipeline: pull a page, flatten it, write it, repeat.

use std::collections::HashSet;

use log::{info, warn};

use crate::error_handling::ExportError;
use crate::models::SqlValue;
use crate::source::PageSource;

use super::progress::ExportProgress;
use super::row::RowMapper;
use super::sink::RowSink;
use super::types::{ExportSummary, RequestedEans};

/// Streams every page of `source` through `mapper` into `sink`.
///
/// Each fetch completes before its batch is written and each write completes
/// before the next fetch, so memory is bounded by one page. On failure the sink
/// is aborted (its file stays well-formed up to the last committed page) and
/// the error carries the number of rows written.
///
/// When `requested_eans` is given, the codes that matched no row are reported in
/// [`ExportSummary::unmatched_eans`].
pub async fn export(
    source: &mut dyn PageSource,
    mapper: &RowMapper<'_>,
    sink: &mut dyn RowSink,
    requested_eans: Option<RequestedEans<'_>>,
) -> Result<ExportSummary, ExportError> {
    let mut progress = ExportProgress::start(source.expected_rows());
    let mut seen_eans: HashSet<String> = HashSet::new();

    sink.begin(mapper.schema())?;

    loop {
        let page = match source.next_page().await {
            Ok(page) => page,
            Err(e) => {
                sink.abort();
                return Err(ExportError::fetch(sink.rows_written(), e));
            }
        };
        if page.is_empty() {
            break;
        }

        if requested_eans.is_some() {
            seen_eans.extend(
                page.iter()
                    .filter_map(|record| record.get("ean"))
                    .map(|ean| ean.render().trim().to_string()),
            );
        }

        let rows: Vec<Vec<SqlValue>> = page.iter().map(|record| mapper.flatten(record)).collect();
        if let Err(e) = sink.write_batch(&rows) {
            sink.abort();
            return Err(e.into());
        }

        progress.record_page(page.len() as u64, rows.len() as u64);
        progress.log();
    }

    let file_size = sink.finish()?;

    let unmatched_eans = requested_eans
        .map(|requested| requested.unmatched(&seen_eans))
        .unwrap_or_default();
    if !unmatched_eans.is_empty() {
        warn!(
            "{} EAN code(s) matched no exported product: {}",
            unmatched_eans.len(),
            unmatched_eans.join(", ")
        );
    }

    let summary = ExportSummary {
        rows_written: sink.rows_written(),
        pages: progress.pages,
        elapsed: progress.elapsed(),
        output_path: sink.path().to_path_buf(),
        file_size,
        unmatched_eans,
    };
    info!(
        "Export finished: {} rows in {} pages, {:.1}s, {}",
        summary.rows_written,
        summary.pages,
        summary.elapsed.as_secs_f64(),
        summary.output_path.display()
    );
    Ok(summary)
}

//! Export functionality for product rows.
//!
//! This module flattens product records against a fixed output schema and
//! writes them incrementally to CSV, JSON or JSONL files.

mod csv;
mod jsonl;
mod pipeline;
mod progress;
mod row;
mod schema;
mod sink;
mod text;
mod types;

use std::path::Path;

use crate::error_handling::WriteError;

pub use self::csv::CsvSink;
pub use jsonl::{JsonFraming, JsonSink};
pub use pipeline::export;
pub use progress::ExportProgress;
pub use row::RowMapper;
pub use schema::{ColumnDef, ColumnSource, Derivation, OutputSchema, STANDARD_COLUMNS};
pub use sink::{OutputTarget, RowSink};
pub use text::{clean_html, extract_capacity, normalize_ingredients};
pub use types::{ExportFormat, ExportOptions, ExportSummary, Layout, RequestedEans};

/// Creates the output file and the sink for `format`.
pub fn open_sink(
    path: &Path,
    format: ExportFormat,
    field_codes: bool,
) -> Result<Box<dyn RowSink>, WriteError> {
    Ok(match format {
        ExportFormat::Csv => Box::new(CsvSink::create(path, field_codes)?),
        ExportFormat::Json => Box::new(JsonSink::create(path, JsonFraming::Array)?),
        ExportFormat::Jsonl => Box::new(JsonSink::create(path, JsonFraming::Lines)?),
    })
}

//! Export types and options.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use crate::config::{parse_languages, DEFAULT_LANGUAGES};

/// Export format options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-delimited, double-quote quoting, UTF-8, header row
    Csv,
    /// One JSON array of objects
    Json,
    /// One JSON object per line
    Jsonl,
}

impl ExportFormat {
    /// File extension of the default output name.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Jsonl => "jsonl",
        }
    }
}

/// Output column layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// The 26 product-table columns
    Standard,
    /// The 37-column marketplace template with images and technical specifications
    Comprehensive,
}

/// Options for flattening and writing rows.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Output file path
    pub output: PathBuf,
    /// Output format
    pub format: ExportFormat,
    /// Technical-specification language priority, most preferred first
    pub languages: Vec<String>,
    /// Write the technical column keys as a second CSV header row
    pub field_codes: bool,
}

impl ExportOptions {
    pub fn new(output: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            output: output.into(),
            format,
            languages: parse_languages(DEFAULT_LANGUAGES),
            field_codes: false,
        }
    }
}

/// EAN codes an export was filtered on, for the unmatched-code report.
#[derive(Clone, Copy, Debug)]
pub struct RequestedEans<'a> {
    pub codes: &'a [String],
    /// A code also counts as matched when an exported EAN contains it.
    pub partial: bool,
}

impl RequestedEans<'_> {
    /// Codes, in request order, that no exported EAN accounts for.
    pub fn unmatched(&self, exported: &HashSet<String>) -> Vec<String> {
        self.codes
            .iter()
            .filter(|code| {
                !exported.contains(code.as_str())
                    && !(self.partial && exported.iter().any(|ean| ean.contains(code.as_str())))
            })
            .cloned()
            .collect()
    }
}

/// Outcome of a completed export.
#[derive(Clone, Debug, Serialize)]
pub struct ExportSummary {
    pub rows_written: u64,
    pub pages: u64,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub output_path: PathBuf,
    /// Size of the output file in bytes
    pub file_size: u64,
    /// Requested EAN codes that matched no product (EAN searches only)
    pub unmatched_eans: Vec<String>,
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

impl ExportSummary {
    /// File size in mebibytes, for display.
    pub fn file_size_mb(&self) -> f64 {
        self.file_size as f64 / 1024.0 / 1024.0
    }
}

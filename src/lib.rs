//! product_export library: catalogue inspection and product export
//!
//! This library reads the active products of a catalogue database (MySQL, or a
//! local SQLite snapshot of the same tables) page by page and writes them to
//! CSV, JSON or JSONL, in either the 26-column product layout or the 37-column
//! marketplace layout with gallery images and technical specifications.
//!
//! # Example
//!
//! ```no_run
//! use product_export::config::{parse_languages, DbSettings};
//! use product_export::export::{ExportFormat, ExportOptions, Layout};
//! use product_export::query::{ProductFilter, QuerySpec};
//! use product_export::{run_export, ExportJob};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = DbSettings::from_env()?;
//! let spec = QuerySpec::new(Layout::Standard, ProductFilter::WithEan).with_page_size(10_000);
//! let mut options = ExportOptions::new("products.csv", ExportFormat::Csv);
//! options.languages = parse_languages("fr,en");
//!
//! let summary = run_export(&settings, &ExportJob { spec, options }).await?;
//! println!("{} rows written to {}", summary.rows_written, summary.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. The pipeline is sequential, so a
//! current-thread runtime is enough.

pub mod config;
pub mod ean;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod models;
pub mod query;
mod run;
pub mod source;
pub mod storage;

// Re-export public API
pub use config::{Cli, Command, DbSettings, LogFormat, LogLevel};
pub use error_handling::{ExportError, Stage};
pub use export::ExportSummary;
pub use run::{
    analyze_with, default_output_name, export_with, resolve_job, run_analyze, run_command,
    run_export, run_tables, CommandOutcome, ExportJob, TableAnalysis,
};

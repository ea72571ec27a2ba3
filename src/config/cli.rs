//! Command-line interface.
//!
//! ```bash
//! # List the tables of the catalogue database
//! product_export tables
//!
//! # Export every active product in the 37-column layout
//! product_export export --layout comprehensive
//!
//! # Export 10,000 products as newline-delimited JSON
//! product_export sample --format jsonl
//!
//! # Search by EAN (literal list or file)
//! product_export search --ean 3664436019363,3014151002667
//! product_export search --ean-file eans.txt --layout comprehensive
//!
//! # Fall back to a substring match for codes without an exact match
//! product_export search --ean 4436019 --partial-match
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{DEFAULT_LANGUAGES, DEFAULT_MEDIA_BASE_URL, PRODUCTS_TABLE};
use crate::config::types::{LogFormat, LogLevel};
use crate::export::{ExportFormat, Layout};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "product_export",
    version,
    about = "Lists catalogue tables and exports product rows to CSV or JSON."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every table of the source database
    Tables,

    /// Describe a table: columns, product counts and sample rows
    Analyze {
        /// Table to describe
        #[arg(long, default_value = PRODUCTS_TABLE)]
        table: String,
    },

    /// Export all active products
    Export {
        /// Only products with a non-empty EAN
        #[arg(long)]
        with_ean: bool,

        #[command(flatten)]
        options: ExportArgs,
    },

    /// Export a sample of active products (10,000 unless --limit is given)
    Sample {
        #[command(flatten)]
        options: ExportArgs,
    },

    /// Export the products matching a list of EAN codes (active ones only in
    /// the comprehensive layout)
    Search {
        #[command(flatten)]
        eans: EanArgs,

        #[command(flatten)]
        options: ExportArgs,
    },
}

/// Options shared by the export commands.
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Column layout: standard (26 columns) or comprehensive (37 columns)
    #[arg(long, value_enum, default_value_t = Layout::Standard)]
    pub layout: Layout,

    /// Output format: csv|json|jsonl
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Output file (defaults to a timestamped name in the current directory)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Maximum number of products to export
    #[arg(long)]
    pub limit: Option<u64>,

    /// Rows fetched per page (defaults depend on the command)
    #[arg(long, env = "EXPORT_PAGE_SIZE")]
    pub page_size: Option<u64>,

    /// Technical-specification language priority, comma-separated
    #[arg(long, env = "EXPORT_LANGUAGES", default_value = DEFAULT_LANGUAGES)]
    pub languages: String,

    /// Base URL gallery image files are served from
    #[arg(long, env = "MEDIA_BASE_URL", default_value = DEFAULT_MEDIA_BASE_URL)]
    pub media_base_url: String,

    /// Write a second CSV header row with the technical field codes
    #[arg(long)]
    pub field_codes: bool,
}

/// EAN sources for the `search` command.
#[derive(Debug, Clone, Args)]
pub struct EanArgs {
    /// EAN code(s); repeat the flag or separate values with commas
    #[arg(long = "ean", value_delimiter = ',')]
    pub values: Vec<String>,

    /// File with one EAN code per line
    #[arg(long)]
    pub ean_file: Option<PathBuf>,

    /// Codes without an exact match also match any EAN containing them
    #[arg(long)]
    pub partial_match: bool,
}

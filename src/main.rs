//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `product_export` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting and exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use product_export::initialization::init_logger_with;
use product_export::{run_command, Cli, CommandOutcome, DbSettings, ExportError, LogFormat};

fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows keeping DB_HOST, DB_USER, DB_PASSWORD and DB_NAME in .env
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        // If .env not found in current dir, try next to the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    let log_level = cli.log_level.clone();
    let log_format = cli.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // The pipeline is strictly sequential: one connection, one page in flight.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let result = DbSettings::from_env()
        .map_err(ExportError::from)
        .and_then(|settings| runtime.block_on(run_command(&settings, &cli.command)));

    match result {
        Ok(outcome) => {
            report(&outcome, matches!(cli.log_format, LogFormat::Json))
        }
        Err(e) => {
            eprintln!("product_export error [{}]: {:#}", e.stage(), e);
            if e.rows_written() > 0 {
                eprintln!(
                    "{} rows were written before the failure; the output file is well-formed up to them",
                    e.rows_written()
                );
            }
            process::exit(e.exit_code());
        }
    }
}

fn report(outcome: &CommandOutcome, json: bool) -> Result<()> {
    if let (true, CommandOutcome::Export(summary)) = (json, outcome) {
        // One machine-readable line, next to the JSON log records
        let line = serde_json::to_string(summary).context("Failed to serialize the summary")?;
        println!("{line}");
        return Ok(());
    }
    match outcome {
        CommandOutcome::Tables(tables) => {
            println!("Database tables ({} total):", tables.len());
            for (i, table) in tables.iter().enumerate() {
                println!("{:3}. {}", i + 1, table);
            }
        }
        CommandOutcome::Analysis(analysis) => print!("{analysis}"),
        CommandOutcome::Export(summary) => {
            println!(
                "✅ Exported {} product{} in {:.1}s",
                summary.rows_written,
                if summary.rows_written == 1 { "" } else { "s" },
                summary.elapsed.as_secs_f64()
            );
            println!(
                "Results saved in {} ({:.2} MB)",
                summary.output_path.display(),
                summary.file_size_mb()
            );
            if !summary.unmatched_eans.is_empty() {
                println!(
                    "{} EAN code(s) not found: {}",
                    summary.unmatched_eans.len(),
                    summary.unmatched_eans.join(", ")
                );
            }
        }
    }
    Ok(())
}

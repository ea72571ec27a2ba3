//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (page sizes, schema names, defaults)
//! - Database settings read from the environment
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command, EanArgs, ExportArgs};
pub use constants::*;
pub use types::{parse_languages, DbSettings, LogFormat, LogLevel};

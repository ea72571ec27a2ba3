//! Error handling.
//!
//! This module provides the error taxonomy of the export pipeline:
//! - **Config**: bad or missing settings, reported before any connection attempt
//! - **Source**: connection failures, rejected queries, schema mismatches
//! - **Write**: sink failures, carrying the number of rows already written
//!
//! [`ExportError`] wraps all of them with the failing [`Stage`].

mod types;

// Re-export public API
pub use types::{
    ConfigError, ExportError, InitializationError, SourceError, Stage, WriteError,
};

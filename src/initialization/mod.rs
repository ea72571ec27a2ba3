//! Application initialization.
//!
//! Logging is the only process-wide resource: the database connection is opened
//! per invocation and owned by the caller.

mod logger;

pub use logger::init_logger_with;

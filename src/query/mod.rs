//! SQL construction.
//!
//! Everything in this module is pure: queries are built as text plus bound
//! parameters and handed to a [`crate::storage::QueryExecutor`].

mod builder;
mod inspect;
mod lookup;
mod spec;

pub use builder::{quote_identifier, BuiltQuery, SqlBuilder, SqlParam};
pub use inspect::{ean_count_query, sample_rows_query, table_count_query};
pub use lookup::{gallery_queries, specs_queries};
pub use spec::{ProductFilter, QuerySpec, TableRequirement};

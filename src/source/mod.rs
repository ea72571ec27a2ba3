//! Row source: paginated, lazily fetched product records.

mod cursor;
mod enrich;

pub use cursor::{PageSource, RowCursor};

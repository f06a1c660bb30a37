#![allow(clippy::needless_return)]

pub mod annotator;
pub mod error;
pub mod row_validator;
mod sheet_validator;
pub mod table;
pub mod utils;
pub mod xlsx_writer;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use annotator::{AnnotatedRow, AnnotatedTable, CellDecoration, render};
pub use error::AnnotatorError;
pub use row_validator::{Field, RowFields, ValidationError, validate};
pub use sheet_validator::{SheetValidator, SheetValidatorBuilder, ValidationReport};
pub use table::{CellLocation, Table, read_table, read_table_from_bytes};

// Re-exported so the binary shares the library's versions
pub use anyhow;

pub const ERRORS_LOG_FILE: &str = "errors.log";

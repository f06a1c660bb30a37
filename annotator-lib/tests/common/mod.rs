use annotator_lib::{AnnotatedTable, Table, render};
use calamine::Data;

// Re-export shared test utilities from src/test_utils.rs
pub use annotator_lib::test_utils::{
    create_header_row, create_invalid_row, create_table, create_test_workbook_bytes,
    create_test_workbook_file, create_valid_row, text,
};

/// Render a table made of the standard header plus `data_rows`
#[allow(dead_code)]
pub fn render_rows(data_rows: Vec<Vec<Data>>) -> AnnotatedTable {
    render(&create_table(data_rows)).unwrap()
}

/// Build a data row from five cells
#[allow(dead_code)]
pub fn create_row(id: Data, name: &str, email: &str, mobile: &str, date: &str) -> Vec<Data> {
    vec![id, text(name), text(email), text(mobile), text(date)]
}

/// Table with a header only
#[allow(dead_code)]
pub fn create_header_only_table() -> Table {
    Table::new(vec![create_header_row()])
}

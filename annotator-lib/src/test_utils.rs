// Test utilities available to both unit and integration tests
// Only compiled when testing

use calamine::Data;
use rust_xlsxwriter::Workbook;
use std::path::Path;

use crate::row_validator::Field;
use crate::table::Table;

pub fn text(value: &str) -> Data {
    Data::String(value.to_string())
}

/// Header row with the five field titles
pub fn create_header_row() -> Vec<Data> {
    Field::ALL.iter().map(|field| text(field.title())).collect()
}

/// A row that passes every rule. Numbers come back from xlsx files as floats.
pub fn create_valid_row(id: u32) -> Vec<Data> {
    vec![
        Data::Float(id as f64),
        text("Jane Doe"),
        text("jane@x.com"),
        text("1234567890"),
        text("01/15/2023"),
    ]
}

/// A row where every field is wrong, the ID by absence, the rest by format
pub fn create_invalid_row() -> Vec<Data> {
    vec![
        text(""),
        text("J0hn"),
        text("bad-email"),
        text("12a"),
        text("not-a-date"),
    ]
}

/// Header followed by `data_rows`
pub fn create_table(data_rows: Vec<Vec<Data>>) -> Table {
    let mut rows = vec![create_header_row()];
    rows.extend(data_rows);
    Table::new(rows)
}

/// Write `rows` (header included) into the first sheet of a new xlsx buffer
#[allow(dead_code)]
pub fn create_test_workbook_bytes(sheet_name: &str, rows: &[Vec<Data>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).unwrap();

    for (row_index, row) in rows.iter().enumerate() {
        for (col_index, cell) in row.iter().enumerate() {
            let (r, c) = (row_index as u32, col_index as u16);
            match cell {
                Data::String(s) => {
                    worksheet.write_string(r, c, s).unwrap();
                }
                Data::Float(f) => {
                    worksheet.write_number(r, c, *f).unwrap();
                }
                Data::Int(i) => {
                    worksheet.write_number(r, c, *i as f64).unwrap();
                }
                Data::Bool(b) => {
                    worksheet.write_boolean(r, c, *b).unwrap();
                }
                _ => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Same as [`create_test_workbook_bytes`], saved to `path`
#[allow(dead_code)]
pub fn create_test_workbook_file(path: &Path, sheet_name: &str, rows: &[Vec<Data>]) {
    std::fs::write(path, create_test_workbook_bytes(sheet_name, rows)).unwrap();
}

//! Common test utilities for the sheet-annotator binary tests

use annotator_lib::test_utils::{create_header_row, create_invalid_row, create_test_workbook_file, create_valid_row};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Write a workbook with one valid and one invalid data row
#[allow(dead_code)]
pub fn create_input_workbook(dir: &Path) -> PathBuf {
    let input = dir.join("employees.xlsx");
    create_test_workbook_file(
        &input,
        "Employees",
        &[create_header_row(), create_valid_row(1), create_invalid_row()],
    );
    input
}

/// Write a workbook where every data row is valid
#[allow(dead_code)]
pub fn create_valid_input_workbook(dir: &Path) -> PathBuf {
    let input = dir.join("valid.xlsx");
    create_test_workbook_file(
        &input,
        "Sheet1",
        &[create_header_row(), create_valid_row(1), create_valid_row(2)],
    );
    input
}

/// Run the binary from `dir` with the given arguments
#[allow(dead_code)]
pub fn run_sheet_annotator(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sheet-annotator"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

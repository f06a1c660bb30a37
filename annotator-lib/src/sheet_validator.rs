use anyhow::Result;
use calamine::Data;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

use crate::ERRORS_LOG_FILE;
use crate::annotator::{AnnotatedTable, render};
use crate::row_validator::{Field, ValidationError};
use crate::table::{Table, read_table};
use crate::utils::{excel_datetime_to_naive, write_error_to_log_file};

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub row_number: usize,
    pub errors: Vec<ValidationError>,
    pub row_data: Value,
}

/// One line of the errors CSV export
#[derive(Debug, Serialize)]
struct ErrorRecord<'a> {
    cell: String,
    row: usize,
    column: String,
    field: &'a str,
    message: &'a str,
}

pub struct SheetValidator {
    input_path: PathBuf,
    sheet_name: Option<String>,
    errors_log_path: PathBuf,
    table: Table,
    pub validation_reports: Vec<ValidationReport>,
}

pub struct SheetValidatorBuilder {
    input_path: PathBuf,
    sheet_name: Option<String>,
    errors_log_path: PathBuf,
}

impl SheetValidatorBuilder {
    /// Create a new SheetValidatorBuilder
    ///
    /// # Arguments
    /// * `input_path` - Path to the workbook to validate
    pub fn new(input_path: impl AsRef<Path>) -> Self {
        SheetValidatorBuilder {
            input_path: input_path.as_ref().to_path_buf(),
            sheet_name: None,
            errors_log_path: PathBuf::from(ERRORS_LOG_FILE),
        }
    }

    /// Worksheet to read, the first one when not set
    pub fn sheet_name(mut self, sheet_name: Option<&str>) -> Self {
        self.sheet_name = sheet_name.map(str::to_string);
        self
    }

    pub fn errors_log_path(mut self, errors_log_path: impl AsRef<Path>) -> Self {
        self.errors_log_path = errors_log_path.as_ref().to_path_buf();
        self
    }

    /// Build the SheetValidator, reading the worksheet once.
    ///
    /// Structural problems (unreadable file, unknown sheet, missing header) are
    /// written to the errors log and returned as errors.
    pub fn build(self) -> Result<SheetValidator> {
        let table = read_table(&self.input_path, self.sheet_name.as_deref()).and_then(|table| {
            table.header()?;
            Ok(table)
        });

        let table = match table {
            Ok(table) => table,
            Err(e) => {
                let message = format!(
                    "Could not read '{}' (sheet: {}): {}",
                    self.input_path.display(),
                    self.sheet_name.as_deref().unwrap_or("<first sheet>"),
                    e
                );
                write_error_to_log_file(&self.errors_log_path, "Workbook Structure Error", &message);
                return Err(anyhow::anyhow!(message));
            }
        };

        Ok(SheetValidator {
            input_path: self.input_path,
            sheet_name: self.sheet_name,
            errors_log_path: self.errors_log_path,
            table,
            validation_reports: Vec::new(),
        })
    }
}

impl SheetValidator {
    //////////////////////////////////////////////////////////////
    ///  Public API
    //////////////////////////////////////////////////////////////

    /// Create a validator over an in-memory table (for testing only)
    #[cfg(any(test, feature = "test"))]
    pub fn new_for_testing(table: Table, errors_log_path: impl AsRef<Path>) -> Self {
        SheetValidator {
            input_path: PathBuf::new(),
            sheet_name: None,
            errors_log_path: errors_log_path.as_ref().to_path_buf(),
            table,
            validation_reports: Vec::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    /// Validate every row and build the annotated output table.
    ///
    /// Reports of the rows with errors are kept in `validation_reports` and
    /// appended to the errors log.
    pub fn validate_and_annotate(&mut self) -> Result<AnnotatedTable> {
        let annotated = render(&self.table)?;

        self.validation_reports = annotated
            .error_rows()
            .map(|row| ValidationReport {
                row_number: row.row_number,
                errors: row.errors.clone(),
                row_data: Self::row_to_json(&row.values),
            })
            .collect();

        if !self.validation_reports.is_empty() {
            let validation_report = self.format_validation_report();
            write_error_to_log_file(
                &self.errors_log_path,
                "Sheet Validation Error Report",
                &validation_report,
            );
        }

        Ok(annotated)
    }

    /// Export every validation error as one CSV record
    pub fn export_errors_csv(&self, csv_path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_path(csv_path)?;

        for error in self.validation_reports.iter().flat_map(|r| r.errors.iter()) {
            let field = Field::ALL
                .iter()
                .find(|field| field.column() == error.location.column)
                .map_or("", |field| field.title());

            wtr.serialize(ErrorRecord {
                cell: error.location.to_string(),
                row: error.location.row,
                column: error.location.column_letter(),
                field,
                message: &error.message,
            })?;
        }

        wtr.flush()?;

        Ok(())
    }

    pub fn error_count(&self) -> usize {
        self.validation_reports.iter().map(|r| r.errors.len()).sum()
    }

    //////////////////////////////////////////////////////////////
    ///  Private methods
    //////////////////////////////////////////////////////////////
    /// Format validation reports into a structured string for logging
    fn format_validation_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=============================\n");

        let now = chrono::Utc::now().to_rfc3339();
        report.push_str(&format!("Generated at: {}\n\n", now));

        report.push_str(&format!(
            "Total rows with errors: {}\n\n",
            self.validation_reports.len()
        ));

        for validation_report in &self.validation_reports {
            report.push_str(&format!(
                "Row {}: {} error(s)\n",
                validation_report.row_number,
                validation_report.errors.len()
            ));

            match serde_json::to_string_pretty(&validation_report.row_data) {
                Ok(json_data) => {
                    report.push_str(&format!("Row data: {}\n", json_data));
                }
                Err(_) => {
                    report.push_str("Row data: [Error serializing data]\n");
                }
            }

            report.push_str("Errors:\n");
            for error in &validation_report.errors {
                report.push_str(&format!("  - {}\n", error));
            }
            report.push('\n');
        }

        report
    }

    /// Row values keyed by field title
    fn row_to_json(values: &[Data]) -> Value {
        let mut json_obj = Map::new();
        for field in Field::ALL {
            let cell = values.get(field.column() - 1).unwrap_or(&Data::Empty);
            json_obj.insert(field.title().to_string(), Self::cell_to_json(cell));
        }
        Value::Object(json_obj)
    }

    fn cell_to_json(cell: &Data) -> Value {
        match cell {
            Data::Empty => Value::Null,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                Value::String(s.clone())
            }
            Data::Float(f) => {
                if f.is_nan() || f.is_infinite() {
                    Value::Null
                } else {
                    json!(*f)
                }
            }
            Data::Int(i) => json!(*i),
            Data::Bool(b) => Value::Bool(*b),
            // durations stay as their serial value
            Data::DateTime(dt) => excel_datetime_to_naive(dt)
                .map_or_else(|| json!(dt.as_f64()), |dt| Value::String(dt.to_string())),
            Data::Error(e) => Value::String(e.to_string()),
        }
    }
}

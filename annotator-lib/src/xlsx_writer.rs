//! Serialize an [`AnnotatedTable`] into an xlsx workbook.
//!
//! Values keep their type (numbers, booleans, dates). Dates from a 1904 date
//! system workbook are re-encoded so they show the same day. Header cells get
//! a thin border, invalid cells a solid red background and a note with the
//! messages.

use calamine::Data;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Note, Workbook, Worksheet};
use std::path::Path;

use crate::annotator::{AnnotatedTable, CellDecoration};
use crate::error::AnnotatorError;
use crate::utils::excel_datetime_to_naive;

pub const OUTPUT_SHEET_NAME: &str = "Validated Data";

/// ARGB `FFFF0000`; rust_xlsxwriter takes the RGB part only
pub const ERROR_FILL_COLOR: u32 = 0xFF0000;

const DATE_NUM_FORMAT: &str = "mm/dd/yyyy";
const DATETIME_NUM_FORMAT: &str = "mm/dd/yyyy hh:mm:ss";
const DURATION_NUM_FORMAT: &str = "[h]:mm:ss";

pub fn build_workbook(annotated: &AnnotatedTable) -> Result<Workbook, AnnotatorError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(OUTPUT_SHEET_NAME)?;

    for row in annotated.rows() {
        // rust_xlsxwriter uses 0-based row/col as u32/u16
        let row_index = (row.row_number - 1) as u32;
        let width = row.values.len().max(
            row.decorations
                .keys()
                .next_back()
                .copied()
                .unwrap_or_default(),
        );

        for column in 1..=width {
            let value = row.values.get(column - 1).unwrap_or(&Data::Empty);
            let decoration = row.decoration(column);
            write_cell(worksheet, row_index, (column - 1) as u16, value, decoration)?;
        }
    }

    Ok(workbook)
}

/// Serialize the whole workbook in memory, e.g. to send it back as a download
pub fn to_buffer(annotated: &AnnotatedTable) -> Result<Vec<u8>, AnnotatorError> {
    let mut workbook = build_workbook(annotated)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write the workbook to `path`. Nothing is written when serialization fails.
pub fn save_workbook(annotated: &AnnotatedTable, path: impl AsRef<Path>) -> Result<(), AnnotatorError> {
    let buffer = to_buffer(annotated)?;
    std::fs::write(path, buffer)?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Data,
    decoration: Option<&CellDecoration>,
) -> Result<(), AnnotatorError> {
    let format = build_cell_format(value, decoration);

    match value {
        Data::Empty => {
            // Only write blank cells if they carry styling
            if decoration.is_some() {
                worksheet.write_blank(row, col, &format)?;
            }
        }
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            worksheet.write_string_with_format(row, col, s, &format)?;
        }
        Data::Float(f) => {
            worksheet.write_number_with_format(row, col, *f, &format)?;
        }
        Data::Int(i) => {
            worksheet.write_number_with_format(row, col, *i as f64, &format)?;
        }
        Data::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, &format)?;
        }
        Data::DateTime(dt) => match excel_datetime_to_naive(dt) {
            // re-encoded for the 1900 date system of the output workbook
            Some(datetime) => {
                worksheet.write_datetime_with_format(row, col, datetime, &format)?;
            }
            None => {
                worksheet.write_number_with_format(row, col, dt.as_f64(), &format)?;
            }
        },
        Data::Error(e) => {
            worksheet.write_string_with_format(row, col, e.to_string(), &format)?;
        }
    }

    if let Some(note_text) = decoration.and_then(|d| d.note.as_deref()) {
        let note = Note::new(note_text).add_author_prefix(false);
        worksheet.insert_note(row, col, &note)?;
    }

    Ok(())
}

fn build_cell_format(value: &Data, decoration: Option<&CellDecoration>) -> Format {
    let mut format = Format::new();

    // Date cells keep a date display, otherwise Excel shows the raw serial
    if let Data::DateTime(dt) = value {
        format = if dt.is_duration() {
            format.set_num_format(DURATION_NUM_FORMAT)
        } else if dt.as_f64().fract() == 0.0 {
            format.set_num_format(DATE_NUM_FORMAT)
        } else {
            format.set_num_format(DATETIME_NUM_FORMAT)
        };
    }

    if let Some(decoration) = decoration {
        if decoration.border {
            format = format.set_border(FormatBorder::Thin);
        }
        if decoration.error_fill {
            format = format
                .set_pattern(FormatPattern::Solid)
                .set_background_color(Color::RGB(ERROR_FILL_COLOR));
        }
    }

    format
}

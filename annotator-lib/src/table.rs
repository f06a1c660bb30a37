use calamine::{Data, Range, Reader, Xlsx, open_workbook_auto};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use crate::error::AnnotatorError;

static EMPTY_CELL: Data = Data::Empty;

/// Address of one cell, both coordinates 1-based (column 1 is `A`, row 1 is the header)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellLocation {
    pub column: usize,
    pub row: usize,
}

impl CellLocation {
    pub fn new(column: usize, row: usize) -> Self {
        CellLocation { column, row }
    }

    pub fn column_letter(&self) -> String {
        column_letter(self.column)
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letter(), self.row)
    }
}

/// Convert a 1-based column number to its letter (1 = A, 26 = Z, 27 = AA, etc.)
pub fn column_letter(column: usize) -> String {
    let mut result = String::new();
    let mut n = column.saturating_sub(1);
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// A cell counts as empty when it holds nothing or an empty string
pub fn is_empty_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Printable form of a cell, used by the text based rules
pub fn display_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Typed rows of one worksheet. Row 1 is the header, everything after it is data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<Data>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Data>>) -> Self {
        Table { rows }
    }

    /// Build a table from a calamine range keeping absolute positions,
    /// so table row 1 is sheet row 1 even when the used range starts lower.
    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((last_row, last_column)) = range.end() else {
            return Table::default();
        };

        let rows = (0..=last_row)
            .map(|row| {
                (0..=last_column)
                    .map(|column| range.get_value((row, column)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Table { rows }
    }

    pub fn rows(&self) -> &[Vec<Data>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a row by its 1-based number
    pub fn row(&self, row_number: usize) -> Option<&[Data]> {
        row_number
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .map(Vec::as_slice)
    }

    /// Get a cell; positions outside the table read as empty
    pub fn cell(&self, location: CellLocation) -> &Data {
        self.row(location.row)
            .and_then(|row| location.column.checked_sub(1).and_then(|i| row.get(i)))
            .unwrap_or(&EMPTY_CELL)
    }

    /// The header row. A table without rows, or whose first row has no value at all, has no header.
    pub fn header(&self) -> Result<&[Data], AnnotatorError> {
        match self.rows.first() {
            Some(header) if header.iter().any(|cell| !is_empty_cell(cell)) => Ok(header),
            _ => Err(AnnotatorError::MissingHeader),
        }
    }

    /// Number of header cells, counted up to the last non-empty one
    pub fn header_width(&self) -> usize {
        self.rows
            .first()
            .and_then(|header| header.iter().rposition(|cell| !is_empty_cell(cell)))
            .map_or(0, |index| index + 1)
    }

    /// Rows after the header, paired with their 1-based row number
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[Data])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| (index + 1, row.as_slice()))
    }
}

/// Read a worksheet from a workbook file (xlsx, xlsm, xlsb, xls or ods).
/// Uses the first worksheet when `sheet_name` is `None`.
pub fn read_table(path: impl AsRef<Path>, sheet_name: Option<&str>) -> Result<Table, AnnotatorError> {
    let mut workbook = open_workbook_auto(path)?;
    table_from_workbook::<BufReader<File>, _>(&mut workbook, sheet_name)
}

/// Read a worksheet from an in-memory xlsx file, e.g. an uploaded buffer
pub fn read_table_from_bytes(bytes: &[u8], sheet_name: Option<&str>) -> Result<Table, AnnotatorError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    table_from_workbook::<Cursor<Vec<u8>>, _>(&mut workbook, sheet_name)
}

fn table_from_workbook<RS, R>(workbook: &mut R, sheet_name: Option<&str>) -> Result<Table, AnnotatorError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    AnnotatorError: From<R::Error>,
{
    let sheet_names = workbook.sheet_names();

    let sheet_name = match sheet_name {
        Some(name) if sheet_names.iter().any(|n| n == name) => name.to_string(),
        Some(name) => return Err(AnnotatorError::SheetNotFound(name.to_string())),
        None => sheet_names
            .first()
            .cloned()
            .ok_or(AnnotatorError::NoWorksheets)?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    Ok(Table::from_range(&range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(5), "E");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
    }

    #[test]
    fn test_cell_location_display() {
        assert_eq!(CellLocation::new(1, 7).to_string(), "A7");
        assert_eq!(CellLocation::new(5, 12).to_string(), "E12");
        assert_eq!(CellLocation::new(28, 3).to_string(), "AB3");
    }

    #[test]
    fn test_is_empty_cell() {
        assert!(is_empty_cell(&Data::Empty));
        assert!(is_empty_cell(&text("")));
        assert!(!is_empty_cell(&text(" ")));
        assert!(!is_empty_cell(&Data::Int(0)));
        assert!(!is_empty_cell(&Data::Float(0.0)));
        assert!(!is_empty_cell(&Data::Bool(false)));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text(&text("Jane Doe")), "Jane Doe");
        assert_eq!(display_text(&Data::Int(42)), "42");
        assert_eq!(display_text(&Data::Float(1234567890.0)), "1234567890");
        assert_eq!(display_text(&Data::Float(1.5)), "1.5");
        assert_eq!(display_text(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_header_missing_for_empty_table() {
        let table = Table::default();
        assert!(matches!(table.header(), Err(AnnotatorError::MissingHeader)));
    }

    #[test]
    fn test_header_missing_when_first_row_is_blank() {
        let table = Table::new(vec![vec![Data::Empty, text("")], create_valid_row(1)]);
        assert!(matches!(table.header(), Err(AnnotatorError::MissingHeader)));
    }

    #[test]
    fn test_header_width_ignores_trailing_empty_cells() {
        let mut header = create_header_row();
        header.push(Data::Empty);
        header.push(text(""));
        let table = Table::new(vec![header]);

        assert_eq!(table.header_width(), 5);
    }

    #[test]
    fn test_header_width_counts_inner_empty_cells() {
        let table = Table::new(vec![vec![text("ID"), Data::Empty, text("Email")]]);
        assert_eq!(table.header_width(), 3);
    }

    #[test]
    fn test_cell_outside_table_reads_as_empty() {
        let table = create_table(vec![create_valid_row(1)]);

        assert_eq!(table.cell(CellLocation::new(1, 2)), &Data::Float(1.0));
        assert_eq!(table.cell(CellLocation::new(9, 2)), &Data::Empty);
        assert_eq!(table.cell(CellLocation::new(1, 99)), &Data::Empty);
        assert_eq!(table.cell(CellLocation::new(0, 0)), &Data::Empty);
    }

    #[test]
    fn test_data_rows_are_numbered_from_two() {
        let table = create_table(vec![create_valid_row(1), create_valid_row(2)]);
        let numbers: Vec<usize> = table.data_rows().map(|(n, _)| n).collect();

        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(table.row(1), table.header().ok());
        assert!(table.row(0).is_none());
    }
}

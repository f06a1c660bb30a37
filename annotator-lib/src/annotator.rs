use calamine::Data;
use std::collections::BTreeMap;

use crate::error::AnnotatorError;
use crate::row_validator::{RowFields, ValidationError, validate};
use crate::table::{CellLocation, Table, is_empty_cell};

pub const NOTE_SEPARATOR: &str = "\n";

/// Styling attached to one output cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellDecoration {
    /// Thin border on all four sides (header cells)
    pub border: bool,
    /// Solid red background (invalid cells)
    pub error_fill: bool,
    pub note: Option<String>,
}

impl CellDecoration {
    fn header_border() -> Self {
        CellDecoration {
            border: true,
            ..Default::default()
        }
    }

    fn error(note: String) -> Self {
        CellDecoration {
            error_fill: true,
            note: Some(note),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRow {
    pub row_number: usize,
    pub values: Vec<Data>,
    /// Keyed by 1-based column
    pub decorations: BTreeMap<usize, CellDecoration>,
    pub errors: Vec<ValidationError>,
}

impl AnnotatedRow {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn decoration(&self, column: usize) -> Option<&CellDecoration> {
        self.decorations.get(&column)
    }
}

/// The output table: every input row, in input order, plus its decorations
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTable {
    rows: Vec<AnnotatedRow>,
}

impl AnnotatedTable {
    /// Wrap already decorated rows, e.g. to serialize a hand-built table
    pub fn new(rows: Vec<AnnotatedRow>) -> Self {
        AnnotatedTable { rows }
    }

    pub fn rows(&self) -> &[AnnotatedRow] {
        &self.rows
    }

    pub fn row(&self, row_number: usize) -> Option<&AnnotatedRow> {
        row_number
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
    }

    pub fn decoration(&self, location: CellLocation) -> Option<&CellDecoration> {
        self.row(location.row)
            .and_then(|row| row.decoration(location.column))
    }

    pub fn error_rows(&self) -> impl Iterator<Item = &AnnotatedRow> {
        self.rows.iter().filter(|row| !row.is_valid())
    }

    pub fn validation_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.rows.iter().flat_map(|row| row.errors.iter())
    }

    pub fn is_valid(&self) -> bool {
        self.rows.iter().all(AnnotatedRow::is_valid)
    }
}

/// Validate every data row of `table` and build the decorated copy.
///
/// Only a missing header fails; invalid cell contents become decorations.
/// Rows whose cells are all empty keep their position but are not validated.
pub fn render(table: &Table) -> Result<AnnotatedTable, AnnotatorError> {
    let header = table.header()?;
    let header_width = table.header_width();

    let mut rows = Vec::with_capacity(table.row_count());
    rows.push(AnnotatedRow {
        row_number: 1,
        values: header.to_vec(),
        decorations: decorate_header(header),
        errors: Vec::new(),
    });

    for (row_number, values) in table.data_rows() {
        let errors = if values.iter().all(is_empty_cell) {
            Vec::new()
        } else {
            validate(&RowFields::from_row(values), row_number)
        };

        let decorations = if errors.is_empty() {
            BTreeMap::new()
        } else {
            decorate_errors(&errors, row_number, header_width)
        };

        rows.push(AnnotatedRow {
            row_number,
            values: values.to_vec(),
            decorations,
            errors,
        });
    }

    Ok(AnnotatedTable { rows })
}

fn decorate_header(header: &[Data]) -> BTreeMap<usize, CellDecoration> {
    header
        .iter()
        .enumerate()
        .filter(|(_, cell)| !is_empty_cell(cell))
        .map(|(index, _)| (index + 1, CellDecoration::header_border()))
        .collect()
}

/// Join the messages of each location with [`NOTE_SEPARATOR`], keeping their order
pub fn group_messages_by_location(errors: &[ValidationError]) -> BTreeMap<CellLocation, String> {
    let mut grouped: BTreeMap<CellLocation, Vec<&str>> = BTreeMap::new();
    for error in errors {
        grouped
            .entry(error.location)
            .or_default()
            .push(error.message.as_str());
    }

    grouped
        .into_iter()
        .map(|(location, messages)| (location, messages.join(NOTE_SEPARATOR)))
        .collect()
}

// Only columns inside the header are decorated
fn decorate_errors(
    errors: &[ValidationError],
    row_number: usize,
    header_width: usize,
) -> BTreeMap<usize, CellDecoration> {
    let mut notes = group_messages_by_location(errors);

    (1..=header_width)
        .filter_map(|column| {
            notes
                .remove(&CellLocation::new(column, row_number))
                .map(|note| (column, CellDecoration::error(note)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_valid_rows_are_copied_without_decoration() {
        let table = create_table(vec![create_valid_row(5), create_valid_row(6)]);
        let annotated = render(&table).unwrap();

        assert!(annotated.is_valid());
        for row in &annotated.rows()[1..] {
            assert!(row.decorations.is_empty());
            assert_eq!(Some(row.values.as_slice()), table.row(row.row_number));
        }
    }

    #[test]
    fn test_header_gets_border_on_populated_cells_only() {
        let mut header = create_header_row();
        header.insert(2, Data::Empty);
        let table = Table::new(vec![header.clone(), create_valid_row(1)]);

        let annotated = render(&table).unwrap();
        let header_row = annotated.row(1).unwrap();

        assert_eq!(header_row.values, header);
        assert_eq!(header_row.decorations.len(), 5);
        assert!(header_row.decoration(3).is_none());
        for column in [1, 2, 4, 5, 6] {
            let decoration = header_row.decoration(column).unwrap();
            assert!(decoration.border);
            assert!(!decoration.error_fill);
            assert!(decoration.note.is_none());
        }
    }

    #[test]
    fn test_invalid_cells_get_fill_and_note() {
        let mut row = create_valid_row(1);
        row[2] = text("bad-email");
        let table = create_table(vec![row]);

        let annotated = render(&table).unwrap();
        let decoration = annotated.decoration(CellLocation::new(3, 2)).unwrap();

        assert!(decoration.error_fill);
        assert!(!decoration.border);
        assert_eq!(decoration.note.as_deref(), Some("Invalid email format"));

        // valid cells of an errored row stay plain
        for column in [1, 2, 4, 5] {
            assert!(annotated.decoration(CellLocation::new(column, 2)).is_none());
        }
    }

    #[test]
    fn test_errors_outside_header_width_are_not_decorated() {
        let header = vec![text("ID"), text("Name"), text("Email")];
        let mut row = create_valid_row(1);
        row[4] = text("not-a-date");
        let table = Table::new(vec![header, row]);

        let annotated = render(&table).unwrap();
        let data_row = annotated.row(2).unwrap();

        assert_eq!(data_row.errors.len(), 1);
        assert!(data_row.decorations.is_empty());
    }

    #[test]
    fn test_blank_rows_keep_their_position() {
        let table = create_table(vec![
            create_valid_row(1),
            vec![Data::Empty; 5],
            create_invalid_row(),
        ]);

        let annotated = render(&table).unwrap();

        assert_eq!(annotated.rows().len(), 4);
        assert!(annotated.row(3).unwrap().is_valid());
        assert!(annotated.row(3).unwrap().decorations.is_empty());
        assert_eq!(annotated.row(4).unwrap().errors.len(), 5);
    }

    #[test]
    fn test_missing_header_is_a_structural_error() {
        let result = render(&Table::default());
        assert!(matches!(result, Err(AnnotatorError::MissingHeader)));
    }

    #[test]
    fn test_group_messages_joins_with_newline_in_order() {
        let location = CellLocation::new(2, 5);
        let errors = vec![
            ValidationError {
                location,
                message: "first".to_string(),
            },
            ValidationError {
                location: CellLocation::new(1, 5),
                message: "other cell".to_string(),
            },
            ValidationError {
                location,
                message: "second".to_string(),
            },
        ];

        let grouped = group_messages_by_location(&errors);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&location], "first\nsecond");
        assert_eq!(grouped[&CellLocation::new(1, 5)], "other cell");
    }
}

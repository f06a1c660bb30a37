use calamine::Data;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::table::{CellLocation, display_text, is_empty_cell};
use crate::utils::excel_datetime_to_naive;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z ]{1,50}$").expect("Hardcode regex pattern"));

// ASCII word characters only, `\w` would also accept any Unicode letter
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]+$").expect("Hardcode regex pattern")
});

static MOBILE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,15}$").expect("Hardcode regex pattern"));

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12][0-9]|3[01])/[0-9]{4}$")
        .expect("Hardcode regex pattern")
});

pub const DATE_OUTPUT_FORMAT: &str = "%m/%d/%Y";

// chrono's %B accepts full and abbreviated month names
const DATE_INPUT_FORMATS: [&str; 10] = [
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%b-%d-%Y",
    "%A, %B %d, %Y",
];

const DATETIME_INPUT_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// The five columns of an input row, in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Id,
    Name,
    Email,
    MobileNumber,
    JoiningDate,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Id,
        Field::Name,
        Field::Email,
        Field::MobileNumber,
        Field::JoiningDate,
    ];

    /// 1-based column holding this field
    pub fn column(self) -> usize {
        match self {
            Field::Id => 1,
            Field::Name => 2,
            Field::Email => 3,
            Field::MobileNumber => 4,
            Field::JoiningDate => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Name => "Name",
            Field::Email => "Email",
            Field::MobileNumber => "Mobile Number",
            Field::JoiningDate => "Joining Date",
        }
    }

    pub fn location(self, row_number: usize) -> CellLocation {
        CellLocation::new(self.column(), row_number)
    }
}

/// The typed values of one data row, picked by column position
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowFields {
    pub id: Data,
    pub name: Data,
    pub email: Data,
    pub mobile_number: Data,
    pub joining_date: Data,
}

impl RowFields {
    /// Extract the fields from a row; columns missing from a short row are empty
    pub fn from_row(row: &[Data]) -> Self {
        let cell = |field: Field| row.get(field.column() - 1).cloned().unwrap_or_default();

        RowFields {
            id: cell(Field::Id),
            name: cell(Field::Name),
            email: cell(Field::Email),
            mobile_number: cell(Field::MobileNumber),
            joining_date: cell(Field::JoiningDate),
        }
    }

    pub fn get(&self, field: Field) -> &Data {
        match field {
            Field::Id => &self.id,
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::MobileNumber => &self.mobile_number,
            Field::JoiningDate => &self.joining_date,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: {message}")]
pub struct ValidationError {
    pub location: CellLocation,
    pub message: String,
}

struct FieldRule {
    field: Field,
    required_message: &'static str,
    is_well_formed: fn(&Data) -> bool,
    format_message: &'static str,
}

const RULES: [FieldRule; 5] = [
    FieldRule {
        field: Field::Id,
        required_message: "ID is required",
        is_well_formed: is_numeric_value,
        format_message: "ID must be a number",
    },
    FieldRule {
        field: Field::Name,
        required_message: "Name is required",
        is_well_formed: is_valid_name,
        format_message: "Name must contain only letters and have a maximum length of 50",
    },
    FieldRule {
        field: Field::Email,
        required_message: "Email is required",
        is_well_formed: is_valid_email,
        format_message: "Invalid email format",
    },
    FieldRule {
        field: Field::MobileNumber,
        required_message: "Mobile number is required",
        is_well_formed: is_valid_mobile_number,
        format_message: "Mobile number must contain only digits and have a maximum length of 15",
    },
    FieldRule {
        field: Field::JoiningDate,
        required_message: "Joining Date is required",
        is_well_formed: is_valid_joining_date,
        format_message: "Invalid date format. Use mm/dd/yyyy",
    },
];

/// Validate one data row. Returns at most one error per field, in column order.
pub fn validate(fields: &RowFields, row_number: usize) -> Vec<ValidationError> {
    RULES
        .iter()
        .filter_map(|rule| {
            let value = fields.get(rule.field);
            let message = if is_absent(value) {
                rule.required_message
            } else if !(rule.is_well_formed)(value) {
                rule.format_message
            } else {
                return None;
            };

            Some(ValidationError {
                location: rule.field.location(row_number),
                message: message.to_string(),
            })
        })
        .collect()
}

/// Empty cells, and the zero and `false` values, fail the "is required" check
fn is_absent(value: &Data) -> bool {
    match value {
        Data::Int(0) | Data::Bool(false) => true,
        Data::Float(f) => *f == 0.0 || f.is_nan(),
        other => is_empty_cell(other),
    }
}

// The stored type decides, "42" typed as text is not a number
fn is_numeric_value(value: &Data) -> bool {
    matches!(value, Data::Int(_) | Data::Float(_))
}

fn is_valid_name(value: &Data) -> bool {
    NAME_PATTERN.is_match(&display_text(value))
}

fn is_valid_email(value: &Data) -> bool {
    EMAIL_PATTERN.is_match(&display_text(value))
}

fn is_valid_mobile_number(value: &Data) -> bool {
    MOBILE_NUMBER_PATTERN.is_match(&display_text(value))
}

fn is_valid_joining_date(value: &Data) -> bool {
    parse_date(value)
        .map(|date| date.format(DATE_OUTPUT_FORMAT).to_string())
        .is_some_and(|formatted| DATE_PATTERN.is_match(&formatted))
}

/// Interpret a cell as a calendar date. Plain numbers and durations are not dates.
pub fn parse_date(value: &Data) -> Option<NaiveDate> {
    match value {
        Data::DateTime(dt) => excel_datetime_to_naive(dt).map(|dt| dt.date()),
        Data::DateTimeIso(s) | Data::String(s) => parse_date_string(s),
        _ => None,
    }
}

fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();

    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_INPUT_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

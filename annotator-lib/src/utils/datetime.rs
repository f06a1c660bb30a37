use calamine::ExcelDateTime;
use chrono::NaiveDateTime;
use chrono::prelude::Local;

pub fn get_utc_iso_datetime() -> String {
    let timestamp = chrono::Utc::now().to_rfc3339();
    return timestamp;
}

pub fn get_local_datetime_with_format(format: &str) -> String {
    return Local::now().format(format).to_string();
}

/// Calendar value of a spreadsheet date cell, in the workbook's own date system
/// (1900 or 1904). Durations have no calendar value.
pub fn excel_datetime_to_naive(datetime: &ExcelDateTime) -> Option<NaiveDateTime> {
    if !datetime.is_datetime() || !datetime.as_f64().is_finite() {
        return None;
    }
    datetime.as_datetime()
}

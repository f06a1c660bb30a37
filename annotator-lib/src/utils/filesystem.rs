use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::ERRORS_LOG_FILE;
use crate::utils::get_utc_iso_datetime;

/// Append an error entry to the default errors log file
///
/// # Arguments
/// * `error_type` - A description of the error type/category (e.g., "Validation Error Report")
/// * `error_message` - The actual error message content
pub fn write_error_to_log(error_type: &str, error_message: &str) {
    write_error_to_log_file(ERRORS_LOG_FILE, error_type, error_message);
}

/// Same as [`write_error_to_log`] with an explicit log file.
/// Failing to write the log never fails the caller.
pub fn write_error_to_log_file(log_path: impl AsRef<Path>, error_type: &str, error_message: &str) {
    let timestamp = get_utc_iso_datetime();
    let log_entry = format!("\n[{}] {}:\n{}\n", timestamp, error_type, error_message);

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        let _ = writeln!(file, "{}", log_entry);
    }
}

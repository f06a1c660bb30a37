use thiserror::Error;

/// Structural failures. Problems with cell contents are never reported here,
/// they end up as [`crate::ValidationError`] annotations instead.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    #[error("The input table has no header row")]
    MissingHeader,

    #[error("The workbook does not contain any worksheet")]
    NoWorksheets,

    #[error("Worksheet '{0}' not found in the workbook")]
    SheetNotFound(String),

    #[error("Error reading workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Error reading xlsx data: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Error writing workbook: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),
}

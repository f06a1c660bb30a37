pub mod utils;

pub use annotator_lib::ERRORS_LOG_FILE;

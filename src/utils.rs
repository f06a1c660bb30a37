use annotator_lib::utils::get_local_datetime_with_format;
use std::path::Path;

/// Name of the annotated workbook when none is given: `<input stem>_validated_<timestamp>.xlsx`
pub fn generate_output_filename(input_file: &str) -> String {
    let timestamp = get_local_datetime_with_format("%Y-%m-%d_%H-%M-%S");
    let stem = Path::new(input_file)
        .file_stem()
        .and_then(|name| name.to_str())
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join("_"))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "output".to_string());
    let filename = format!("{stem}_validated_{timestamp}.xlsx");
    return filename.to_lowercase();
}

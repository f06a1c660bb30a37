// reset; cargo run -- --input-file ./data/employees.xlsx
// reset; cargo run -- --input-file ./data/employees.xlsx --sheet-name Employees --output-file output.xlsx --errors-csv errors.csv

use annotator_lib::xlsx_writer::save_workbook;
use annotator_lib::SheetValidatorBuilder;
use clap::Parser;
use sheet_annotator::{utils::generate_output_filename, ERRORS_LOG_FILE};

#[derive(Parser)]
#[command(name = "sheet-annotator")]
#[command(
    about = "Validate an employee spreadsheet and write a copy with the invalid cells highlighted"
)]
#[command(version)]
struct Args {
    /// Path to the workbook to validate (xlsx, xlsm, xlsb, xls or ods)
    #[arg(short, long)]
    input_file: String,

    /// Optional sheet name to validate (if not specified, validates the first sheet)
    #[arg(long)]
    sheet_name: Option<String>,

    /// Where to write the annotated workbook. Defaults to <input>_validated_<timestamp>.xlsx
    #[arg(short, long)]
    output_file: Option<String>,

    /// Optional path of a CSV file listing every validation error
    #[arg(long)]
    errors_csv: Option<String>,

    /// File the validation report and structural errors are appended to
    #[arg(long, default_value = ERRORS_LOG_FILE)]
    errors_log: String,

    /// Exit with status 1 when at least one row has validation errors
    #[arg(long)]
    fail_on_errors: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let arguments = Args::parse();

    let mut validator = match SheetValidatorBuilder::new(&arguments.input_file)
        .sheet_name(arguments.sheet_name.as_deref())
        .errors_log_path(&arguments.errors_log)
        .build()
    {
        Ok(validator) => validator,
        Err(e) => {
            eprintln!("❌ Failed to read the input workbook: {e}");
            eprintln!("❌ Check {} for details.", arguments.errors_log);
            std::process::exit(1);
        }
    };

    let annotated = validator.validate_and_annotate()?;
    if validator.validation_reports.is_empty() {
        println!("✅ Validation completed! No invalid cells found.");
    } else {
        println!(
            "❌ Validation found {} error(s) in {} row(s)",
            validator.error_count(),
            validator.validation_reports.len()
        );
        eprintln!("❌ Check {} for details.", arguments.errors_log);
    }

    let output_file = arguments
        .output_file
        .unwrap_or_else(|| generate_output_filename(&arguments.input_file));
    match save_workbook(&annotated, &output_file) {
        Ok(_) => {
            println!("✅ Annotated workbook created: {output_file}");
        }
        Err(e) => {
            eprintln!("❌ Failed to write the annotated workbook with error: {e}");
            std::process::exit(1);
        }
    }

    if let Some(errors_csv) = &arguments.errors_csv {
        validator.export_errors_csv(errors_csv)?;
        println!("✅ Errors CSV created: {errors_csv}");
    }

    if arguments.fail_on_errors && !validator.validation_reports.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use serde_json::Value;

use crate::OutputFormat;

/// Render a computation envelope on stdout in the requested format.
/// Tables and CSV expand schedule rows; minimal prints a single headline.
pub fn format_output(format: &OutputFormat, envelope: &Value) {
    match format {
        OutputFormat::Json => json::print_json(envelope),
        OutputFormat::Table => table::print_table(envelope),
        OutputFormat::Csv => csv_out::print_csv(envelope),
        OutputFormat::Minimal => minimal::print_minimal(envelope),
    }
}

//! Output formatting module

mod json;
mod text;

use miette::Result;

use shellbridge_core::FileReport;

use crate::cli::ReportFormat;

/// Prints reports and returns true if any of them contains an error.
pub fn output_results(reports: &[FileReport], format: ReportFormat) -> Result<bool> {
    let has_errors = reports.iter().any(FileReport::has_errors);

    match format {
        ReportFormat::Json => json::output_json(reports)?,
        ReportFormat::Text => text::output_text(reports),
    }

    Ok(has_errors)
}

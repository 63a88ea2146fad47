//! Text output formatter

use shellbridge_core::{FileReport, ParseResult, Severity};

pub fn output_text(reports: &[FileReport]) {
    for report in reports {
        if report.results.is_empty() {
            continue;
        }

        println!("\n{}:", report.path.display());
        for result in &report.results {
            println!("  {}", format_result(result));
        }
    }

    let total_issues: usize = reports.iter().map(|r| r.results.len()).sum();
    let fixable = reports
        .iter()
        .flat_map(|r| &r.results)
        .filter(|r| r.code_action.is_some())
        .count();

    println!();
    println!(
        "Checked {} files, found {} issues ({} fixable)",
        reports.len(),
        total_issues,
        fixable
    );
}

/// One result as `line:column severity [code]: message`, 1-based.
fn format_result(result: &ParseResult) -> String {
    let diag = &result.diagnostic;
    let severity = match diag.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Information => "info",
    };
    format!(
        "{}:{} {} [{}]: {}",
        diag.range.start.line + 1,
        diag.range.start.character + 1,
        severity,
        diag.code,
        diag.message
    )
}

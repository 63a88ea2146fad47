//! Writing quick fixes back to files

use std::path::PathBuf;

use miette::Result;
use tracing::error;

use shellbridge_core::{CodeAction, FileReport, apply_actions, apply_actions_to_file};

pub struct FixSummary {
    pub total_fixes: usize,
    pub files_fixed: usize,
    pub fixes_by_file: Vec<(PathBuf, usize)>,
}

/// Applies the quick fixes of every report.
pub fn apply_fixes(reports: &[FileReport], dry_run: bool) -> Result<FixSummary> {
    let mut total_fixes = 0;
    let mut files_fixed = 0;
    let mut fixes_by_file = Vec::new();

    for report in reports {
        let actions: Vec<&CodeAction> = report
            .results
            .iter()
            .filter_map(|result| result.code_action.as_ref())
            .collect();
        if actions.is_empty() {
            continue;
        }

        let outcome = if dry_run {
            Ok(apply_actions(&report.source, &actions))
        } else {
            apply_actions_to_file(&report.path, &actions)
        };

        match outcome {
            Ok(fixed) if fixed.modified => {
                fixes_by_file.push((report.path.clone(), fixed.fixes_applied));
                total_fixes += fixed.fixes_applied;
                files_fixed += 1;
            }
            Ok(_) => {}
            Err(e) => error!("Failed to fix {}: {}", report.path.display(), e),
        }
    }

    Ok(FixSummary {
        total_fixes,
        files_fixed,
        fixes_by_file,
    })
}

pub fn output_fix_summary(summary: &FixSummary, dry_run: bool) {
    if summary.total_fixes == 0 {
        println!("No fixable issues found.");
        return;
    }

    let verb = if dry_run { "Would fix" } else { "Fixed" };
    println!(
        "\n{} {} issues in {} files:",
        verb, summary.total_fixes, summary.files_fixed
    );
    for (path, count) in &summary.fixes_by_file {
        println!("  {}: {} fixes", path.display(), count);
    }

    if dry_run {
        println!("\nRun without --dry-run to apply fixes.");
    }
}

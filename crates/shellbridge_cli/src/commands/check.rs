//! Check command implementation

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use tracing::info;

use shellbridge_core::{Analyzer, BridgeConfig, BridgeError, FileReport, Severity};

use crate::cli::{Cli, ReportFormat};
use crate::fix::{apply_fixes, output_fix_summary};
use crate::output::output_results;

pub fn run_check(
    cli: &Cli,
    files: &[PathBuf],
    format: ReportFormat,
    fix: bool,
    dry_run: bool,
) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => BridgeConfig::from_file(path).into_diagnostic()?,
        None => find_config(Path::new("."))?,
    };
    let analyzer = Analyzer::new(config).into_diagnostic()?;

    let (reports, failures) = check_files(&analyzer, files);

    // A tool that cannot run fails every file the same way.
    if let Some((_, e @ (BridgeError::Spawn { .. } | BridgeError::ToolFailed { .. }))) =
        failures.first()
        && failures.len() == files.len()
    {
        return Err(miette::miette!("{}", e));
    }

    if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to check:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    if fix {
        let summary = apply_fixes(&reports, dry_run)?;
        output_fix_summary(&summary, dry_run);

        if dry_run {
            return output_results(&reports, format);
        }

        // Fixed findings are gone; only unfixed errors fail the run.
        let unfixed_errors = reports.iter().any(|report| {
            report.results.iter().any(|result| {
                result.code_action.is_none() && result.diagnostic.severity == Severity::Error
            })
        });
        return Ok(unfixed_errors || !failures.is_empty());
    }

    let has_errors = output_results(&reports, format)?;
    Ok(has_errors || !failures.is_empty())
}

/// Checks files in parallel, keeping the input order.
fn check_files(
    analyzer: &Analyzer,
    files: &[PathBuf],
) -> (Vec<FileReport>, Vec<(PathBuf, BridgeError)>) {
    let outcomes: Vec<_> = files
        .par_iter()
        .map(|path| (path, analyzer.analyze_file(path)))
        .collect();

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => failures.push((path.clone(), e)),
        }
    }
    (reports, failures)
}

/// Loads the configuration file in `dir`, or the defaults.
pub fn find_config(dir: &Path) -> Result<BridgeConfig> {
    if let Some(path) = BridgeConfig::discover(dir) {
        info!("Using config: {}", path.display());
        return BridgeConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    let mut config = BridgeConfig::new();
    config.base_dir = std::env::current_dir().ok();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = find_config(dir.path()).unwrap();
        assert_eq!(config.executable_path, PathBuf::from("shellcheck"));
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".shellbridge.json"),
            r#"{ "exclude": ["SC2034"] }"#,
        )
        .unwrap();

        let config = find_config(dir.path()).unwrap();
        assert_eq!(config.exclude, vec!["SC2034".to_string()]);
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_check_files_collects_failures() {
        let analyzer = Analyzer::new(BridgeConfig::new()).unwrap();
        let missing = PathBuf::from("/nonexistent/script.sh");

        let (reports, failures) = check_files(&analyzer, std::slice::from_ref(&missing));

        assert!(reports.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, missing);
    }
}

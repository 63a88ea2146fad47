//! Translate command implementation

use std::io::Read;
use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::debug;

use shellbridge_core::{OutputFormat, ResultTranslator, TextDocument};

pub fn run_translate(
    format: OutputFormat,
    document: &Path,
    input: Option<&Path>,
    quick_fixes: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(document)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", document.display()))?;

    let output = match input {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .into_diagnostic()?;
            buf
        }
    };

    let results = ResultTranslator::for_format(format)
        .with_quick_fixes(quick_fixes)
        .translate(&output, &TextDocument::new(&text))
        .into_diagnostic()?;
    debug!("Translated {} findings", results.len());

    println!(
        "{}",
        serde_json::to_string_pretty(&results).into_diagnostic()?
    );
    Ok(())
}

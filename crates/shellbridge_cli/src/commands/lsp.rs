//! LSP command implementation

use miette::{IntoDiagnostic, Result};

pub fn run_lsp() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("shellbridge-lsp")
        .build()
        .into_diagnostic()?;

    runtime.block_on(shellbridge_lsp::run());
    Ok(())
}

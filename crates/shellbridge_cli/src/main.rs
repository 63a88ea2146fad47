//! shellbridge CLI
//!
//! Checks shell scripts with ShellCheck, translates its output and serves
//! the results to editors over LSP.

mod cli;
mod commands;
mod fix;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{run_check, run_init, run_lsp, run_translate};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Check {
            files,
            format,
            fix,
            dry_run,
        } => run_check(&cli, files, *format, *fix, *dry_run),
        Commands::Translate {
            format,
            document,
            input,
            no_quick_fix,
        } => run_translate(*format, document, input.as_deref(), !*no_quick_fix).map(|_| false),
        Commands::Init { force } => run_init(*force).map(|_| false),
        Commands::Lsp => run_lsp().map(|_| false),
    }
}

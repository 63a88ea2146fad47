//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use shellbridge_core::OutputFormat;

/// shellbridge - ShellCheck diagnostics and quick fixes for editors
#[derive(Parser)]
#[command(name = "shellbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// How `check` prints its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check shell scripts with ShellCheck
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Apply available quick fixes
        #[arg(long)]
        fix: bool,

        /// Preview fixes without applying them
        #[arg(long, requires = "fix")]
        dry_run: bool,
    },

    /// Translate captured ShellCheck output against the checked document
    Translate {
        /// Format of the captured output (json or json1)
        #[arg(short, long)]
        format: OutputFormat,

        /// The document ShellCheck analysed
        #[arg(short, long)]
        document: PathBuf,

        /// File holding the output; read from stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Do not build quick fixes
        #[arg(long)]
        no_quick_fix: bool,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Start the LSP server
    Lsp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_translate_format_parsing() {
        let cli = Cli::try_parse_from([
            "shellbridge",
            "translate",
            "--format",
            "json1",
            "--document",
            "run.sh",
        ])
        .unwrap();

        match cli.command {
            Commands::Translate { format, input, .. } => {
                assert_eq!(format, OutputFormat::Json1);
                assert!(input.is_none());
            }
            _ => panic!("expected translate"),
        }
    }

    #[test]
    fn test_unknown_translate_format_rejected() {
        let result = Cli::try_parse_from([
            "shellbridge",
            "translate",
            "--format",
            "gcc",
            "--document",
            "run.sh",
        ]);
        assert!(result.is_err());
    }
}

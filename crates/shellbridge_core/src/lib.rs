//! # shellbridge_core
//!
//! Translation of ShellCheck output into editor diagnostics.
//!
//! This crate provides:
//! - Parsing of both ShellCheck JSON formats (`json` and `json1`)
//! - Position normalization, including the tab expansion of `json`
//! - Diagnostics and quick-fix code actions built from findings
//! - Format selection by tool version
//! - Running ShellCheck and applying fixes
//!
//! ## Example
//!
//! ```rust,ignore
//! use shellbridge_core::{ResultTranslator, TextDocument};
//!
//! let script = std::fs::read_to_string("deploy.sh")?;
//! let output = std::fs::read_to_string("shellcheck.json")?;
//!
//! let results = ResultTranslator::json().translate(&output, &TextDocument::new(&script))?;
//! for result in results {
//!     println!("{}: {}", result.diagnostic.code, result.diagnostic.message);
//! }
//! ```

mod analyzer;
mod config;
pub mod diagnostic;
pub mod document;
pub mod envelope;
mod error;
pub mod finding;
pub mod fix;
mod fixer;
mod format;
pub mod position;
pub mod runner;
pub mod suppression;
mod translator;

pub use analyzer::{Analyzer, FileReport};
pub use config::{BridgeConfig, RunTrigger};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticTag, Severity};
pub use document::{DocumentText, TextDocument};
pub use error::BridgeError;
pub use finding::{RawFinding, RawReplacement};
pub use fix::{CodeAction, CodeActionKind, FixBuilder, TextEdit};
pub use fixer::{
    FixerResult, apply_actions, apply_actions_to_file, apply_edits, position_to_offset,
};
pub use format::{DEFAULT_CAPABILITY_THRESHOLD, FormatSelector, OutputFormat};
pub use position::{NormalizedPosition, PositionNormalizer, Range};
pub use runner::ShellcheckRunner;
pub use translator::{ParseResult, ResultTranslator};

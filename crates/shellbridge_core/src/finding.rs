//! Raw records as emitted by ShellCheck's JSON formats.

use serde::{Deserialize, Serialize};

/// One issue reported by ShellCheck.
///
/// Lines and columns are 1-based. The end coordinates are optional in the
/// wire format and collapse to the start when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFinding {
    /// File name as passed to the tool (`-` for stdin).
    #[serde(default)]
    pub file: String,

    pub line: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,

    pub column: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,

    /// Severity level as reported by the tool.
    pub level: Level,

    /// Numeric rule code (2086 for SC2086).
    pub code: u32,

    pub message: String,

    /// Suggested fix, if the tool knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<RawFix>,
}

impl RawFinding {
    /// End line, defaulting to the start line.
    pub fn end_line(&self) -> u32 {
        self.end_line.unwrap_or(self.line)
    }

    /// End column, defaulting to the start column.
    pub fn end_column(&self) -> u32 {
        self.end_column.unwrap_or(self.column)
    }

    /// Replacements of the attached fix, empty when there is none.
    pub fn replacements(&self) -> &[RawReplacement] {
        self.fix
            .as_ref()
            .map(|fix| fix.replacements.as_slice())
            .unwrap_or_default()
    }
}

/// Severity level string of a finding.
///
/// Unknown strings are preserved so that nothing is lost when the tool grows
/// new levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    Error,
    Warning,
    Info,
    Style,
    Other(String),
}

impl From<String> for Level {
    fn from(value: String) -> Self {
        match value.as_str() {
            "error" => Level::Error,
            "warning" => Level::Warning,
            "info" => Level::Info,
            "style" => Level::Style,
            _ => Level::Other(value),
        }
    }
}

impl From<&str> for Level {
    fn from(value: &str) -> Self {
        Level::from(value.to_string())
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => "error".to_string(),
            Level::Warning => "warning".to_string(),
            Level::Info => "info".to_string(),
            Level::Style => "style".to_string(),
            Level::Other(s) => s,
        }
    }
}

/// The fix attached to a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFix {
    #[serde(default)]
    pub replacements: Vec<RawReplacement>,
}

/// A single text substitution proposed by the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReplacement {
    pub precedence: i32,
    pub line: u32,
    pub end_line: u32,
    pub column: u32,
    pub end_column: u32,
    pub insertion_point: InsertionPoint,
    pub replacement: String,
}

/// Where text is inserted when the replacement range is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertionPoint {
    BeforeStart,
    AfterEnd,
}

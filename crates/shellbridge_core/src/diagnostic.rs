//! Editor-facing diagnostics built from raw findings.

use serde::{Deserialize, Serialize};

use crate::document::DocumentText;
use crate::finding::{Level, RawFinding};
use crate::position::{PositionNormalizer, Range};

/// Value of [`Diagnostic::source`].
pub const DIAGNOSTIC_SOURCE: &str = "shellcheck";

const WIKI_BASE_URL: &str = "https://www.shellcheck.net/wiki/";

/// Rule codes that carry extra tags.
const TAGGED_CODES: &[(u32, DiagnosticTag)] = &[(2034, DiagnosticTag::Unnecessary)];

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
}

impl From<&Level> for Severity {
    fn from(level: &Level) -> Self {
        match level {
            Level::Error => Severity::Error,
            Level::Style | Level::Info => Severity::Information,
            Level::Warning | Level::Other(_) => Severity::Warning,
        }
    }
}

/// Extra rendering hints attached to a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticTag {
    /// Unused or unnecessary code, usually rendered faded out.
    Unnecessary,
    Deprecated,
}

/// A diagnostic ready to be handed to an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    pub source: String,
    /// Stable rule identifier such as `SC2086`.
    pub code: String,
    /// Documentation page of the rule.
    pub help_uri: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<DiagnosticTag>,
}

/// Formats a numeric rule code as `SC<code>`.
pub fn rule_code(code: u32) -> String {
    format!("SC{code}")
}

/// Tags attached to a rule code.
pub fn tags_for_code(code: u32) -> Vec<DiagnosticTag> {
    TAGGED_CODES
        .iter()
        .filter(|(tagged, _)| *tagged == code)
        .map(|(_, tag)| *tag)
        .collect()
}

/// Builds diagnostics for one document.
pub struct DiagnosticBuilder<'a> {
    normalizer: &'a dyn PositionNormalizer,
    document: &'a dyn DocumentText,
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn new(normalizer: &'a dyn PositionNormalizer, document: &'a dyn DocumentText) -> Self {
        Self {
            normalizer,
            document,
        }
    }

    /// Converts a finding into a diagnostic.
    ///
    /// Missing end coordinates produce a zero-width range at the start.
    pub fn build(&self, finding: &RawFinding) -> Diagnostic {
        let range = self.normalizer.normalize_range(
            (finding.line, finding.column),
            (finding.end_line(), finding.end_column()),
            self.document,
        );

        Diagnostic {
            range,
            message: finding.message.clone(),
            severity: Severity::from(&finding.level),
            source: DIAGNOSTIC_SOURCE.to_string(),
            code: rule_code(finding.code),
            help_uri: format!("{WIKI_BASE_URL}{}", rule_code(finding.code)),
            tags: tags_for_code(finding.code),
        }
    }
}

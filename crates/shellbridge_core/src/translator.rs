//! Translation of tool output into diagnostics and quick fixes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostic::{Diagnostic, DiagnosticBuilder};
use crate::document::DocumentText;
use crate::envelope::{EnvelopeParser, Json1Envelope, JsonEnvelope};
use crate::fix::{CodeAction, FixBuilder};
use crate::position::{CharacterNormalizer, PositionNormalizer, TabExpandingNormalizer};
use crate::{BridgeError, OutputFormat};

/// A diagnostic with its quick fix, if one could be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub diagnostic: Diagnostic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_action: Option<CodeAction>,
}

/// Translates the output of one ShellCheck format.
///
/// The envelope parser and the position normalizer are chosen at
/// construction; everything else is shared between formats.
pub struct ResultTranslator {
    envelope: Box<dyn EnvelopeParser>,
    normalizer: Box<dyn PositionNormalizer>,
    quick_fixes: bool,
}

impl ResultTranslator {
    /// Creates a translator from explicit strategies.
    pub fn new(envelope: Box<dyn EnvelopeParser>, normalizer: Box<dyn PositionNormalizer>) -> Self {
        Self {
            envelope,
            normalizer,
            quick_fixes: true,
        }
    }

    /// Translator for `--format=json`.
    pub fn json() -> Self {
        Self::new(Box::new(JsonEnvelope), Box::new(TabExpandingNormalizer))
    }

    /// Translator for `--format=json1`.
    pub fn json1() -> Self {
        Self::new(Box::new(Json1Envelope), Box::new(CharacterNormalizer))
    }

    pub fn for_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::json(),
            OutputFormat::Json1 => Self::json1(),
        }
    }

    /// Enables or disables quick-fix generation.
    pub fn with_quick_fixes(mut self, enabled: bool) -> Self {
        self.quick_fixes = enabled;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.envelope.format()
    }

    /// Translates raw tool output for `document`.
    ///
    /// Fails only when the output cannot be parsed; irregular records
    /// degrade to diagnostics without fixes.
    pub fn translate(
        &self,
        output: &str,
        document: &dyn DocumentText,
    ) -> Result<Vec<ParseResult>, BridgeError> {
        let findings = self.envelope.parse(output)?;
        debug!(
            "Translating {} {} findings",
            findings.len(),
            self.envelope.format()
        );

        let diagnostics = DiagnosticBuilder::new(self.normalizer.as_ref(), document);
        let fixes = FixBuilder::new(self.normalizer.as_ref(), document);

        Ok(findings
            .iter()
            .map(|finding| {
                let diagnostic = diagnostics.build(finding);
                let code_action = if self.quick_fixes {
                    fixes.build(finding, &diagnostic)
                } else {
                    None
                };
                ParseResult {
                    diagnostic,
                    code_action,
                }
            })
            .collect())
    }
}

impl std::fmt::Debug for ResultTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultTranslator")
            .field("format", &self.envelope.format())
            .field("quick_fixes", &self.quick_fixes)
            .finish()
    }
}

//! Quick-fix code actions built from a finding's replacements.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostic::{Diagnostic, rule_code};
use crate::document::DocumentText;
use crate::finding::{RawFinding, RawReplacement};
use crate::position::{PositionNormalizer, Range};

/// A replacement of one range in the diagnosed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }
}

/// Category of a code action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeActionKind {
    QuickFix,
}

/// A fix for one diagnostic.
///
/// `edits` target the diagnosed document. Every range refers to the original
/// text and no two edits overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAction {
    pub title: String,
    pub kind: CodeActionKind,
    pub diagnostic: Diagnostic,
    pub edits: Vec<TextEdit>,
}

/// Builds quick fixes for one document.
pub struct FixBuilder<'a> {
    normalizer: &'a dyn PositionNormalizer,
    document: &'a dyn DocumentText,
}

impl<'a> FixBuilder<'a> {
    pub fn new(normalizer: &'a dyn PositionNormalizer, document: &'a dyn DocumentText) -> Self {
        Self {
            normalizer,
            document,
        }
    }

    /// Converts the finding's fix into a code action.
    ///
    /// Only fixes with one or two replacements are supported; two
    /// replacements are emitted in reverse input order and dropped when
    /// their ranges overlap.
    pub fn build(&self, finding: &RawFinding, diagnostic: &Diagnostic) -> Option<CodeAction> {
        let edits = match finding.replacements() {
            [] => return None,
            [only] => vec![self.edit(only)],
            [first, second] => {
                let (first, second) = (self.edit(first), self.edit(second));
                if first.range.overlaps(&second.range) {
                    debug!(
                        "Skipping fix for {} with overlapping replacements",
                        diagnostic.code
                    );
                    return None;
                }
                vec![second, first]
            }
            more => {
                debug!(
                    "Skipping fix for {} with {} replacements",
                    diagnostic.code,
                    more.len()
                );
                return None;
            }
        };

        Some(CodeAction {
            title: format!("Apply fix for {}", rule_code(finding.code)),
            kind: CodeActionKind::QuickFix,
            diagnostic: diagnostic.clone(),
            edits,
        })
    }

    fn edit(&self, replacement: &RawReplacement) -> TextEdit {
        let range = self.normalizer.normalize_range(
            (replacement.line, replacement.column),
            (replacement.end_line, replacement.end_column),
            self.document,
        );
        TextEdit::new(range, replacement.replacement.clone())
    }
}

//! "Disable rule" code actions based on ShellCheck directives.

use crate::diagnostic::Diagnostic;
use crate::document::DocumentText;
use crate::fix::{CodeAction, CodeActionKind, TextEdit};
use crate::position::{NormalizedPosition, Range};

const DIRECTIVE_PREFIX: &str = "# shellcheck disable=";

/// Builds an action that silences `diagnostic` on its line.
///
/// A directive on the line above is extended; otherwise a new directive is
/// inserted with the line's indentation.
pub fn disable_rule_action(diagnostic: &Diagnostic, document: &dyn DocumentText) -> CodeAction {
    let line = diagnostic.range.start.line;
    let code = &diagnostic.code;

    let existing = line
        .checked_sub(1)
        .and_then(|above| document.line(above).map(|text| (above, text)))
        .filter(|(_, text)| text.trim_start().starts_with(DIRECTIVE_PREFIX));

    let edit = match existing {
        Some((above, text)) => {
            let end = NormalizedPosition::new(above, text.trim_end().chars().count() as u32);
            TextEdit::new(Range::point(end), format!(",{code}"))
        }
        None => {
            let indent: String = document
                .line(line)
                .unwrap_or_default()
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect();
            TextEdit::new(
                Range::point(NormalizedPosition::new(line, 0)),
                format!("{indent}{DIRECTIVE_PREFIX}{code}\n"),
            )
        }
    };

    CodeAction {
        title: format!("Disable ShellCheck rule {code} for this line"),
        kind: CodeActionKind::QuickFix,
        diagnostic: diagnostic.clone(),
        edits: vec![edit],
    }
}

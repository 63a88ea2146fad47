//! Conversion from bridge types to LSP types.
//!
//! Bridge positions count Unicode scalar values; LSP positions count UTF-16
//! code units, so every conversion needs the document text.

use std::collections::HashMap;

use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeDescription, Diagnostic, DiagnosticSeverity, DiagnosticTag,
    NumberOrString, Position, Range, TextEdit, Url, WorkspaceEdit,
};

use shellbridge_core::{
    CodeAction as BridgeCodeAction, Diagnostic as BridgeDiagnostic,
    DiagnosticTag as BridgeDiagnosticTag, DocumentText, NormalizedPosition,
    Range as BridgeRange, Severity as BridgeSeverity, TextEdit as BridgeTextEdit,
};

/// Converts a character position to an LSP position.
///
/// Characters past the end of the line are kept as-is.
pub fn to_lsp_position(position: NormalizedPosition, document: &dyn DocumentText) -> Position {
    let Some(line) = document.line(position.line) else {
        return Position::new(position.line, position.character);
    };

    let mut units = 0u32;
    let mut chars = 0u32;
    for ch in line.chars() {
        if chars >= position.character {
            break;
        }
        units += ch.len_utf16() as u32;
        chars += 1;
    }

    Position::new(position.line, units + (position.character - chars))
}

pub fn to_lsp_range(range: BridgeRange, document: &dyn DocumentText) -> Range {
    Range::new(
        to_lsp_position(range.start, document),
        to_lsp_position(range.end, document),
    )
}

/// Converts a bridge diagnostic to an LSP diagnostic.
pub fn to_lsp_diagnostic(diag: &BridgeDiagnostic, document: &dyn DocumentText) -> Diagnostic {
    let severity = match diag.severity {
        BridgeSeverity::Error => DiagnosticSeverity::ERROR,
        BridgeSeverity::Warning => DiagnosticSeverity::WARNING,
        BridgeSeverity::Information => DiagnosticSeverity::INFORMATION,
    };

    let tags: Vec<DiagnosticTag> = diag
        .tags
        .iter()
        .map(|tag| match tag {
            BridgeDiagnosticTag::Unnecessary => DiagnosticTag::UNNECESSARY,
            BridgeDiagnosticTag::Deprecated => DiagnosticTag::DEPRECATED,
        })
        .collect();

    Diagnostic {
        range: to_lsp_range(diag.range, document),
        severity: Some(severity),
        code: Some(NumberOrString::String(diag.code.clone())),
        code_description: Url::parse(&diag.help_uri)
            .ok()
            .map(|href| CodeDescription { href }),
        source: Some(diag.source.clone()),
        message: diag.message.clone(),
        tags: (!tags.is_empty()).then_some(tags),
        ..Default::default()
    }
}

pub fn to_lsp_edit(edit: &BridgeTextEdit, document: &dyn DocumentText) -> TextEdit {
    TextEdit {
        range: to_lsp_range(edit.range, document),
        new_text: edit.new_text.clone(),
    }
}

/// Converts a bridge code action into a quick fix editing `uri`.
pub fn to_lsp_code_action(
    action: &BridgeCodeAction,
    uri: &Url,
    document: &dyn DocumentText,
) -> CodeAction {
    let edits = action
        .edits
        .iter()
        .map(|edit| to_lsp_edit(edit, document))
        .collect();

    CodeAction {
        title: action.title.clone(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![to_lsp_diagnostic(&action.diagnostic, document)]),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(uri.clone(), edits)])),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Position just past the last character of `document`.
pub fn document_end(document: &dyn DocumentText) -> Position {
    let last = document.line_count().saturating_sub(1);
    let units = document
        .line(last)
        .map(|line| line.chars().map(|c| c.len_utf16() as u32).sum())
        .unwrap_or(0);
    Position::new(last, units)
}

/// Helper to compare Positions (p1 <= p2)
pub fn positions_le(p1: Position, p2: Position) -> bool {
    p1.line < p2.line || (p1.line == p2.line && p1.character <= p2.character)
}

/// Returns true if the two ranges share at least one position.
pub fn ranges_touch(a: &Range, b: &Range) -> bool {
    positions_le(a.start, b.end) && positions_le(b.start, a.end)
}

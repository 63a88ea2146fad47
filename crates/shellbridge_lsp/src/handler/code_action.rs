//! Code action handler for quick fixes and rule suppression.

use std::collections::{HashMap, HashSet};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::debug;

use shellbridge_core::suppression::disable_rule_action;
use shellbridge_core::{ParseResult, TextDocument, apply_actions};

use crate::conversion::{document_end, ranges_touch, to_lsp_code_action, to_lsp_range};
use crate::state::SharedState;

/// Handles the `textDocument/codeAction` request from the last results.
pub async fn handle_code_action(
    state: &SharedState,
    params: CodeActionParams,
) -> Result<Option<CodeActionResponse>> {
    let uri = &params.text_document.uri;
    debug!("Code action request: {}", uri);

    let Some(analysis) = state.analysis(uri) else {
        return Ok(None);
    };
    if state.document_text(uri).as_deref() != Some(analysis.text.as_str()) {
        debug!("Results for {} are outdated, no actions offered", uri);
        return Ok(None);
    }

    let (wants_fix_all, wants_quickfix) = match &params.context.only {
        Some(only) => (
            only.contains(&CodeActionKind::SOURCE_FIX_ALL),
            only.contains(&CodeActionKind::QUICKFIX),
        ),
        None => (true, true),
    };

    let document = TextDocument::new(&analysis.text);
    let mut actions = Vec::new();

    if wants_quickfix {
        let disable_rules = state.disable_rule_actions();
        add_quickfix_actions(
            &analysis.results,
            &document,
            uri,
            &params.range,
            disable_rules,
            &mut actions,
        );
    }

    if wants_fix_all {
        add_fix_all_action(&analysis.results, &analysis.text, &document, uri, &mut actions);
    }

    Ok(Some(actions))
}

fn add_quickfix_actions(
    results: &[ParseResult],
    document: &TextDocument<'_>,
    uri: &Url,
    request_range: &Range,
    disable_rules: bool,
    actions: &mut Vec<CodeActionOrCommand>,
) {
    let mut suppressed = HashSet::new();

    for result in results {
        let range = to_lsp_range(result.diagnostic.range, document);
        if !ranges_touch(&range, request_range) {
            continue;
        }

        if let Some(action) = &result.code_action {
            actions.push(CodeActionOrCommand::CodeAction(to_lsp_code_action(
                action, uri, document,
            )));
        }

        // One directive per rule and line is enough.
        let key = (result.diagnostic.range.start.line, &result.diagnostic.code);
        if disable_rules && suppressed.insert(key) {
            let action = disable_rule_action(&result.diagnostic, document);
            actions.push(CodeActionOrCommand::CodeAction(to_lsp_code_action(
                &action, uri, document,
            )));
        }
    }
}

/// Combines every non-overlapping quick fix into one document edit.
fn add_fix_all_action(
    results: &[ParseResult],
    text: &str,
    document: &TextDocument<'_>,
    uri: &Url,
    actions: &mut Vec<CodeActionOrCommand>,
) {
    let fixes: Vec<_> = results
        .iter()
        .filter_map(|result| result.code_action.as_ref())
        .collect();
    if fixes.is_empty() {
        return;
    }

    let fixed = apply_actions(text, &fixes);
    if !fixed.modified {
        return;
    }

    let edit = TextEdit {
        range: Range::new(Position::new(0, 0), document_end(document)),
        new_text: fixed.fixed_content,
    };
    let action = CodeAction {
        title: "Fix all auto-fixable ShellCheck issues".to_string(),
        kind: Some(CodeActionKind::SOURCE_FIX_ALL),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(uri.clone(), vec![edit])])),
            ..Default::default()
        }),
        ..Default::default()
    };
    actions.push(CodeActionOrCommand::CodeAction(action));
}

//! Application of code action edits to document text.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::BridgeError;
use crate::fix::{CodeAction, TextEdit};
use crate::position::{NormalizedPosition, Range};

/// Result of applying fixes to a file.
#[derive(Debug)]
pub struct FixerResult {
    /// Number of code actions applied.
    pub fixes_applied: usize,
    /// The fixed content.
    pub fixed_content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

impl FixerResult {
    /// Creates a new fixer result.
    pub fn new(fixes_applied: usize, fixed_content: String, modified: bool) -> Self {
        Self {
            fixes_applied,
            fixed_content,
            modified,
        }
    }

    /// Creates a result indicating no changes were made.
    pub fn unchanged(content: String) -> Self {
        Self {
            fixes_applied: 0,
            fixed_content: content,
            modified: false,
        }
    }
}

/// Byte offset of `position` in `text`.
///
/// Characters past the end of a line clamp to the line end, lines past the
/// end of the text clamp to the text end.
pub fn position_to_offset(text: &str, position: NormalizedPosition) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }

    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    let line = &text[line_start..line_end];
    let line = line.strip_suffix('\r').unwrap_or(line);

    line.char_indices()
        .nth(position.character as usize)
        .map_or(line_start + line.len(), |(i, _)| line_start + i)
}

/// Applies edits whose ranges all refer to the original `text`.
///
/// Edits are applied from the last start position to the first. Edits
/// starting at the same position keep their list order in the output.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut spans: Vec<(usize, usize, usize, &str)> = edits
        .iter()
        .enumerate()
        .map(|(index, edit)| {
            let start = position_to_offset(text, edit.range.start);
            let end = position_to_offset(text, edit.range.end).max(start);
            (start, end, index, edit.new_text.as_str())
        })
        .collect();
    spans.sort_by(|a, b| b.0.cmp(&a.0).then(b.2.cmp(&a.2)));

    let mut result = text.to_string();
    let mut limit = text.len();
    for (start, end, _, new_text) in spans {
        // Overlapping edits never reach past text already replaced.
        let end = end.min(limit);
        let start = start.min(end);
        result.replace_range(start..end, new_text);
        limit = start;
    }
    result
}

/// Range covered by all edits of an action.
fn action_extent(action: &CodeAction) -> Option<Range> {
    let start = action.edits.iter().map(|e| e.range.start).min()?;
    let end = action.edits.iter().map(|e| e.range.end).max()?;
    Some(Range::new(start, end))
}

/// Applies several code actions to content.
///
/// Actions are applied from the end of the document to the beginning;
/// an action overlapping one that was already applied is skipped.
pub fn apply_actions(content: &str, actions: &[&CodeAction]) -> FixerResult {
    let mut extents: Vec<(Range, &CodeAction)> = actions
        .iter()
        .filter_map(|action| action_extent(action).map(|extent| (extent, *action)))
        .collect();

    if extents.is_empty() {
        return FixerResult::unchanged(content.to_string());
    }

    extents.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    let mut result = content.to_string();
    let mut applied = 0;
    let mut lowest: Option<Range> = None;

    for (extent, action) in extents {
        if let Some(last) = lowest
            && !(extent.end <= last.start || extent.start >= last.end)
        {
            warn!(
                "Skipping overlapping fix for {} at {}:{}",
                action.diagnostic.code,
                extent.start.line + 1,
                extent.start.character + 1
            );
            continue;
        }

        debug!("Applying {}", action.title);
        result = apply_edits(&result, &action.edits);
        lowest = Some(extent);
        applied += 1;
    }

    let modified = result != content;
    FixerResult::new(applied, result, modified)
}

/// Applies code actions to a file and writes the result.
pub fn apply_actions_to_file(
    path: &Path,
    actions: &[&CodeAction],
) -> Result<FixerResult, BridgeError> {
    let content = fs::read_to_string(path)?;

    let result = apply_actions(&content, actions);

    if result.modified {
        fs::write(path, &result.fixed_content)?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Diagnostic, Severity};
    use crate::fix::CodeActionKind;
    use pretty_assertions::assert_eq;

    fn pos(line: u32, character: u32) -> NormalizedPosition {
        NormalizedPosition::new(line, character)
    }

    fn edit(start: NormalizedPosition, end: NormalizedPosition, text: &str) -> TextEdit {
        TextEdit::new(Range::new(start, end), text)
    }

    fn action(edits: Vec<TextEdit>) -> CodeAction {
        CodeAction {
            title: "Apply fix for SC2086".to_string(),
            kind: CodeActionKind::QuickFix,
            diagnostic: Diagnostic {
                range: edits[0].range,
                message: "Double quote to prevent globbing and word splitting.".to_string(),
                severity: Severity::Information,
                source: "shellcheck".to_string(),
                code: "SC2086".to_string(),
                help_uri: "https://www.shellcheck.net/wiki/SC2086".to_string(),
                tags: Vec::new(),
            },
            edits,
        }
    }

    #[test]
    fn test_position_to_offset() {
        let text = "echo é\r\n\tls\n";
        assert_eq!(position_to_offset(text, pos(0, 0)), 0);
        assert_eq!(position_to_offset(text, pos(0, 5)), 5);
        assert_eq!(position_to_offset(text, pos(0, 6)), 7);
        assert_eq!(position_to_offset(text, pos(0, 99)), 7);
        assert_eq!(position_to_offset(text, pos(1, 1)), 10);
        assert_eq!(position_to_offset(text, pos(2, 0)), 13);
        assert_eq!(position_to_offset(text, pos(9, 0)), 13);
    }

    #[test]
    fn test_reversed_insertions_quote_variable() {
        let edits = vec![
            edit(pos(0, 9), pos(0, 9), "\""),
            edit(pos(0, 5), pos(0, 5), "\""),
        ];
        assert_eq!(apply_edits("echo $foo", &edits), "echo \"$foo\"");
    }

    #[test]
    fn test_edits_resolve_against_original_text() {
        let edits = vec![
            edit(pos(0, 5), pos(0, 5), "\""),
            edit(pos(0, 9), pos(0, 9), "\""),
        ];
        assert_eq!(apply_edits("echo $foo", &edits), "echo \"$foo\"");
    }

    #[test]
    fn test_insertions_at_same_point_keep_order() {
        let edits = vec![
            edit(pos(0, 5), pos(0, 5), "a"),
            edit(pos(0, 5), pos(0, 5), "b"),
        ];
        assert_eq!(apply_edits("echo $foo", &edits), "echo ab$foo");
    }

    #[test]
    fn test_replacement_edit() {
        let edits = vec![edit(pos(1, 1), pos(1, 3), "ls -1")];
        assert_eq!(apply_edits("#!/bin/sh\n\tls\n", &edits), "#!/bin/sh\n\tls -1\n");
    }

    #[test]
    fn test_apply_actions_back_to_front() {
        let content = "echo $a $b";
        let first = action(vec![
            edit(pos(0, 7), pos(0, 7), "\""),
            edit(pos(0, 5), pos(0, 5), "\""),
        ]);
        let second = action(vec![
            edit(pos(0, 10), pos(0, 10), "\""),
            edit(pos(0, 8), pos(0, 8), "\""),
        ]);

        let result = apply_actions(content, &[&first, &second]);

        assert_eq!(result.fixed_content, "echo \"$a\" \"$b\"");
        assert_eq!(result.fixes_applied, 2);
        assert!(result.modified);
    }

    #[test]
    fn test_apply_actions_with_ascending_edits() {
        let fix = action(vec![
            edit(pos(0, 5), pos(0, 5), "\""),
            edit(pos(0, 9), pos(0, 9), "\""),
        ]);

        let result = apply_actions("echo $foo", &[&fix]);
        assert_eq!(result.fixed_content, "echo \"$foo\"");
    }

    #[test]
    fn test_overlapping_actions_are_skipped() {
        let content = "echo $foo";
        let a = action(vec![edit(pos(0, 5), pos(0, 9), "\"$foo\"")]);
        let b = action(vec![edit(pos(0, 6), pos(0, 9), "{foo}")]);

        let result = apply_actions(content, &[&a, &b]);

        assert_eq!(result.fixes_applied, 1);
        assert_eq!(result.fixed_content, "echo ${foo}");
    }

    #[test]
    fn test_no_actions_returns_unchanged() {
        let result = apply_actions("echo", &[]);
        assert_eq!(result.fixed_content, "echo");
        assert_eq!(result.fixes_applied, 0);
        assert!(!result.modified);
    }

    #[test]
    fn test_apply_actions_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");
        std::fs::write(&path, "echo $foo\n").unwrap();

        let fix = action(vec![
            edit(pos(0, 9), pos(0, 9), "\""),
            edit(pos(0, 5), pos(0, 5), "\""),
        ]);
        let result = apply_actions_to_file(&path, &[&fix]).unwrap();

        assert!(result.modified);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "echo \"$foo\"\n"
        );
    }
}

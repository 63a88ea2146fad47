//! Read-only access to the text positions are computed against.

/// Line-addressed view of a document.
///
/// Implementations must return the exact text ShellCheck analysed; a stale
/// view produces wrong tab corrections.
pub trait DocumentText {
    /// Returns the text of a 0-based line without its line terminator.
    fn line(&self, line: u32) -> Option<&str>;

    /// Number of lines in the document.
    fn line_count(&self) -> u32;
}

/// An in-memory document split into lines.
#[derive(Debug, Clone)]
pub struct TextDocument<'a> {
    lines: Vec<&'a str>,
}

impl<'a> TextDocument<'a> {
    /// Creates a document view over `text`.
    ///
    /// Both `\n` and `\r\n` terminate a line.
    pub fn new(text: &'a str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Self { lines }
    }
}

impl DocumentText for TextDocument<'_> {
    fn line(&self, line: u32) -> Option<&str> {
        self.lines.get(line as usize).copied()
    }

    fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }
}

//! Conversion of tool coordinates into document positions.

use serde::{Deserialize, Serialize};

use crate::document::DocumentText;

/// Display width ShellCheck's legacy `json` format assigns to a tab.
pub const LEGACY_TAB_WIDTH: u32 = 8;

/// A 0-based position in a document, counted in characters.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NormalizedPosition {
    pub line: u32,
    pub character: u32,
}

impl NormalizedPosition {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A start/end pair of positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: NormalizedPosition,
    pub end: NormalizedPosition,
}

impl Range {
    pub fn new(start: NormalizedPosition, end: NormalizedPosition) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `position`.
    pub fn point(position: NormalizedPosition) -> Self {
        Self::new(position, position)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the two ranges share a position. Touching ends count.
    pub fn intersects(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns true if the two ranges share characters. Touching ends and
    /// insertions at the same point do not overlap.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Strategy converting a 1-based tool coordinate into a document position.
pub trait PositionNormalizer: Send + Sync {
    /// Normalizes a single 1-based `(line, column)` pair.
    ///
    /// Never panics for coordinates outside the document.
    fn normalize(&self, line: u32, column: u32, document: &dyn DocumentText)
    -> NormalizedPosition;

    /// Normalizes a range given by two 1-based coordinates.
    ///
    /// Equal endpoints are normalized once and shared.
    fn normalize_range(
        &self,
        start: (u32, u32),
        end: (u32, u32),
        document: &dyn DocumentText,
    ) -> Range {
        let start_pos = self.normalize(start.0, start.1, document);
        if start == end {
            return Range::point(start_pos);
        }
        let end_pos = self.normalize(end.0, end.1, document);
        // An end before the start can only come from inconsistent tool output.
        Range::new(start_pos, end_pos.max(start_pos))
    }
}

/// Normalizer for the `json` format, which counts every tab as
/// [`LEGACY_TAB_WIDTH`] columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabExpandingNormalizer;

impl PositionNormalizer for TabExpandingNormalizer {
    fn normalize(
        &self,
        line: u32,
        column: u32,
        document: &dyn DocumentText,
    ) -> NormalizedPosition {
        let line = line.saturating_sub(1);
        let expanded = column.saturating_sub(1);

        let Some(text) = document.line(line) else {
            return NormalizedPosition::new(line, expanded);
        };

        let mut consumed = 0u32;
        let mut character = 0u32;
        for ch in text.chars() {
            let width = if ch == '\t' { LEGACY_TAB_WIDTH } else { 1 };
            if consumed + width > expanded {
                // Inside the line; a column in the middle of a tab snaps to its start.
                return NormalizedPosition::new(line, character);
            }
            consumed += width;
            character += 1;
        }

        // Past the end of the line every tab still accounts for 7 extra columns.
        NormalizedPosition::new(line, character + (expanded - consumed))
    }
}

/// Normalizer for the `json1` format, whose columns are already characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterNormalizer;

impl PositionNormalizer for CharacterNormalizer {
    fn normalize(
        &self,
        line: u32,
        column: u32,
        _document: &dyn DocumentText,
    ) -> NormalizedPosition {
        NormalizedPosition::new(line.saturating_sub(1), column.saturating_sub(1))
    }
}

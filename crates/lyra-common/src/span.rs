use std::fmt;
use std::ops::Range;

use rowan::{TextRange, TextSize};
use serde::Serialize;

/// A 1-based line/column pair. Columns count bytes from the start of the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Where a node lives in its source document.
///
/// `start`/`end` are the human-facing positions used in messages and by
/// editor tooling; `range` is the byte range used for diagnostics rendering
/// and as the key of the checker's expression-type table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub file: Option<String>,
    pub start: Position,
    pub end: Position,
    #[serde(skip)]
    pub range: TextRange,
}

impl Location {
    pub fn new(file: Option<String>, range: TextRange, start: Position, end: Position) -> Self {
        Self {
            file,
            start,
            end,
            range,
        }
    }

    /// Build a location from byte offsets, computing positions with `index`.
    pub fn from_offsets(file: Option<String>, start: u32, end: u32, index: &LineIndex) -> Self {
        debug_assert!(start <= end, "location start ({start}) must be <= end ({end})");
        let (sl, sc) = index.line_col(start);
        let (el, ec) = index.line_col(end);
        Self {
            file,
            start: Position::new(sl, sc),
            end: Position::new(el, ec),
            range: TextRange::new(TextSize::from(start), TextSize::from(end)),
        }
    }

    /// Byte range as a `Range<usize>`, the form ariadne labels expect.
    pub fn span(&self) -> Range<usize> {
        let start: usize = self.range.start().into();
        let end: usize = self.range.end().into();
        start..end
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}", file, self.start),
            None => write!(f, "{}", self.start),
        }
    }
}

/// Pre-computed index of line start positions for on-demand line/column lookup.
///
/// Constructed once per source text, then used to convert byte offsets to
/// (line, column) pairs via binary search.
#[derive(Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line. The first entry is always 0.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based (line, column) pair.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        // partition_point yields the first line starting after `offset`.
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line = (line_idx as u32) + 1;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_index_single_line() {
        let idx = LineIndex::new("let x");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(4), (1, 5));
    }

    #[test]
    fn line_index_multiple_lines() {
        let idx = LineIndex::new("let x\nlet y\nfib");
        assert_eq!(idx.line_col(6), (2, 1));
        assert_eq!(idx.line_col(12), (3, 1));
        assert_eq!(idx.line_col(13), (3, 2));
    }

    #[test]
    fn newline_belongs_to_its_line() {
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.line_col(2), (1, 3));
        assert_eq!(idx.line_col(3), (2, 1));
    }

    #[test]
    fn location_from_offsets() {
        let idx = LineIndex::new("let x = 1\nlet x = 2");
        let loc = Location::from_offsets(Some("main.lyra".into()), 10, 19, &idx);
        assert_eq!(loc.start, Position::new(2, 1));
        assert_eq!(loc.end, Position::new(2, 10));
        assert_eq!(loc.span(), 10..19);
        assert_eq!(loc.to_string(), "main.lyra:2:1");
    }
}

//! Span and position types for source locations.

use rowan::TextRange;
use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// Uses 1-indexed lines and 0-indexed columns. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A span representing a range in source text.
///
/// Uses byte offsets (0-indexed) for efficient slicing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Span {
    /// Start byte offset (0-indexed, inclusive).
    pub start: u32,
    /// End byte offset (0-indexed, exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    #[inline]
    pub const fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Merges two spans into one that covers both.
    #[inline]
    pub const fn merge(&self, other: &Span) -> Span {
        Span {
            start: if self.start < other.start {
                self.start
            } else {
                other.start
            },
            end: if self.end > other.end {
                self.end
            } else {
                other.end
            },
        }
    }

    /// Returns the slice of `source` covered by this span, if in bounds.
    #[inline]
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start as usize..self.end as usize)
    }
}

impl From<TextRange> for Span {
    #[inline]
    fn from(range: TextRange) -> Self {
        Self::new(range.start().into(), range.end().into())
    }
}

/// Location information combining start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl Location {
    /// Creates a new location.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset where each line starts. Always starts with 0.
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    /// Builds the index for `text`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset into a position. Offsets past the end clamp
    /// to the end of the text.
    pub fn position(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line as u32 + 1, offset - self.line_starts[line])
    }

    /// Converts a span into a location.
    pub fn location(&self, span: Span) -> Location {
        Location::new(self.position(span.start), self.position(span.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::TextSize;

    #[test]
    fn test_position() {
        let pos = Position::new(1, 0);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 0);
    }

    #[test]
    fn test_span() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(15));
        assert!(!span.contains(5));
        assert!(!span.contains(20));
    }

    #[test]
    fn test_from_text_range() {
        let range = TextRange::new(TextSize::from(3), TextSize::from(9));
        assert_eq!(Span::from(range), Span::new(3, 9));
    }

    #[test]
    fn test_span_merge() {
        let span1 = Span::new(10, 20);
        let span2 = Span::new(15, 30);
        let merged = span1.merge(&span2);
        assert_eq!(merged.start, 10);
        assert_eq!(merged.end, 30);
    }

    #[test]
    fn test_span_merge_reversed_order() {
        let merged = Span::new(20, 30).merge(&Span::new(10, 15));
        assert_eq!(merged, Span::new(10, 30));
    }

    #[test]
    fn test_empty_span_contains() {
        let span = Span::new(5, 5);
        // Empty span contains nothing
        assert!(!span.contains(5));
        assert!(span.is_empty());
    }

    #[test]
    fn test_contains_span() {
        let outer = Span::new(0, 100);
        assert!(outer.contains_span(&Span::new(20, 30)));
        assert!(outer.contains_span(&outer));
        assert!(!Span::new(20, 30).contains_span(&outer));
    }

    #[test]
    fn test_span_slice() {
        let source = "string text = null!;";
        assert_eq!(Span::new(14, 19).slice(source), Some("null!"));
        assert_eq!(Span::new(14, 99).slice(source), None);
    }

    #[test]
    fn test_span_serialization() {
        let span = Span::new(10, 20);
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(json, r#"{"start":10,"end":20}"#);
    }

    #[test]
    fn test_location_deserialization() {
        let json = r#"{"start":{"line":1,"column":0},"end":{"line":2,"column":3}}"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert_eq!(loc, Location::new(Position::new(1, 0), Position::new(2, 3)));
    }

    #[test]
    fn test_line_index_positions() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(0), Position::new(1, 0));
        assert_eq!(index.position(2), Position::new(1, 2));
        assert_eq!(index.position(3), Position::new(2, 0));
        assert_eq!(index.position(6), Position::new(3, 0));
        assert_eq!(index.position(8), Position::new(4, 1));
    }

    #[test]
    fn test_line_index_clamps_past_end() {
        let index = LineIndex::new("abc");
        assert_eq!(index.position(100), Position::new(1, 3));
    }

    #[test]
    fn test_line_index_location() {
        let index = LineIndex::new("x\nstring s = null!;");
        let loc = index.location(Span::new(13, 18));
        assert_eq!(loc.start, Position::new(2, 11));
        assert_eq!(loc.end, Position::new(2, 16));
    }
}

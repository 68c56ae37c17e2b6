//! Source positions and byte-offset to line/column mapping

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line/column position in a document
///
/// `0/0` is the sentinel for "no known position", used for diagnostics
/// synthesised at end of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based, 0 when unknown)
    pub line: usize,
    /// Column number in characters (1-based, 0 when unknown)
    pub column: usize,
}

impl Position {
    /// The sentinel position for diagnostics without a source location
    pub const UNKNOWN: Position = Position { line: 0, column: 0 };

    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Whether this position points into the document
    pub fn is_known(&self) -> bool {
        *self != Self::UNKNOWN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Precomputed line starts for mapping byte offsets to positions
///
/// Lookups remember where the previous one ended, so a caller walking the
/// text front to back pays for each character once.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
    cursor: Cursor,
}

/// The last resolved offset with its 0-based line and character column
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> LineIndex<'a> {
    /// Index the line starts of `text`
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            text,
            line_starts,
            cursor: Cursor::default(),
        }
    }

    /// Map a byte offset to a 1-based position
    ///
    /// Offsets past the end clamp to the end of the text; offsets inside a
    /// multi-byte character resolve to the character that contains them.
    pub fn position(&mut self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };

        let (from, counted) = if self.cursor.line == line && self.cursor.offset <= offset {
            (self.cursor.offset, self.cursor.column)
        } else {
            (self.line_starts[line], 0)
        };
        let column = counted + self.text[from..offset].chars().count();

        self.cursor = Cursor {
            offset,
            line,
            column,
        };
        Position::new(line + 1, column + 1)
    }
}

//! Source locations.

use std::fmt;

/// A location in the source document.
///
/// Lines and columns are 1-based, columns count characters (not bytes), and
/// `offset` is the 0-based byte offset into the input. The all-zero position
/// is used for values that did not come from a document, see
/// [`Position::is_known`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    /// Position of values built in memory rather than parsed.
    pub const UNKNOWN: Position = Position {
        line: 0,
        column: 0,
        offset: 0,
    };

    /// The first character of a document.
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }

    /// Whether this position points into a document.
    #[inline]
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}, column {}", self.line, self.column)
        } else {
            f.write_str("unknown position")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Position::new(3, 7, 20).to_string(), "line 3, column 7");
        assert_eq!(Position::UNKNOWN.to_string(), "unknown position");
    }

    #[test]
    fn test_ordering_follows_offset() {
        assert!(Position::new(1, 5, 4) < Position::new(2, 1, 10));
    }
}

use std::fmt;

use crate::token::Token;

/// Represents a region of source code with start and end positions.
/// Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Span {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Create a single-point span (for when we only have a position, not a range)
    pub fn point(line: usize, column: usize) -> Self {
        Self::new(line, column, line, column)
    }

    pub fn line(&self) -> usize {
        self.start_line
    }

    pub fn column(&self) -> usize {
        self.start_column
    }

    /// Number of columns covered when the span sits on one line.
    pub fn width(&self) -> usize {
        if self.start_line == self.end_line && self.end_column >= self.start_column {
            self.end_column - self.start_column + 1
        } else {
            1
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// Trait for types that can provide source location information
pub trait HasSourceLocation {
    fn get_span(&self) -> Span;
}

impl HasSourceLocation for Token {
    fn get_span(&self) -> Span {
        Span::new(
            self.line,
            self.column,
            self.line,
            self.column + self.length.max(1) - 1,
        )
    }
}

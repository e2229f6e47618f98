//! Scanner tokens.
//!
//! The token set is deliberately small. `#`, `.` and `:` always come out
//! as [`Token::Delim`] so that `#ok`, `.5` or `:focus` are never mistaken
//! for hash colors, floats or labels; the parsers decide what they mean.

use core::fmt;

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line, starting at 1.
    pub line: u32,
    /// Column, starting at 1.
    pub column: u32,
}

impl Position {
    /// The first character of an input.
    pub const START: Self = Self { line: 1, column: 1 };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A scanner token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier: starts with a letter, `_` or a non-ASCII character and
    /// continues with those, digits or `-`.
    Ident(String),
    /// Run of digits, optionally with one decimal point between digits.
    Number(String),
    /// Quoted string, quotes removed.
    String(String),
    /// One or more whitespace characters or comments.
    Whitespace,
    /// Any other single character.
    Delim(char),
    /// End of input.
    Eof,
}

impl Token {
    /// Check if this is the end-of-input token.
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Check if this is the delimiter `c`.
    pub fn is_delim(&self, c: char) -> bool {
        matches!(self, Self::Delim(d) if *d == c)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(s) | Self::Number(s) => f.write_str(s),
            Self::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Self::Whitespace => f.write_str(" "),
            Self::Delim(c) => write!(f, "{c}"),
            Self::Eof => Ok(()),
        }
    }
}

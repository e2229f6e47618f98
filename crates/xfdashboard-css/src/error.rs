//! Errors raised while parsing selectors and stylesheets.

use thiserror::Error;

/// A selector or stylesheet failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssError {
    /// Malformed input at the given position.
    #[error("{source_name}:{line}:{column}: {message}")]
    Parse {
        /// Name of the input (file name or a placeholder for strings).
        source_name: String,
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
        /// Human-readable description.
        message: String,
    },
}

impl CssError {
    /// Line and column of the error.
    pub const fn position(&self) -> (u32, u32) {
        match self {
            Self::Parse { line, column, .. } => (*line, *column),
        }
    }
}

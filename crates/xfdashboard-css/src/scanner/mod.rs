//! Scanner shared by the selector and stylesheet parsers.

/// Token types produced by the scanner.
pub mod token;
/// Scanner implementation.
#[allow(clippy::module_inception)]
pub mod scanner;

pub use scanner::Scanner;
pub use token::{Position, Token};

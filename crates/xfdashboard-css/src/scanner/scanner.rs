use super::token::{Position, Token};
use crate::error::CssError;

/// Pull scanner with one token of lookahead.
///
/// A single scanner can be handed from the stylesheet parser to the
/// selector parser and back; each parser consumes exactly the tokens it
/// understands and leaves the rest for its caller.
pub struct Scanner {
    /// The input being scanned
    input: Vec<char>,
    /// Index of the next unread character
    position: usize,
    /// Line/column of the next unread character
    cursor: Position,
    /// Name used in error messages
    source_name: String,
    /// Lookahead token and where it started
    peeked: Option<(Token, Position)>,
}

impl Scanner {
    /// Create a scanner over `input`; `source_name` appears in errors.
    pub fn new(input: &str, source_name: impl Into<String>) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            cursor: Position::START,
            source_name: source_name.into(),
            peeked: None,
        }
    }

    /// Name of the input used in error messages.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        &self.fill().0
    }

    /// Where the next token starts.
    pub fn peek_position(&mut self) -> Position {
        self.fill().1
    }

    /// Consume and return the next token with its start position.
    pub fn next_token(&mut self) -> (Token, Position) {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.scan(),
        }
    }

    /// Consume whitespace tokens. Returns whether any were skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while matches!(self.peek(), Token::Whitespace) {
            let _ = self.next_token();
            skipped = true;
        }
        skipped
    }

    /// Consume the next token if it is the delimiter `c`.
    pub fn eat_delim(&mut self, c: char) -> bool {
        if self.peek().is_delim(c) {
            let _ = self.next_token();
            true
        } else {
            false
        }
    }

    /// Build a parse error at `position`.
    pub fn error_at(&self, position: Position, message: impl Into<String>) -> CssError {
        CssError::Parse {
            source_name: self.source_name.clone(),
            line: position.line,
            column: position.column,
            message: message.into(),
        }
    }

    /// Build a parse error at the start of the next token.
    pub fn error(&mut self, message: impl Into<String>) -> CssError {
        let position = self.peek_position();
        self.error_at(position, message)
    }

    fn fill(&mut self) -> &(Token, Position) {
        let peeked = match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.scan(),
        };
        self.peeked.insert(peeked)
    }

    fn scan(&mut self) -> (Token, Position) {
        let start = self.cursor;

        let Some(c) = self.consume() else {
            return (Token::Eof, start);
        };

        let token = match c {
            // Comments count as whitespace so "a/**/b" stays two compounds
            c if is_whitespace(c) || (c == '/' && self.peek_char() == Some('*')) => {
                if c == '/' {
                    self.consume_comment_body();
                }
                self.consume_whitespace_and_comments();
                Token::Whitespace
            }

            '"' | '\'' => Token::String(self.consume_string(c)),

            c if c.is_ascii_digit() => {
                let mut value = String::from(c);
                self.consume_digits(&mut value);
                if self.peek_char() == Some('.')
                    && self.peek_char_at(1).is_some_and(|d| d.is_ascii_digit())
                {
                    let _ = self.consume();
                    value.push('.');
                    self.consume_digits(&mut value);
                }
                Token::Number(value)
            }

            c if is_ident_start(c) => {
                let mut value = String::from(c);
                while let Some(next) = self.peek_char().filter(|&n| is_ident_char(n)) {
                    let _ = self.consume();
                    value.push(next);
                }
                Token::Ident(value)
            }

            c => Token::Delim(c),
        };

        (token, start)
    }

    fn consume(&mut self) -> Option<char> {
        let c = *self.input.get(self.position)?;
        self.position += 1;
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        Some(c)
    }

    fn peek_char(&self) -> Option<char> {
        self.peek_char_at(0)
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn consume_digits(&mut self, value: &mut String) {
        while let Some(d) = self.peek_char().filter(char::is_ascii_digit) {
            let _ = self.consume();
            value.push(d);
        }
    }

    /// Consume the rest of a comment whose opening `/` was already read.
    fn consume_comment_body(&mut self) {
        let _ = self.consume(); // *
        loop {
            match self.consume() {
                Some('*') if self.peek_char() == Some('/') => {
                    let _ = self.consume();
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }
    }

    fn consume_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if is_whitespace(c) => {
                    let _ = self.consume();
                }
                Some('/') if self.peek_char_at(1) == Some('*') => {
                    let _ = self.consume();
                    self.consume_comment_body();
                }
                _ => break,
            }
        }
    }

    /// Consume a quoted string whose opening quote was already read.
    /// An unterminated string runs to the end of input.
    fn consume_string(&mut self, quote: char) -> String {
        let mut value = String::new();
        while let Some(c) = self.consume() {
            match c {
                c if c == quote => break,
                '\\' => {
                    if let Some(escaped) = self.consume() {
                        value.push(escaped);
                    }
                }
                c => value.push(c),
            }
        }
        value
    }
}

const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Identifier start: letter, underscore or non-ASCII. A leading `-` is not
/// accepted so `-` can only ever appear inside a name.
const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

const fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(input, "test");
        let mut out = Vec::new();
        loop {
            let (token, _) = scanner.next_token();
            if token.is_eof() {
                break;
            }
            out.push(token);
        }
        out
    }

    #[test]
    fn test_hash_and_dot_are_delims() {
        assert_eq!(
            tokens("#ok.primary"),
            vec![
                Token::Delim('#'),
                Token::Ident("ok".into()),
                Token::Delim('.'),
                Token::Ident("primary".into()),
            ]
        );
    }

    #[test]
    fn test_dash_inside_identifier() {
        assert_eq!(
            tokens("view-selector"),
            vec![Token::Ident("view-selector".into())]
        );
        assert_eq!(
            tokens("-x"),
            vec![Token::Delim('-'), Token::Ident("x".into())]
        );
    }

    #[test]
    fn test_numbers_do_not_swallow_dots_without_digits() {
        assert_eq!(
            tokens("1.5 2."),
            vec![
                Token::Number("1.5".into()),
                Token::Whitespace,
                Token::Number("2".into()),
                Token::Delim('.'),
            ]
        );
    }

    #[test]
    fn test_comments_collapse_into_whitespace() {
        assert_eq!(
            tokens("a /* x */ b/**/c"),
            vec![
                Token::Ident("a".into()),
                Token::Whitespace,
                Token::Ident("b".into()),
                Token::Whitespace,
                Token::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn test_positions_track_lines() {
        let mut scanner = Scanner::new("a\n  b", "test");
        assert_eq!(scanner.next_token().1, Position { line: 1, column: 1 });
        let _ = scanner.next_token();
        assert_eq!(scanner.next_token().1, Position { line: 2, column: 3 });
    }

    #[test]
    fn test_strings_unescape() {
        assert_eq!(
            tokens(r#""a\"b" 'c'"#),
            vec![
                Token::String("a\"b".into()),
                Token::Whitespace,
                Token::String("c".into()),
            ]
        );
    }
}

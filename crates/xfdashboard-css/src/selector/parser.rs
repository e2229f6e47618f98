//! Recursive-descent selector parser.
//!
//! ```text
//! selector   := simple (combinator simple)*
//! simple     := (type | '*')? ('#' id)? ('.' class)* (':' pseudo-class)*
//! combinator := '>' | whitespace
//! ```
//!
//! A second `#id` inside one simple selector does not fail: it ends that
//! segment and starts a new one joined by an implicit ancestor combinator.

use super::{ParentMode, SelectorRule};
use crate::error::CssError;
use crate::scanner::{Scanner, Token};

/// Parse a rule chain starting at the scanner's current position.
///
/// On return the scanner is positioned at the first token that can not
/// continue the selector (whitespace before it has been consumed).
pub(super) fn parse_rule_chain(
    scanner: &mut Scanner,
    priority: i32,
) -> Result<SelectorRule, CssError> {
    let _ = scanner.skip_whitespace();

    let mut chain: Option<SelectorRule> = None;
    let mut pending = ParentMode::None;

    loop {
        let Some(mut rule) = parse_simple(scanner, priority)? else {
            let found = scanner.peek().clone();
            let message = if chain.is_none() {
                format!("expected selector but found '{found}'")
            } else {
                format!("expected selector after '>' but found '{found}'")
            };
            return Err(scanner.error(message));
        };

        if let Some(previous) = chain.take() {
            rule.link(pending, previous);
        }
        chain = Some(rule);

        let had_whitespace = scanner.skip_whitespace();
        match scanner.peek() {
            Token::Delim('>') => {
                let _ = scanner.next_token();
                let _ = scanner.skip_whitespace();
                pending = ParentMode::DirectParent;
            }
            // Duplicate id: "#a#b" behaves like "#a #b"
            Token::Delim('#') => pending = ParentMode::Ancestor,
            token if had_whitespace && starts_simple(token) => pending = ParentMode::Ancestor,
            _ => break,
        }
    }

    chain.ok_or_else(|| scanner.error("empty selector"))
}

/// Whether `token` can begin a simple selector.
fn starts_simple(token: &Token) -> bool {
    matches!(token, Token::Ident(_)) || matches!(token, Token::Delim('*' | '#' | '.' | ':'))
}

/// Parse one simple selector. Returns `None` if the next token does not
/// start one.
fn parse_simple(scanner: &mut Scanner, priority: i32) -> Result<Option<SelectorRule>, CssError> {
    let start = scanner.peek_position();
    let source_name = scanner.source_name().to_string();
    let mut rule = SelectorRule::new(&source_name, priority, start);

    // Type or universal selector
    match scanner.peek() {
        Token::Ident(name) => {
            rule.type_name = Some(name.clone());
            let _ = scanner.next_token();
        }
        Token::Delim('*') => {
            rule.type_name = Some("*".to_string());
            let _ = scanner.next_token();
        }
        _ => {}
    }

    // Id, classes and pseudo-classes. An id may only precede classes, but
    // older themes put it anywhere, so accept it at any point once.
    loop {
        match scanner.peek() {
            Token::Delim('#') if rule.id.is_some() => break,
            Token::Delim('#') => {
                let _ = scanner.next_token();
                rule.id = Some(expect_ident(scanner, "id")?);
            }
            Token::Delim('.') => {
                let _ = scanner.next_token();
                rule.classes.push(expect_ident(scanner, "class name")?);
            }
            Token::Delim(':') => {
                let _ = scanner.next_token();
                rule.pseudo_classes.push(expect_ident(scanner, "pseudo-class name")?);
            }
            _ => break,
        }
    }

    if rule.is_empty() {
        return Ok(None);
    }
    Ok(Some(rule))
}

/// Consume an identifier immediately following a `#`, `.` or `:`.
fn expect_ident(scanner: &mut Scanner, what: &str) -> Result<String, CssError> {
    match scanner.peek() {
        Token::Ident(name) => {
            let name = name.clone();
            let _ = scanner.next_token();
            Ok(name)
        }
        found => {
            let found = found.clone();
            Err(scanner.error(format!("expected {what} but found '{found}'")))
        }
    }
}

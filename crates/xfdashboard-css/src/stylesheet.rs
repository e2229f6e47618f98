//! Theme stylesheets.
//!
//! A stylesheet is a list of rulesets:
//!
//! ```text
//! ruleset     := selector (',' selector)* '{' declaration* '}'
//! declaration := name ':' value (';' | before '}')
//! ```
//!
//! Selectors are read with [`Selector::parse_from_scanner`] on the same
//! scanner, stopping at `,` or `{`.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CssError;
use crate::scanner::{Scanner, Token};
use crate::selector::Selector;
use crate::stylable::Stylable;

/// One `name: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name.
    pub name: String,
    /// Value text with whitespace runs collapsed.
    pub value: String,
    /// Line of the property name.
    pub line: u32,
    /// Column of the property name.
    pub column: u32,
}

/// Selectors sharing one declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Comma-separated selectors.
    pub selectors: Vec<Selector>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

/// A property value after the cascade, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledValue {
    /// The winning value.
    pub value: String,
    /// Text of the selector that supplied it.
    pub selector: String,
    /// That selector's score against the node.
    pub score: i32,
    /// Stylesheet the value came from.
    pub source_name: String,
}

/// Cascaded properties keyed by name.
pub type StyleMap = BTreeMap<String, StyledValue>;

/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    /// Name used in error messages and [`StyledValue::source_name`].
    pub source_name: String,
    /// Priority given to every selector in the sheet.
    pub priority: i32,
    /// Rulesets in source order.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Parse `text`. The first malformed ruleset aborts the whole sheet.
    pub fn parse(text: &str, source_name: &str, priority: i32) -> Result<Self, CssError> {
        let mut scanner = Scanner::new(text, source_name);
        let mut rules = Vec::new();

        loop {
            let _ = scanner.skip_whitespace();
            match scanner.peek() {
                Token::Eof => break,
                Token::Delim('@') => return Err(scanner.error("at-rules are not supported")),
                _ => rules.push(parse_ruleset(&mut scanner, priority)?),
            }
        }

        tracing::debug!(source = source_name, rules = rules.len(), "parsed stylesheet");
        Ok(Self {
            source_name: source_name.to_string(),
            priority,
            rules,
        })
    }

    /// Cascade this sheet alone for `node`.
    pub fn properties_for<N: Stylable>(&self, node: &N) -> StyleMap {
        cascade(std::slice::from_ref(self), node)
    }
}

/// An ordered collection of stylesheets.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    sheets: Vec<Stylesheet>,
}

impl Theme {
    /// Create an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already parsed sheet.
    pub fn add_stylesheet(&mut self, sheet: Stylesheet) {
        self.sheets.push(sheet);
    }

    /// Parse and add a sheet. On error the theme is unchanged.
    pub fn add_from_str(
        &mut self,
        text: &str,
        source_name: &str,
        priority: i32,
    ) -> Result<(), CssError> {
        let sheet = Stylesheet::parse(text, source_name, priority)?;
        self.sheets.push(sheet);
        Ok(())
    }

    /// Sheets in the order they were added.
    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.sheets
    }

    /// Cascade every sheet for `node`.
    pub fn properties_for<N: Stylable>(&self, node: &N) -> StyleMap {
        cascade(&self.sheets, node)
    }
}

/// A ruleset that matched, with its best selector.
struct MatchedRule<'a> {
    score: i32,
    priority: i32,
    order: (usize, usize),
    selector: &'a Selector,
    rule: &'a StyleRule,
    source_name: &'a str,
}

/// Merge matching declarations for `node`.
///
/// Matches are applied in ascending score order so the best score wins.
/// Equal scores fall back to priority, where the lower value is applied
/// last and wins, then to source order.
fn cascade<N: Stylable>(sheets: &[Stylesheet], node: &N) -> StyleMap {
    let mut matched: Vec<MatchedRule<'_>> = Vec::new();

    for (sheet_index, sheet) in sheets.iter().enumerate() {
        for (rule_index, rule) in sheet.rules.iter().enumerate() {
            let best = rule
                .selectors
                .iter()
                .map(|selector| (selector.score(node), selector))
                .filter(|(score, _)| *score >= 0)
                .max_by_key(|(score, _)| *score);

            if let Some((score, selector)) = best {
                matched.push(MatchedRule {
                    score,
                    priority: selector.priority(),
                    order: (sheet_index, rule_index),
                    selector,
                    rule,
                    source_name: &sheet.source_name,
                });
            }
        }
    }

    matched.sort_by_key(|m| (m.score, Reverse(m.priority), m.order));

    let mut styles = StyleMap::new();
    for m in &matched {
        for declaration in &m.rule.declarations {
            let _ = styles.insert(
                declaration.name.clone(),
                StyledValue {
                    value: declaration.value.clone(),
                    selector: m.selector.to_string(),
                    score: m.score,
                    source_name: m.source_name.to_string(),
                },
            );
        }
    }
    tracing::trace!(matched = matched.len(), properties = styles.len(), "cascaded styles");
    styles
}

fn parse_ruleset(scanner: &mut Scanner, priority: i32) -> Result<StyleRule, CssError> {
    let mut selectors = Vec::new();
    loop {
        let selector = Selector::parse_from_scanner(scanner, priority, |token| {
            token.is_delim(',') || token.is_delim('{')
        })?;
        selectors.push(selector);
        if !scanner.eat_delim(',') {
            break;
        }
    }
    // parse_from_scanner only stops on ',' or '{'
    let _ = scanner.next_token();

    let mut declarations = Vec::new();
    loop {
        let _ = scanner.skip_whitespace();
        let (token, position) = scanner.next_token();
        match token {
            Token::Delim('}') => break,
            Token::Delim(';') => {}
            Token::Eof => return Err(scanner.error_at(position, "unterminated declaration block")),
            Token::Ident(name) => {
                let _ = scanner.skip_whitespace();
                if !scanner.eat_delim(':') {
                    return Err(scanner.error(format!("expected ':' after property '{name}'")));
                }
                let value = parse_value(scanner)?;
                if value.is_empty() {
                    return Err(scanner
                        .error_at(position, format!("empty value for property '{name}'")));
                }
                declarations.push(Declaration {
                    name,
                    value,
                    line: position.line,
                    column: position.column,
                });
            }
            other => {
                return Err(scanner.error_at(
                    position,
                    format!("expected property name but found '{other}'"),
                ));
            }
        }
    }

    Ok(StyleRule {
        selectors,
        declarations,
    })
}

/// Collect value tokens up to `;` (consumed) or `}` (left for the caller).
fn parse_value(scanner: &mut Scanner) -> Result<String, CssError> {
    let mut value = String::new();
    loop {
        match scanner.peek() {
            Token::Delim(';') => {
                let _ = scanner.next_token();
                break;
            }
            Token::Delim('}') => break,
            Token::Eof => return Err(scanner.error("unterminated declaration")),
            token => {
                value.push_str(&token.to_string());
                let _ = scanner.next_token();
            }
        }
    }
    Ok(value.trim().to_string())
}

//! Selector rule trees.
//!
//! A selector such as `box > button#ok.primary:focus` is stored as a chain
//! of [`SelectorRule`]s, one per simple selector. The head of the chain is
//! the rightmost (most specific) segment; each rule links back to the
//! segment on its left together with the combinator that joined them.
//!
//! ```text
//! [button#ok.primary:focus] --(DirectParent)--> [box]
//! ```

mod parser;
mod score;

use core::fmt;

use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::error::CssError;
use crate::scanner::{Position, Scanner, Token};
use crate::stylable::Stylable;

/// Score returned when a selector does not match.
pub const NO_MATCH: i32 = -1;

/// Priority given to selectors parsed without an explicit one.
pub const DEFAULT_PRIORITY: i32 = i32::MIN;

/// Relation between a rule and the rule it links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum ParentMode {
    /// No parent rule.
    None,
    /// `a > b`: the node's direct parent must match.
    DirectParent,
    /// `a b`: some ancestor of the node must match.
    Ancestor,
}

/// One simple selector plus an optional link to the segment before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorRule {
    /// Type name or `*`.
    pub type_name: Option<String>,
    /// `#id`.
    pub id: Option<String>,
    /// `.class` list in source order.
    pub classes: Vec<String>,
    /// `:pseudo` list in source order.
    pub pseudo_classes: Vec<String>,
    /// Where the rule came from.
    pub source_name: String,
    /// Cascade priority of the owning selector.
    pub priority: i32,
    /// Line of the segment's first token.
    pub line: u32,
    /// Column of the segment's first token.
    pub column: u32,
    parent: Option<(ParentMode, Box<SelectorRule>)>,
}

impl SelectorRule {
    pub(crate) fn new(source_name: &str, priority: i32, position: Position) -> Self {
        Self {
            type_name: None,
            id: None,
            classes: Vec::new(),
            pseudo_classes: Vec::new(),
            source_name: source_name.to_string(),
            priority,
            line: position.line,
            column: position.column,
            parent: None,
        }
    }

    /// How this rule relates to [`SelectorRule::parent`].
    pub fn parent_mode(&self) -> ParentMode {
        self.parent
            .as_ref()
            .map_or(ParentMode::None, |(mode, _)| *mode)
    }

    /// The rule for the segment on the left, if any.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_ref().map(|(_, rule)| rule.as_ref())
    }

    /// Whether the segment constrains nothing at all.
    pub fn is_empty(&self) -> bool {
        self.type_name.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.pseudo_classes.is_empty()
    }

    /// Whether the type part is absent or `*`.
    pub fn is_any_type(&self) -> bool {
        self.type_name.as_deref().is_none_or(|t| t == "*")
    }

    /// Number of segments in the chain starting here.
    pub fn chain_len(&self) -> usize {
        1 + self.parent().map_or(0, Self::chain_len)
    }

    /// This segment alone, without the rules on its left.
    pub fn segment(&self) -> impl fmt::Display + '_ {
        Segment(self)
    }

    /// Score this rule against `node`, or [`NO_MATCH`].
    pub fn score<N: Stylable>(&self, node: &N) -> i32 {
        score::score_rule(self, node)
    }

    pub(crate) fn link(&mut self, mode: ParentMode, parent: Self) {
        debug_assert_ne!(mode, ParentMode::None);
        self.parent = Some((mode, Box::new(parent)));
    }

    fn shift(&mut self, line: u32, column: u32) {
        // Only the first line of embedded text starts mid-line
        if self.line == 1 {
            self.column += column;
        }
        self.line += line;
        if let Some((_, parent)) = self.parent.as_mut() {
            parent.shift(line, column);
        }
    }

    fn fmt_segment(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(type_name) = &self.type_name {
            f.write_str(type_name)?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for pseudo in &self.pseudo_classes {
            write!(f, ":{pseudo}")?;
        }
        Ok(())
    }
}

struct Segment<'a>(&'a SelectorRule);

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_segment(f)
    }
}

impl fmt::Display for SelectorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some((ParentMode::DirectParent, parent)) => write!(f, "{parent} > ")?,
            Some((_, parent)) => write!(f, "{parent} ")?,
            None => {}
        }
        self.fmt_segment(f)
    }
}

/// A parsed selector: one rule chain plus its cascade priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    rule: SelectorRule,
    priority: i32,
}

impl Selector {
    /// Parse a complete selector string with [`DEFAULT_PRIORITY`].
    pub fn parse(text: &str) -> Result<Self, CssError> {
        Self::parse_with_priority(text, DEFAULT_PRIORITY)
    }

    /// Parse a complete selector string. Anything left after the selector
    /// is an error.
    pub fn parse_with_priority(text: &str, priority: i32) -> Result<Self, CssError> {
        let mut scanner = Scanner::new(text, "<selector>");
        let rule = parser::parse_rule_chain(&mut scanner, priority)?;
        if !scanner.peek().is_eof() {
            let found = scanner.peek().clone();
            return Err(scanner.error(format!("unexpected '{found}' after selector")));
        }
        Ok(Self { rule, priority })
    }

    /// Parse one selector from a scanner shared with a larger grammar.
    ///
    /// After the selector, `is_stop` is asked whether the next token is a
    /// valid terminator in the caller's context; the terminator is left
    /// unconsumed.
    pub fn parse_from_scanner(
        scanner: &mut Scanner,
        priority: i32,
        is_stop: impl Fn(&Token) -> bool,
    ) -> Result<Self, CssError> {
        let rule = parser::parse_rule_chain(scanner, priority)?;
        if !is_stop(scanner.peek()) {
            let found = scanner.peek().clone();
            return Err(scanner.error(format!("unexpected '{found}' after selector")));
        }
        Ok(Self { rule, priority })
    }

    /// The head rule (rightmost segment).
    pub const fn rule(&self) -> &SelectorRule {
        &self.rule
    }

    /// Cascade priority.
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Source name recorded while parsing.
    pub fn source_name(&self) -> &str {
        &self.rule.source_name
    }

    /// Line of the head rule.
    pub const fn line(&self) -> u32 {
        self.rule.line
    }

    /// Column of the head rule.
    pub const fn column(&self) -> u32 {
        self.rule.column
    }

    /// Shift every rule's position for selectors parsed out of text that
    /// was embedded at (`line`, `column`) offsets in a larger file.
    pub fn adjust_to_offset(&mut self, line: u32, column: u32) {
        self.rule.shift(line, column);
    }

    /// Score this selector against `node`, or [`NO_MATCH`].
    pub fn score<N: Stylable>(&self, node: &N) -> i32 {
        self.rule.score(node)
    }

    /// Whether the selector matches `node` at all.
    pub fn matches<N: Stylable>(&self, node: &N) -> bool {
        self.score(node) >= 0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rule, f)
    }
}

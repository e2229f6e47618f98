//! Selector matching and theme stylesheets for xfdashboard.
//!
//! # Scope
//!
//! This crate implements:
//! - **Scanner** - a small tokenizer that several parsers can share
//! - **Selectors** - `type#id.class:pseudo` simple selectors chained with
//!   `>` (direct parent) and whitespace (ancestor) combinators
//! - **Scoring** - a specificity-like score of a selector against a
//!   [`Stylable`] node, or [`NO_MATCH`]
//! - **Stylesheets** - `selector, selector { name: value; }` rulesets and
//!   the cascade that merges them for a node
//!
//! # Not Implemented
//!
//! - `!important`
//! - Attribute selectors and sibling combinators
//! - `@`-rules

/// Parse errors.
pub mod error;
/// Tokenizer shared by the parsers.
pub mod scanner;
/// Selector rule trees, parsing and scoring.
pub mod selector;
/// The capability selectors are matched against.
pub mod stylable;
/// Theme stylesheets and the cascade.
pub mod stylesheet;

pub use error::CssError;
pub use scanner::{Position, Scanner, Token};
pub use selector::{DEFAULT_PRIORITY, NO_MATCH, ParentMode, Selector, SelectorRule};
pub use stylable::{StageNode, Stylable};
pub use stylesheet::{Declaration, StyleMap, StyleRule, StyledValue, Stylesheet, Theme};

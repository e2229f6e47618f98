//! Specificity scoring.
//!
//! The score is `a * 10000 + b * 100 + c` where
//! - `a` is 10 if an id matched,
//! - `b` is 10 for every matched class and pseudo-class,
//! - `c` is the type distance (capped at 99) plus the score of the
//!   matching parent or ancestor.
//!
//! Any failed constraint yields [`NO_MATCH`].

use super::{NO_MATCH, ParentMode, SelectorRule};
use crate::stylable::Stylable;

/// Largest type distance that still adds to the score.
const MAX_TYPE_DISTANCE: u32 = 99;

pub(super) fn score_rule<N: Stylable>(rule: &SelectorRule, node: &N) -> i32 {
    let mut a: i32 = 0;
    let mut b: i32 = 0;
    let mut c: i32 = 0;

    // Type
    if !rule.is_any_type() {
        let Some(type_name) = rule.type_name.as_deref() else {
            return NO_MATCH;
        };
        let Some(distance) = node.type_distance(type_name) else {
            return NO_MATCH;
        };
        c = clamp_to_i32(distance.min(MAX_TYPE_DISTANCE));
    }

    // Id
    if let Some(id) = &rule.id {
        if node.style_name() != Some(id.as_str()) {
            return NO_MATCH;
        }
        a += 10;
    }

    // Classes
    if !rule.classes.is_empty() {
        let Some(matched) = count_subset(&rule.classes, node.style_classes()) else {
            return NO_MATCH;
        };
        b += 10 * matched;
    }

    // Pseudo-classes
    if !rule.pseudo_classes.is_empty() {
        let Some(matched) = count_subset(&rule.pseudo_classes, node.pseudo_classes()) else {
            return NO_MATCH;
        };
        b += 10 * matched;
    }

    // Parent or ancestor
    if let Some(parent_rule) = rule.parent() {
        let parent_score = match rule.parent_mode() {
            ParentMode::DirectParent => match node.parent() {
                Some(parent) if parent.is_stylable() => parent_rule.score(&parent),
                _ => NO_MATCH,
            },
            ParentMode::Ancestor => score_first_matching_ancestor(parent_rule, node),
            ParentMode::None => 0,
        };
        if parent_score < 0 {
            return NO_MATCH;
        }
        c = c.saturating_add(parent_score);
    }

    a.saturating_mul(10_000)
        .saturating_add(b.saturating_mul(100))
        .saturating_add(c)
}

/// Walk up from `node`'s parent, skipping non-stylable nodes, and return the
/// score of the first ancestor `rule` matches.
fn score_first_matching_ancestor<N: Stylable>(rule: &SelectorRule, node: &N) -> i32 {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if ancestor.is_stylable() {
            let score = rule.score(&ancestor);
            if score >= 0 {
                return score;
            }
        }
        current = ancestor.parent();
    }
    NO_MATCH
}

/// Number of `wanted` entries, or `None` unless every one is in `present`.
fn count_subset(wanted: &[String], present: &[String]) -> Option<i32> {
    if wanted.iter().all(|w| present.contains(w)) {
        Some(clamp_to_i32(u32::try_from(wanted.len()).unwrap_or(u32::MAX)))
    } else {
        None
    }
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

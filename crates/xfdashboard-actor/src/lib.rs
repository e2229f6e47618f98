//! Actor tree and class hierarchy for xfdashboard.
//!
//! This crate stands in for the parts of the toolkit object model the
//! styling and focus code consumes:
//!
//! - [`ClassRegistry`] - named classes with single inheritance and a list
//!   of interface names per class, queried for subtype tests, hierarchy
//!   depth and interface lookup.
//! - [`Stage`] - an arena of [`Actor`]s addressed by [`ActorId`], each
//!   carrying the name, style classes and pseudo-classes that selectors
//!   match against.
//!
//! # Design
//!
//! Like the DOM arena it mirrors, the stage stores every actor in one
//! vector and links them by index, so parent walks never fight the
//! borrow checker.

mod class;
mod stage;

pub use class::{ClassError, ClassId, ClassInfo, ClassRegistry, Lineage};
pub use stage::{Actor, ActorId, Ancestors, Stage};

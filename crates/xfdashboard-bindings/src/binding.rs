//! A single key binding.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use serde::Serialize;

use crate::key::{EventType, KeySpec, Modifiers};

bitflags! {
    /// Per-binding options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct BindingFlags: u32 {
        /// Deliver the action to targets that cannot currently take focus.
        const ALLOW_UNFOCUSABLE_TARGET = 1 << 0;
    }
}

/// What makes two bindings the same registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    /// Source class or interface, `None` for a global binding.
    pub class_name: Option<String>,
    /// Keysym, 0 for modifier-only bindings.
    pub key: u32,
    /// Required modifiers.
    pub modifiers: Modifiers,
    /// Press or release.
    pub event_type: EventType,
}

/// A binding loaded from a bindings file.
///
/// Equality and hashing only look at the [`BindingKey`] fields; the action,
/// target and flags are payload.
#[derive(Debug, Clone, Serialize)]
pub struct Binding {
    /// Source class or interface, `None` for a global binding.
    pub class_name: Option<String>,
    /// Keysym, 0 for modifier-only bindings.
    pub key: u32,
    /// Required modifiers.
    pub modifiers: Modifiers,
    /// Press or release.
    pub event_type: EventType,
    /// Action to emit.
    pub action: String,
    /// Class or interface of the actors that should receive the action.
    /// `None` sends it to the focused actor.
    pub target: Option<String>,
    /// Options.
    pub flags: BindingFlags,
}

impl Binding {
    /// Identity of this binding.
    pub fn identity(&self) -> BindingKey {
        BindingKey {
            class_name: self.class_name.clone(),
            key: self.key,
            modifiers: self.modifiers,
            event_type: self.event_type,
        }
    }

    /// The key and modifiers as a key spec.
    pub const fn key_spec(&self) -> KeySpec {
        KeySpec {
            key: self.key,
            modifiers: self.modifiers,
        }
    }

    /// Whether the action may go to targets that cannot take focus.
    pub const fn allows_unfocusable_targets(&self) -> bool {
        self.flags.contains(BindingFlags::ALLOW_UNFOCUSABLE_TARGET)
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name
            && self.key == other.key
            && self.modifiers == other.modifiers
            && self.event_type == other.event_type
    }
}

impl Eq for Binding {}

impl Hash for Binding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class_name.hash(state);
        self.key.hash(state);
        self.modifiers.hash(state);
        self.event_type.hash(state);
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) -> {}",
            self.class_name.as_deref().unwrap_or("*"),
            self.key_spec(),
            self.event_type,
            self.action
        )?;
        if let Some(target) = &self.target {
            write!(f, " @ {target}")?;
        }
        Ok(())
    }
}

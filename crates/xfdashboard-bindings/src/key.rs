//! Key events, modifier masks and the `code` attribute syntax.
//!
//! A key spec is split on `+`, `-`, space and tab. Tokens written as
//! `<Name>` are modifiers, anything else is the key:
//!
//! ```text
//! <Ctrl>+<Shift>+q
//! <Alt> F4
//! Escape
//! ```
//!
//! `<Ctrl>q` (a modifier glued to the key) is accepted as well.

use std::fmt;

use bitflags::bitflags;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::keysyms;

bitflags! {
    /// Modifier state, using the toolkit's mask bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
    #[serde(transparent)]
    pub struct Modifiers: u32 {
        /// Shift key.
        const SHIFT   = 1 << 0;
        /// Caps lock.
        const LOCK    = 1 << 1;
        /// Control key.
        const CONTROL = 1 << 2;
        /// First extra modifier, usually Alt.
        const MOD1    = 1 << 3;
        /// Usually Num Lock.
        const MOD2    = 1 << 4;
        /// Third extra modifier.
        const MOD3    = 1 << 5;
        /// Fourth extra modifier.
        const MOD4    = 1 << 6;
        /// Fifth extra modifier.
        const MOD5    = 1 << 7;
        /// Super key.
        const SUPER   = 1 << 26;
        /// Hyper key.
        const HYPER   = 1 << 27;
        /// Meta key.
        const META    = 1 << 28;
    }
}

impl Modifiers {
    /// Modifiers that take part in binding lookup. Lock-style state such as
    /// Caps Lock and Num Lock is ignored.
    pub const BINDING_MASK: Self = Self::SHIFT
        .union(Self::CONTROL)
        .union(Self::MOD1)
        .union(Self::SUPER)
        .union(Self::HYPER)
        .union(Self::META);

    /// Resolve a modifier name without its angle brackets. Names are
    /// case-insensitive; `Alt` is `Mod1`.
    pub fn lookup(name: &str) -> Option<Self> {
        MODIFIER_NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, m)| m)
    }
}

static MODIFIER_NAMES: &[(&str, Modifiers)] = &[
    ("Shift", Modifiers::SHIFT),
    ("Lock", Modifiers::LOCK),
    ("Ctrl", Modifiers::CONTROL),
    ("Control", Modifiers::CONTROL),
    ("Alt", Modifiers::MOD1),
    ("Mod1", Modifiers::MOD1),
    ("Mod2", Modifiers::MOD2),
    ("Mod3", Modifiers::MOD3),
    ("Mod4", Modifiers::MOD4),
    ("Mod5", Modifiers::MOD5),
    ("Super", Modifiers::SUPER),
    ("Hyper", Modifiers::HYPER),
    ("Meta", Modifiers::META),
];

/// Names used when printing a modifier mask.
static DISPLAY_NAMES: &[(&str, Modifiers)] = &[
    ("Ctrl", Modifiers::CONTROL),
    ("Shift", Modifiers::SHIFT),
    ("Alt", Modifiers::MOD1),
    ("Super", Modifiers::SUPER),
    ("Hyper", Modifiers::HYPER),
    ("Meta", Modifiers::META),
    ("Lock", Modifiers::LOCK),
    ("Mod2", Modifiers::MOD2),
    ("Mod3", Modifiers::MOD3),
    ("Mod4", Modifiers::MOD4),
    ("Mod5", Modifiers::MOD5),
];

/// Whether a binding fires on press or release.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
)]
pub enum EventType {
    /// Key pressed.
    #[default]
    #[strum(serialize = "pressed")]
    #[serde(rename = "pressed")]
    KeyPress,
    /// Key released.
    #[strum(serialize = "released")]
    #[serde(rename = "released")]
    KeyRelease,
}

/// A key press or release as delivered by the toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Press or release.
    pub event_type: EventType,
    /// Keysym of the key.
    pub keyval: u32,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press.
    pub const fn press(keyval: u32, modifiers: Modifiers) -> Self {
        Self {
            event_type: EventType::KeyPress,
            keyval,
            modifiers,
        }
    }

    /// A key release.
    pub const fn release(keyval: u32, modifiers: Modifiers) -> Self {
        Self {
            event_type: EventType::KeyRelease,
            keyval,
            modifiers,
        }
    }

    /// Build an event from a key spec such as `<Ctrl>q`.
    pub fn from_spec(event_type: EventType, spec: &str) -> Result<Self, KeySpecError> {
        let KeySpec { key, modifiers } = KeySpec::parse(spec)?;
        Ok(Self {
            event_type,
            keyval: key,
            modifiers,
        })
    }
}

/// Why a key spec was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeySpecError {
    /// `<Name>` is not a known modifier.
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    /// The key name is not a known keysym.
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    /// More than one non-modifier token.
    #[error("more than one key in '{0}'")]
    MultipleKeys(String),
    /// Neither a key nor a modifier.
    #[error("no key or modifier in '{0}'")]
    Empty(String),
    /// Modifiers that key events never match on, such as `<Lock>` or
    /// `<Mod2>`.
    #[error("modifiers {0} cannot be used in a binding")]
    UnbindableModifiers(String),
}

/// A parsed `code` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    /// Keysym, or 0 for a modifier-only spec.
    pub key: u32,
    /// Required modifiers.
    pub modifiers: Modifiers,
}

impl KeySpec {
    /// Parse a key spec.
    pub fn parse(spec: &str) -> Result<Self, KeySpecError> {
        let mut key = None;
        let mut modifiers = Modifiers::empty();

        for token in spec.split(['+', '-', ' ', '\t']).filter(|t| !t.is_empty()) {
            let mut rest = token;
            while let Some(inner) = rest.strip_prefix('<') {
                let Some((name, tail)) = inner.split_once('>') else {
                    return Err(KeySpecError::UnknownModifier(rest.to_string()));
                };
                modifiers |= Modifiers::lookup(name)
                    .ok_or_else(|| KeySpecError::UnknownModifier(name.to_string()))?;
                rest = tail;
            }
            if rest.is_empty() {
                continue;
            }

            if key.is_some() {
                return Err(KeySpecError::MultipleKeys(spec.to_string()));
            }
            key = Some(
                keysyms::from_name(rest)
                    .ok_or_else(|| KeySpecError::UnknownKey(rest.to_string()))?,
            );
        }

        let key = key.unwrap_or(0);
        if key == 0 && modifiers.is_empty() {
            return Err(KeySpecError::Empty(spec.to_string()));
        }
        Ok(Self { key, modifiers })
    }

    /// Fail if the spec requires modifiers outside
    /// [`Modifiers::BINDING_MASK`]; a binding with those could never fire.
    pub fn check_bindable(&self) -> Result<(), KeySpecError> {
        let unbindable = self.modifiers.difference(Modifiers::BINDING_MASK);
        if unbindable.is_empty() {
            return Ok(());
        }
        let names = Self {
            key: 0,
            modifiers: unbindable,
        };
        Err(KeySpecError::UnbindableModifiers(names.to_string()))
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, flag) in DISPLAY_NAMES {
            if self.modifiers.contains(*flag) {
                write!(f, "<{name}>")?;
            }
        }
        if self.key != 0 {
            match keysyms::name(self.key) {
                Some(name) => f.write_str(&name)?,
                None => write!(f, "0x{:x}", self.key)?,
            }
        }
        Ok(())
    }
}

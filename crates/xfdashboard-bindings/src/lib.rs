//! Key bindings for xfdashboard.
//!
//! Binding files map a key on an actor class to a named action. The
//! [`BindingsPool`] merges the system, user and override files and
//! resolves a key event on an actor to the most specific binding.
//!
//! # Example
//!
//! ```
//! use xfdashboard_actor::ClassRegistry;
//! use xfdashboard_bindings::{BindingsPool, EventType, KeyEvent};
//!
//! let mut classes = ClassRegistry::new();
//! let core = classes.register("Core", None, &[]).unwrap();
//!
//! let mut pool = BindingsPool::new();
//! pool.load_str(r#"<bindings><key code="F5" source="Core">refresh</key></bindings>"#, "inline")
//!     .unwrap();
//!
//! let event = KeyEvent::from_spec(EventType::KeyPress, "F5").unwrap();
//! let binding = pool.find_for_event(&classes, core, &event).unwrap();
//! assert_eq!(binding.action, "refresh");
//! ```

/// A single binding and its identity.
pub mod binding;
/// Loading errors.
pub mod error;
/// Key events, modifiers and key specs.
pub mod key;
/// Keysym names.
pub mod keysyms;
mod parser;
/// The binding registry.
pub mod pool;

pub use binding::{Binding, BindingFlags, BindingKey};
pub use error::BindingsError;
pub use key::{EventType, KeyEvent, KeySpec, KeySpecError, Modifiers};
pub use pool::{BINDINGS_FILE_NAME, BindingsPool, BindingsSources, LoadReport, OVERRIDE_ENV};

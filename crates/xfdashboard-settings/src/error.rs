//! Settings errors.

use thiserror::Error;

/// A settings value could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// No property is bound at this channel path.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// The value's type differs from the bound property's type.
    #[error("type mismatch for '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Channel path of the property.
        path: String,
        /// JSON type of the property.
        expected: &'static str,
        /// JSON type of the rejected value.
        found: &'static str,
    },
}

//! Two-way synchronisation between object properties and a settings
//! channel.
//!
//! The channel notifies synchronously on every write, and a property
//! notifies synchronously on every set, so each direction echoes back
//! into the other. The [`SyncGuard`] drops the echo.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::SettingsError;
use crate::guard::SyncGuard;
use crate::path::{path_property, property_path};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PropertyKey {
    plugin: Option<String>,
    name: String,
}

impl PropertyKey {
    fn new(plugin: Option<&str>, name: &str) -> Self {
        Self {
            plugin: plugin.map(str::to_string),
            name: name.to_string(),
        }
    }
}

/// Name of a JSON value's type.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_type(path: &str, current: &Value, value: &Value) -> Result<(), SettingsError> {
    let (expected, found) = (json_type(current), json_type(value));
    if expected == found {
        Ok(())
    } else {
        Err(SettingsError::TypeMismatch {
            path: path.to_string(),
            expected,
            found,
        })
    }
}

/// Bound properties mirrored into an in-memory settings channel.
#[derive(Debug, Default)]
pub struct SettingsSync {
    channel: BTreeMap<String, Value>,
    properties: BTreeMap<PropertyKey, Value>,
    guard: SyncGuard,
}

impl SettingsSync {
    /// Create a sync with an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sync over existing channel contents.
    pub fn with_channel(channel: BTreeMap<String, Value>) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }

    /// The channel contents.
    pub fn channel(&self) -> &BTreeMap<String, Value> {
        &self.channel
    }

    /// The guard shared by both directions.
    pub fn guard(&self) -> &SyncGuard {
        &self.guard
    }

    /// Current value of a bound property.
    pub fn property(&self, plugin: Option<&str>, name: &str) -> Option<&Value> {
        self.properties.get(&PropertyKey::new(plugin, name))
    }

    /// Bind a property with its default value.
    ///
    /// A value already stored in the channel wins over the default unless
    /// its type differs, in which case the default is kept.
    pub fn bind(&mut self, plugin: Option<&str>, name: &str, default: Value) {
        let path = property_path(plugin, name);
        let value = if let Some(stored) = self.channel.get(&path) {
            match check_type(&path, &default, stored) {
                Ok(()) => stored.clone(),
                Err(err) => {
                    warn!(%err, "ignoring stored setting");
                    default
                }
            }
        } else {
            default
        };
        debug!(path, "bound property");
        let _ = self.properties.insert(PropertyKey::new(plugin, name), value);
    }

    /// Remove a property binding. The channel keeps its value.
    pub fn unbind(&mut self, plugin: Option<&str>, name: &str) -> bool {
        self.properties.remove(&PropertyKey::new(plugin, name)).is_some()
    }

    /// Set a property and forward it to the channel.
    ///
    /// Returns `Ok(false)` when the call is the echo of a channel change
    /// still in flight.
    pub fn set_property(
        &mut self,
        plugin: Option<&str>,
        name: &str,
        value: Value,
    ) -> Result<bool, SettingsError> {
        let path = property_path(plugin, name);
        let key = PropertyKey::new(plugin, name);
        let current = self
            .properties
            .get(&key)
            .ok_or_else(|| SettingsError::UnknownProperty(path.clone()))?;
        check_type(&path, current, &value)?;

        let Some(_token) = self.guard.enter(plugin, name) else {
            trace!(path, "suppressed property echo");
            return Ok(false);
        };
        let _ = self.properties.insert(key, value.clone());
        let _ = self.channel.insert(path.clone(), value.clone());
        debug!(path, %value, "property -> channel");

        // The channel reports its own write back.
        let _ = self.channel_changed(&path, value)?;
        Ok(true)
    }

    /// Apply a change made to the channel to the bound property.
    ///
    /// Returns `Ok(false)` when nothing is bound at `path` or the call is
    /// the echo of a property change still in flight.
    pub fn channel_changed(&mut self, path: &str, value: Value) -> Result<bool, SettingsError> {
        let Some((plugin, name)) = path_property(path) else {
            return Ok(false);
        };
        let key = PropertyKey::new(plugin.as_deref(), &name);
        let Some(current) = self.properties.get(&key) else {
            trace!(path, "no property bound");
            return Ok(false);
        };
        check_type(path, current, &value)?;

        let Some(_token) = self.guard.enter(plugin.as_deref(), &name) else {
            trace!(path, "suppressed channel echo");
            return Ok(false);
        };
        let _ = self.channel.insert(path.to_string(), value.clone());
        let _ = self.properties.insert(key, value.clone());
        debug!(path, %value, "channel -> property");

        // The property notifies its own change back.
        let _ = self.set_property(plugin.as_deref(), &name, value)?;
        Ok(true)
    }
}

//! Re-entrancy guard for two-way property synchronisation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GuardKey {
    plugin: Option<String>,
    property: String,
}

impl GuardKey {
    fn new(plugin: Option<&str>, property: &str) -> Self {
        Self {
            plugin: plugin.map(str::to_string),
            property: property.to_string(),
        }
    }
}

type InFlight = Rc<RefCell<HashMap<GuardKey, usize>>>;

/// Set of properties with a change in flight.
///
/// Each key carries a count, so the same property may be blocked by
/// nested operations; it is released when the last token drops.
#[derive(Debug, Clone, Default)]
pub struct SyncGuard {
    in_flight: InFlight,
}

impl SyncGuard {
    /// Create an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block the property if nothing else has it in flight.
    ///
    /// Returns `None` while the property is already blocked.
    pub fn enter(&self, plugin: Option<&str>, property: &str) -> Option<SyncGuardToken> {
        if self.is_blocked(plugin, property) {
            return None;
        }
        Some(self.block(plugin, property))
    }

    /// Block the property unconditionally, nesting with existing blocks.
    pub fn block(&self, plugin: Option<&str>, property: &str) -> SyncGuardToken {
        let key = GuardKey::new(plugin, property);
        *self.in_flight.borrow_mut().entry(key.clone()).or_insert(0) += 1;
        SyncGuardToken {
            in_flight: Rc::clone(&self.in_flight),
            key,
        }
    }

    /// Whether a change to the property is in flight.
    pub fn is_blocked(&self, plugin: Option<&str>, property: &str) -> bool {
        self.in_flight.borrow().contains_key(&GuardKey::new(plugin, property))
    }

    /// Number of nested blocks on the property.
    pub fn depth(&self, plugin: Option<&str>, property: &str) -> usize {
        self.in_flight
            .borrow()
            .get(&GuardKey::new(plugin, property))
            .copied()
            .unwrap_or(0)
    }
}

/// Releases one block on drop.
#[must_use = "the property is released as soon as the token is dropped"]
pub struct SyncGuardToken {
    in_flight: InFlight,
    key: GuardKey,
}

impl fmt::Debug for SyncGuardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncGuardToken")
            .field("plugin", &self.key.plugin)
            .field("property", &self.key.property)
            .finish()
    }
}

impl Drop for SyncGuardToken {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.borrow_mut();
        if let Some(count) = in_flight.get_mut(&self.key) {
            *count -= 1;
            if *count == 0 {
                let _ = in_flight.remove(&self.key);
            }
        }
    }
}

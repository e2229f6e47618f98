//! Deduplicated warnings.
//!
//! Theme and binding files are re-read whenever the dashboard is shown, so
//! the same complaint about a bad selector or an unknown key name would be
//! printed over and over. [`warn_once`] remembers what it already reported.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Emit a warning for `component` unless the identical message was already emitted.
///
/// Returns `true` if the warning was emitted by this call.
///
/// # Example
/// ```ignore
/// warn_once("bindings", "unknown key name 'Foo' in /etc/xdg/bindings.xml");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Forget every recorded warning (call when themes or bindings are reloaded).
pub fn clear_warnings() {
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

//! Settings for xfdashboard.
//!
//! Properties are kept in step with a settings channel keyed by path (see
//! [`property_path`]). [`SettingsSync`] forwards changes in both directions
//! and uses a [`SyncGuard`] to stop each change bouncing back.
//!
//! ```
//! use serde_json::json;
//! use xfdashboard_settings::SettingsSync;
//!
//! let mut sync = SettingsSync::new();
//! sync.bind(Some("clock-view"), "show-seconds", json!(false));
//! assert_eq!(sync.set_property(Some("clock-view"), "show-seconds", json!(true)), Ok(true));
//! assert_eq!(sync.channel()["/plugins/clock-view/show-seconds"], json!(true));
//! ```

mod error;
/// Re-entrancy guard.
pub mod guard;
/// Property paths.
pub mod path;
/// Two-way sync.
pub mod sync;

pub use error::SettingsError;
pub use guard::{SyncGuard, SyncGuardToken};
pub use path::{REMAPPED_PATHS, path_property, property_path};
pub use sync::{SettingsSync, json_type};
pub use xfdashboard_common::paths::plugin_search_paths;

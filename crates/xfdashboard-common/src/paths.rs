//! XDG base directory resolution and search-path helpers.
//!
//! Every lookup goes through an [`Env`] so callers (and tests) can resolve
//! paths against something other than the process environment.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Application directory name used below every base directory.
pub const APP_DIR: &str = "xfdashboard";

/// Compiled-in system data prefix.
pub const SYSTEM_DATA_DIR: &str = "/usr/share";

/// Compiled-in system library prefix.
pub const SYSTEM_LIB_DIR: &str = "/usr/lib";

/// Source of environment variables.
pub trait Env {
    /// Value of the variable `name`, if set and non-empty.
    fn var(&self, name: &str) -> Option<OsString>;

    /// The user's home directory, from `$HOME` unless overridden.
    fn home_dir(&self) -> Option<PathBuf> {
        self.var("HOME").map(PathBuf::from)
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name).filter(|value| !value.is_empty())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, OsString>,
}

impl MapEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<OsString>) -> Self {
        let _ = self.vars.insert(name.to_string(), value.into());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, name: &str) -> Option<OsString> {
        self.vars.get(name).filter(|value| !value.is_empty()).cloned()
    }
}

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
pub fn config_home(env: &dyn Env) -> Option<PathBuf> {
    base_dir(env, "XDG_CONFIG_HOME", ".config")
}

/// `$XDG_DATA_HOME`, falling back to `$HOME/.local/share`.
pub fn data_home(env: &dyn Env) -> Option<PathBuf> {
    base_dir(env, "XDG_DATA_HOME", ".local/share")
}

fn base_dir(env: &dyn Env, var: &str, home_relative: &str) -> Option<PathBuf> {
    // XDG requires absolute paths; relative values are ignored
    if let Some(dir) = env.var(var).map(PathBuf::from)
        && dir.is_absolute()
    {
        return Some(dir);
    }
    env.home_dir().map(|home| home.join(home_relative))
}

/// Split a colon-separated search path, dropping empty elements.
pub fn split_search_path(value: &std::ffi::OsStr) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|path| !path.as_os_str().is_empty())
        .collect()
}

/// Ordered plugin search directories.
///
/// `$XFDASHBOARD_PLUGINS_PATH` entries come first, then the per-user data
/// directory, then the system library directory.
pub fn plugin_search_paths(env: &dyn Env) -> Vec<PathBuf> {
    let mut paths = env
        .var("XFDASHBOARD_PLUGINS_PATH")
        .map(|value| split_search_path(&value))
        .unwrap_or_default();

    if let Some(data) = data_home(env) {
        paths.push(data.join(APP_DIR).join("plugins"));
    }
    paths.push(Path::new(SYSTEM_LIB_DIR).join(APP_DIR).join("plugins"));

    paths.dedup();
    paths
}

//! Mapping between properties and settings channel paths.
//!
//! Core settings live at `/<name>`, plugin settings at
//! `/plugins/<plugin-id>/<name>`. A few properties were renamed and keep
//! their old paths; see [`REMAPPED_PATHS`].

/// Prefix of plugin settings.
pub const PLUGINS_PREFIX: &str = "/plugins";

/// Properties stored under a path other than the default one, as
/// `(plugin, property, path)`.
pub static REMAPPED_PATHS: &[(Option<&str>, &str, &str)] = &[
    (None, "theme-name", "/theme"),
    (None, "switch-to-view-on-resume", "/switch-view-on-resume"),
    (None, "reset-search-on-resume", "/reset-search-on-resume"),
    (Some("hot-corner"), "activation-corner", "/plugins/hot-corner/corner"),
];

/// Channel path of a property. `plugin` is `None` for core settings.
pub fn property_path(plugin: Option<&str>, name: &str) -> String {
    if let Some(&(_, _, path)) = REMAPPED_PATHS
        .iter()
        .find(|&&(p, n, _)| p == plugin && n == name)
    {
        return path.to_string();
    }
    match plugin {
        Some(plugin) => format!("{PLUGINS_PREFIX}/{plugin}/{name}"),
        None => format!("/{name}"),
    }
}

/// Property stored at `path`, as `(plugin, name)`.
pub fn path_property(path: &str) -> Option<(Option<String>, String)> {
    if let Some(&(plugin, name, _)) = REMAPPED_PATHS.iter().find(|&&(_, _, p)| p == path) {
        return Some((plugin.map(str::to_string), name.to_string()));
    }

    let rest = path.strip_prefix('/')?;
    if let Some(plugin_path) = path.strip_prefix(PLUGINS_PREFIX).and_then(|p| p.strip_prefix('/')) {
        let (plugin, name) = plugin_path.split_once('/')?;
        if plugin.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        return Some((Some(plugin.to_string()), name.to_string()));
    }
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some((None, rest.to_string()))
}

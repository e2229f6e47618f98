//! The binding registry.
//!
//! Bindings from every source file are merged into one set keyed by
//! [`BindingKey`]; a later file replaces entries of an earlier one.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use xfdashboard_actor::{ClassId, ClassRegistry};
use xfdashboard_common::paths::{self, APP_DIR, Env, ProcessEnv, SYSTEM_DATA_DIR};
use xfdashboard_common::warning::warn_once;

use crate::binding::{Binding, BindingKey};
use crate::error::BindingsError;
use crate::key::{KeyEvent, KeySpecError, Modifiers};
use crate::keysyms;
use crate::parser::parse_bindings;

/// File name looked up in the system and user directories.
pub const BINDINGS_FILE_NAME: &str = "bindings.xml";

/// Variable naming an extra bindings file that is loaded last.
pub const OVERRIDE_ENV: &str = "XFDASHBOARD_BINDINGS_POOL_FILE";

/// Variable overriding the system data prefix.
pub const DATA_DIR_ENV: &str = "XFDASHBOARD_DATA_DIR";

/// The files [`BindingsPool::load`] reads, lowest precedence first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingsSources {
    /// System-wide file.
    pub system: Option<PathBuf>,
    /// Per-user file.
    pub user: Option<PathBuf>,
    /// Extra file, usually from [`OVERRIDE_ENV`].
    pub override_file: Option<PathBuf>,
}

impl BindingsSources {
    /// Resolve the sources from the process environment.
    pub fn from_environment() -> Self {
        Self::from_env(&ProcessEnv)
    }

    /// Resolve the sources from `env`.
    pub fn from_env(env: &dyn Env) -> Self {
        let data_dir = env
            .var(DATA_DIR_ENV)
            .map_or_else(|| PathBuf::from(SYSTEM_DATA_DIR), PathBuf::from);

        Self {
            system: Some(data_dir.join(APP_DIR).join(BINDINGS_FILE_NAME)),
            user: paths::config_home(env).map(|dir| dir.join(APP_DIR).join(BINDINGS_FILE_NAME)),
            override_file: env.var(OVERRIDE_ENV).map(PathBuf::from),
        }
    }

    /// Configured files in load order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        [&self.system, &self.user, &self.override_file]
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }
}

/// Outcome of [`BindingsPool::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files that were merged, with the number of bindings each defined.
    pub loaded: Vec<(PathBuf, usize)>,
    /// Files that exist but failed to load; their bindings were skipped.
    pub failed: Vec<BindingsError>,
}

/// The set of loaded bindings.
#[derive(Debug, Clone, Default)]
pub struct BindingsPool {
    bindings: HashMap<BindingKey, Binding>,
}

impl BindingsPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool's contents with the bindings from `sources`.
    ///
    /// Missing files are skipped. If none of the files exists the pool is
    /// emptied and [`BindingsError::FileNotFound`] returned. A file that
    /// fails to parse is logged and skipped; if every existing file fails,
    /// the pool is emptied and the first error returned.
    pub fn load(&mut self, sources: &BindingsSources) -> Result<LoadReport, BindingsError> {
        let searched: Vec<PathBuf> = sources.files().map(Path::to_path_buf).collect();
        let existing: Vec<&PathBuf> = searched.iter().filter(|path| path.is_file()).collect();

        if existing.is_empty() {
            self.clear();
            let err = BindingsError::FileNotFound { searched };
            tracing::warn!("{err}");
            return Err(err);
        }

        let mut merged = HashMap::new();
        let mut report = LoadReport::default();
        for path in existing {
            match read_file(path) {
                Ok(bindings) => {
                    report.loaded.push((path.clone(), bindings.len()));
                    merge(&mut merged, bindings);
                }
                Err(err) => {
                    let _ = warn_once("bindings", &err.to_string());
                    report.failed.push(err);
                }
            }
        }

        if report.loaded.is_empty() {
            self.clear();
            return Err(report.failed.into_iter().next().unwrap_or_else(|| {
                BindingsError::Internal("no bindings file loaded and no error recorded".to_string())
            }));
        }

        self.bindings = merged;
        tracing::debug!(
            files = report.loaded.len(),
            bindings = self.bindings.len(),
            "loaded bindings"
        );
        Ok(report)
    }

    /// Merge one file into the pool. On error the pool is unchanged.
    ///
    /// Returns the number of bindings the file defined.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, BindingsError> {
        let bindings = read_file(path)?;
        let count = bindings.len();
        merge(&mut self.bindings, bindings);
        Ok(count)
    }

    /// Merge bindings markup from a string. `name` is used in errors.
    pub fn load_str(&mut self, text: &str, name: &str) -> Result<usize, BindingsError> {
        let bindings = parse_bindings(text, Path::new(name))?;
        let count = bindings.len();
        merge(&mut self.bindings, bindings);
        Ok(count)
    }

    /// Add or replace a single binding. Returns the binding it replaced.
    ///
    /// Bindings that require modifiers outside [`Modifiers::BINDING_MASK`]
    /// are rejected.
    pub fn insert(&mut self, binding: Binding) -> Result<Option<Binding>, KeySpecError> {
        binding.key_spec().check_bindable()?;
        Ok(self.bindings.insert(binding.identity(), binding))
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    /// The binding with identity `key`.
    pub fn get(&self, key: &BindingKey) -> Option<&Binding> {
        self.bindings.get(key)
    }

    /// Find the binding for `event` on an actor of class `class`.
    ///
    /// The class and then each superclass is tried, most derived first.
    /// Then the interfaces those classes declare, in the order they were
    /// met. Global bindings come last.
    pub fn find_for_event(
        &self,
        classes: &ClassRegistry,
        class: ClassId,
        event: &KeyEvent,
    ) -> Option<&Binding> {
        let mut lookup = BindingKey {
            class_name: None,
            key: keysyms::to_lower(event.keyval),
            modifiers: event.modifiers & Modifiers::BINDING_MASK,
            event_type: event.event_type,
        };

        let mut interfaces: Vec<&str> = Vec::new();
        for id in classes.lineage(class) {
            let Some(name) = classes.name(id) else {
                continue;
            };
            lookup.class_name = Some(name.to_string());
            if let Some(binding) = self.bindings.get(&lookup) {
                return Some(binding);
            }
            for interface in classes.declared_interfaces(id) {
                if !interfaces.contains(&interface.as_str()) {
                    interfaces.push(interface);
                }
            }
        }

        for interface in interfaces {
            lookup.class_name = Some(interface.to_string());
            if let Some(binding) = self.bindings.get(&lookup) {
                return Some(binding);
            }
        }

        lookup.class_name = None;
        self.bindings.get(&lookup)
    }
}

fn read_file(path: &Path) -> Result<Vec<Binding>, BindingsError> {
    let text = fs::read_to_string(path).map_err(|source| BindingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bindings(&text, path)
}

fn merge(into: &mut HashMap<BindingKey, Binding>, bindings: Vec<Binding>) {
    for binding in bindings {
        if let Some(previous) = into.insert(binding.identity(), binding) {
            tracing::trace!(%previous, "binding overridden");
        }
    }
}

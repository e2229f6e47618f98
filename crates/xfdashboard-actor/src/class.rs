//! Class hierarchy registry.

use std::collections::HashMap;

use thiserror::Error;

/// Index of a registered class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

/// A registered class.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    /// Class name as used in selectors and binding files.
    pub name: String,
    /// Direct superclass, `None` for a root class.
    pub parent: Option<ClassId>,
    /// Interfaces declared by this class (inherited ones are not repeated).
    pub interfaces: Vec<String>,
}

/// Errors raised while building the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    /// The name is already taken.
    #[error("class '{0}' is already registered")]
    DuplicateClass(String),
    /// The named superclass has not been registered yet.
    #[error("parent class '{parent}' of '{name}' is not registered")]
    UnknownParent {
        /// Class being registered.
        name: String,
        /// Missing superclass.
        parent: String,
    },
}

/// Registry of classes with single inheritance and named interfaces.
///
/// Classes must be registered parent-first; ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: Vec<ClassInfo>,
    by_name: HashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as a subclass of `parent` declaring `interfaces`.
    pub fn register(
        &mut self,
        name: &str,
        parent: Option<&str>,
        interfaces: &[&str],
    ) -> Result<ClassId, ClassError> {
        if self.by_name.contains_key(name) {
            return Err(ClassError::DuplicateClass(name.to_string()));
        }

        let parent = match parent {
            Some(parent_name) => Some(self.lookup(parent_name).ok_or_else(|| {
                ClassError::UnknownParent {
                    name: name.to_string(),
                    parent: parent_name.to_string(),
                }
            })?),
            None => None,
        };

        let id = ClassId(self.classes.len());
        self.classes.push(ClassInfo {
            name: name.to_string(),
            parent,
            interfaces: interfaces.iter().map(|s| (*s).to_string()).collect(),
        });
        let _ = self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Find a class by name.
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Get a class by id.
    pub fn get(&self, id: ClassId) -> Option<&ClassInfo> {
        self.classes.get(id.0)
    }

    /// Name of a class.
    pub fn name(&self, id: ClassId) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    /// Direct superclass.
    pub fn parent(&self, id: ClassId) -> Option<ClassId> {
        self.get(id).and_then(|c| c.parent)
    }

    /// Iterate `id` and then each superclass up to the root.
    pub fn lineage(&self, id: ClassId) -> Lineage<'_> {
        Lineage {
            registry: self,
            current: self.get(id).map(|_| id),
        }
    }

    /// Number of superclasses above `id` (a root class has depth 0).
    pub fn depth(&self, id: ClassId) -> usize {
        self.lineage(id).count().saturating_sub(1)
    }

    /// Whether `id` is `ancestor` or derives from it.
    pub fn is_a(&self, id: ClassId, ancestor: ClassId) -> bool {
        self.lineage(id).any(|c| c == ancestor)
    }

    /// Number of inheritance steps from `id` up to `ancestor`, or `None`
    /// if `id` does not derive from `ancestor`.
    pub fn type_distance(&self, id: ClassId, ancestor: ClassId) -> Option<u32> {
        self.lineage(id)
            .position(|c| c == ancestor)
            .map(|steps| u32::try_from(steps).unwrap_or(u32::MAX))
    }

    /// Interfaces declared directly on `id`.
    pub fn declared_interfaces(&self, id: ClassId) -> &[String] {
        self.get(id).map(|c| c.interfaces.as_slice()).unwrap_or(&[])
    }

    /// All interfaces implemented by `id`, in discovery order walking from
    /// the class itself up to the root, without duplicates.
    pub fn interfaces(&self, id: ClassId) -> Vec<&str> {
        let mut found: Vec<&str> = Vec::new();
        for class in self.lineage(id) {
            for iface in self.declared_interfaces(class) {
                if !found.contains(&iface.as_str()) {
                    found.push(iface);
                }
            }
        }
        found
    }

    /// Whether `id` or any superclass declares `interface`.
    pub fn implements(&self, id: ClassId, interface: &str) -> bool {
        self.lineage(id)
            .any(|c| self.declared_interfaces(c).iter().any(|i| i == interface))
    }

    /// Whether `id` is the class named `type_name`, derives from it, or
    /// implements an interface of that name.
    pub fn is_instance_of(&self, id: ClassId, type_name: &str) -> bool {
        match self.lookup(type_name) {
            Some(target) if self.is_a(id, target) => true,
            _ => self.implements(id, type_name),
        }
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Iterator over a class and its superclasses.
pub struct Lineage<'a> {
    registry: &'a ClassRegistry,
    current: Option<ClassId>,
}

impl Iterator for Lineage<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.registry.parent(id);
        Some(id)
    }
}

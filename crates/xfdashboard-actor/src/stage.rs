//! Arena-based actor tree.

use std::rc::Rc;

use crate::class::{ClassId, ClassRegistry};

/// A type-safe index into the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub usize);

/// A node of the stage.
///
/// The style-facing state (name, classes, pseudo-classes) is what
/// selectors are matched against; the visibility flags feed the focus
/// manager's "can focus" checks.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Runtime class.
    pub class: ClassId,
    /// Style name, matched by `#id` selectors.
    pub name: Option<String>,
    /// Style classes in insertion order.
    pub style_classes: Vec<String>,
    /// Style pseudo-classes in insertion order.
    pub pseudo_classes: Vec<String>,
    /// Whether the actor takes part in styling.
    pub stylable: bool,
    /// Shown on screen.
    pub visible: bool,
    /// Backing resources allocated.
    pub realized: bool,
    /// Accepts input.
    pub reactive: bool,
    /// Parent actor, `None` for a top-level actor.
    pub parent: Option<ActorId>,
    /// Children in paint order.
    pub children: Vec<ActorId>,
}

/// Arena of actors sharing one class registry.
#[derive(Debug, Clone)]
pub struct Stage {
    classes: Rc<ClassRegistry>,
    actors: Vec<Actor>,
}

impl Stage {
    /// Create an empty stage over `classes`.
    pub fn new(classes: Rc<ClassRegistry>) -> Self {
        Self {
            classes,
            actors: Vec::new(),
        }
    }

    /// The class registry actors are typed against.
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Shared handle to the class registry.
    pub fn classes_rc(&self) -> Rc<ClassRegistry> {
        Rc::clone(&self.classes)
    }

    /// Allocate a detached, visible, realized, reactive and stylable actor.
    pub fn create_actor(&mut self, class: ClassId) -> ActorId {
        let id = ActorId(self.actors.len());
        self.actors.push(Actor {
            class,
            name: None,
            style_classes: Vec::new(),
            pseudo_classes: Vec::new(),
            stylable: true,
            visible: true,
            realized: true,
            reactive: true,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Get an actor by its id.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    /// Get a mutable reference to an actor.
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0)
    }

    /// Number of allocated actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actor has been allocated.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: ActorId, child: ActorId) {
        if self.get(parent).is_none() || self.get(child).is_none() || parent == child {
            return;
        }
        // Refuse to create a cycle
        if self.ancestors(parent).any(|a| a == child) {
            return;
        }
        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child);
        }
        self.actors[parent.0].children.push(child);
        self.actors[child.0].parent = Some(parent);
    }

    /// Detach `child` from `parent`. Does nothing if it is not a child.
    pub fn remove_child(&mut self, parent: ActorId, child: ActorId) {
        let Some(node) = self.actors.get_mut(parent.0) else {
            return;
        };
        let before = node.children.len();
        node.children.retain(|&c| c != child);
        if node.children.len() != before {
            self.actors[child.0].parent = None;
        }
    }

    /// Parent of an actor.
    pub fn parent(&self, id: ActorId) -> Option<ActorId> {
        self.get(id).and_then(|a| a.parent)
    }

    /// Children of an actor.
    pub fn children(&self, id: ActorId) -> &[ActorId] {
        self.get(id).map(|a| a.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate over all ancestors of an actor, from parent to top level.
    pub fn ancestors(&self, id: ActorId) -> Ancestors<'_> {
        Ancestors {
            stage: self,
            current: self.parent(id),
        }
    }

    /// Class of an actor.
    pub fn class_of(&self, id: ActorId) -> Option<ClassId> {
        self.get(id).map(|a| a.class)
    }

    /// Set or clear the style name.
    pub fn set_name(&mut self, id: ActorId, name: Option<&str>) {
        if let Some(actor) = self.get_mut(id) {
            actor.name = name.map(str::to_string);
        }
    }

    /// Add a style class. Returns `false` if it was already present.
    pub fn add_class(&mut self, id: ActorId, class: &str) -> bool {
        self.get_mut(id)
            .is_some_and(|a| insert_unique(&mut a.style_classes, class))
    }

    /// Remove a style class. Returns `false` if it was not present.
    pub fn remove_class(&mut self, id: ActorId, class: &str) -> bool {
        self.get_mut(id)
            .is_some_and(|a| remove_item(&mut a.style_classes, class))
    }

    /// Whether the actor carries the style class.
    pub fn has_class(&self, id: ActorId, class: &str) -> bool {
        self.get(id)
            .is_some_and(|a| a.style_classes.iter().any(|c| c == class))
    }

    /// Add a pseudo-class. Returns `false` if it was already present.
    pub fn add_pseudo_class(&mut self, id: ActorId, pseudo: &str) -> bool {
        self.get_mut(id)
            .is_some_and(|a| insert_unique(&mut a.pseudo_classes, pseudo))
    }

    /// Remove a pseudo-class. Returns `false` if it was not present.
    pub fn remove_pseudo_class(&mut self, id: ActorId, pseudo: &str) -> bool {
        self.get_mut(id)
            .is_some_and(|a| remove_item(&mut a.pseudo_classes, pseudo))
    }

    /// Whether the actor carries the pseudo-class.
    pub fn has_pseudo_class(&self, id: ActorId, pseudo: &str) -> bool {
        self.get(id)
            .is_some_and(|a| a.pseudo_classes.iter().any(|c| c == pseudo))
    }

    /// Whether the actor could take keyboard focus right now: it and all
    /// of its ancestors are visible, it is realized and reactive.
    pub fn is_focusable_now(&self, id: ActorId) -> bool {
        let Some(actor) = self.get(id) else {
            return false;
        };
        actor.visible
            && actor.realized
            && actor.reactive
            && self
                .ancestors(id)
                .all(|a| self.get(a).is_some_and(|p| p.visible))
    }
}

fn insert_unique(list: &mut Vec<String>, item: &str) -> bool {
    if list.iter().any(|c| c == item) {
        return false;
    }
    list.push(item.to_string());
    true
}

fn remove_item(list: &mut Vec<String>, item: &str) -> bool {
    let before = list.len();
    list.retain(|c| c != item);
    list.len() != before
}

/// Iterator over ancestors of an actor.
pub struct Ancestors<'a> {
    stage: &'a Stage,
    current: Option<ActorId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ActorId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.stage.parent(id);
        Some(id)
    }
}

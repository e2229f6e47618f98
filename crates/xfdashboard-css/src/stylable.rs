//! The node capability that selectors are scored against.

use xfdashboard_actor::{ActorId, Stage};

/// Anything a selector can be matched against.
///
/// Implementors are usually cheap `Copy` handles into a tree, so
/// [`Stylable::parent`] returns another handle by value.
pub trait Stylable: Sized {
    /// The node's name, matched by `#id`.
    fn style_name(&self) -> Option<&str>;

    /// Style classes, matched by `.class`.
    fn style_classes(&self) -> &[String];

    /// Pseudo-classes, matched by `:pseudo`.
    fn pseudo_classes(&self) -> &[String];

    /// Inheritance steps from the node's runtime type up to `type_name`, or
    /// `None` if the node is not an instance of that type.
    fn type_distance(&self, type_name: &str) -> Option<u32>;

    /// The direct parent in the tree, stylable or not.
    fn parent(&self) -> Option<Self>;

    /// Whether this node takes part in styling. Non-stylable parents fail
    /// a `>` combinator and are skipped by an ancestor walk.
    fn is_stylable(&self) -> bool {
        true
    }
}

/// A [`Stylable`] view of one actor on a [`Stage`].
#[derive(Debug, Clone, Copy)]
pub struct StageNode<'a> {
    stage: &'a Stage,
    id: ActorId,
}

impl<'a> StageNode<'a> {
    /// Wrap `id`. Returns `None` if the stage has no such actor.
    pub fn new(stage: &'a Stage, id: ActorId) -> Option<Self> {
        stage.get(id).map(|_| Self { stage, id })
    }

    /// The wrapped actor.
    pub const fn id(&self) -> ActorId {
        self.id
    }
}

impl Stylable for StageNode<'_> {
    fn style_name(&self) -> Option<&str> {
        self.stage.get(self.id).and_then(|a| a.name.as_deref())
    }

    fn style_classes(&self) -> &[String] {
        self.stage
            .get(self.id)
            .map(|a| a.style_classes.as_slice())
            .unwrap_or(&[])
    }

    fn pseudo_classes(&self) -> &[String] {
        self.stage
            .get(self.id)
            .map(|a| a.pseudo_classes.as_slice())
            .unwrap_or(&[])
    }

    fn type_distance(&self, type_name: &str) -> Option<u32> {
        let classes = self.stage.classes();
        let target = classes.lookup(type_name)?;
        let class = self.stage.class_of(self.id)?;
        classes.type_distance(class, target)
    }

    fn parent(&self) -> Option<Self> {
        self.stage.parent(self.id).map(|id| Self {
            stage: self.stage,
            id,
        })
    }

    fn is_stylable(&self) -> bool {
        self.stage.get(self.id).is_some_and(|a| a.stylable)
    }
}

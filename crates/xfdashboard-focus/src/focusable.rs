//! The capabilities the focus manager works with.

use std::cell::RefCell;
use std::rc::Rc;

use strum_macros::{AsRefStr, Display, EnumString};
use xfdashboard_actor::{ActorId, ClassId};
use xfdashboard_bindings::KeyEvent;

/// Prefix of the actions handled by [`Focusable::selection_action`].
pub const SELECTION_ACTION_PREFIX: &str = "selection-move-";

/// Shared handle to a registered focusable.
pub type FocusableRef = Rc<RefCell<dyn Focusable>>;

/// Shared handle to an object that only receives actions.
pub type ActionTargetRef = Rc<RefCell<dyn ActionTarget>>;

/// Result of delivering an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    /// The action was consumed; stop delivering it.
    Handled,
    /// The target knows the action but did not consume it.
    Propagate,
    /// The target does not implement the action.
    NotImplemented,
}

impl ActionResult {
    /// Map a "was it consumed" flag.
    pub const fn from_handled(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Propagate }
    }
}

/// Something a binding's action can be delivered to.
pub trait ActionTarget {
    /// Runtime class, used to match a binding's `target`.
    fn class(&self) -> ClassId;

    /// Handle the named action triggered by `event`.
    fn action(&mut self, action: &str, event: &KeyEvent) -> ActionResult {
        let _ = (action, event);
        ActionResult::NotImplemented
    }
}

/// Where a `selection-move-*` action moves the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SelectionTarget {
    /// First selectable item.
    First,
    /// Last selectable item.
    Last,
    /// Item after the current one.
    Next,
    /// Item before the current one.
    Previous,
    /// Item left of the current one.
    Left,
    /// Item right of the current one.
    Right,
    /// Item above the current one.
    Up,
    /// Item below the current one.
    Down,
    /// Item one page to the left.
    PageLeft,
    /// Item one page to the right.
    PageRight,
    /// Item one page up.
    PageUp,
    /// Item one page down.
    PageDown,
}

impl SelectionTarget {
    /// Parse an action name such as `selection-move-next`.
    pub fn from_action(action: &str) -> Option<Self> {
        action.strip_prefix(SELECTION_ACTION_PREFIX)?.parse().ok()
    }
}

/// An object that can hold keyboard focus.
///
/// Everything except [`ActionTarget::class`] has a default, so a type only
/// implements the parts it supports.
pub trait Focusable: ActionTarget {
    /// Whether the object can take focus right now.
    fn can_focus(&self) -> bool {
        true
    }

    /// Whether the object can be styled. Only stylable objects may be
    /// registered with the focus manager.
    fn is_stylable(&self) -> bool {
        true
    }

    /// Called after the object gained focus.
    fn set_focus(&mut self) {}

    /// Called after the object lost focus.
    fn unset_focus(&mut self) {}

    /// Handle a key event no binding consumed. Returns whether it was handled.
    fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        let _ = event;
        false
    }

    /// Whether the object has selectable children.
    fn supports_selection(&self) -> bool {
        false
    }

    /// Currently selected child.
    fn selection(&self) -> Option<ActorId> {
        None
    }

    /// Select `selection`. Returns whether the selection changed.
    fn set_selection(&mut self, selection: Option<ActorId>) -> bool {
        let _ = selection;
        false
    }

    /// Child reached by moving from `from` (or from nothing) in `direction`.
    fn find_selection(&self, from: Option<ActorId>, direction: SelectionTarget) -> Option<ActorId> {
        let _ = (from, direction);
        None
    }

    /// Move the selection in `direction`.
    fn move_selection(&mut self, direction: SelectionTarget) -> ActionResult {
        if !self.supports_selection() {
            return ActionResult::NotImplemented;
        }
        let current = self.selection();
        if let Some(next) = self.find_selection(current, direction)
            && Some(next) != current
        {
            let _ = self.set_selection(Some(next));
        }
        ActionResult::Handled
    }

    /// Built-in handling of the `selection-move-*` actions.
    fn selection_action(&mut self, action: &str) -> ActionResult {
        SelectionTarget::from_action(action)
            .map_or(ActionResult::NotImplemented, |direction| self.move_selection(direction))
    }
}

/// Whether `a` and `b` are the same registered object.
pub fn same_entry(a: &FocusableRef, b: &FocusableRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

//! Keyboard focus for xfdashboard.
//!
//! Objects implementing [`Focusable`] register with a [`FocusManager`],
//! which tracks the one that holds focus, cycles focus through them in
//! registration order and turns key events into actions using a
//! [`BindingsPool`](xfdashboard_bindings::BindingsPool).
//!
//! Everything here is single threaded; entries are shared as
//! `Rc<RefCell<dyn Focusable>>`. Action handlers must not call back into
//! the manager that is delivering the action.

/// Focusable and action target capabilities.
pub mod focusable;
/// The focus manager.
pub mod manager;

pub use focusable::{
    ActionResult, ActionTarget, ActionTargetRef, Focusable, FocusableRef, SELECTION_ACTION_PREFIX,
    SelectionTarget, same_entry,
};
pub use manager::{
    FOCUS_MANAGER_CLASS, FocusAction, FocusManager, FocusNotification, SubscriptionId,
};

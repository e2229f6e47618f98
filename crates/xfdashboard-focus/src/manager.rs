//! The focus manager.
//!
//! Keeps the ordered list of registered focusables and which one holds
//! focus, moves focus around that list and routes key events through the
//! bindings pool to the objects that should handle them.

use std::rc::Rc;

use strum_macros::{AsRefStr, Display, EnumString};
use xfdashboard_actor::{ClassId, ClassRegistry};
use xfdashboard_bindings::{Binding, BindingsPool, KeyEvent};
use xfdashboard_common::warning::warn_once;

use crate::focusable::{ActionResult, ActionTargetRef, FocusableRef, SelectionTarget, same_entry};

/// Class name under which the focus manager receives actions.
pub const FOCUS_MANAGER_CLASS: &str = "FocusManager";

/// Actions the focus manager implements itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FocusAction {
    /// Focus the first focusable, stopping at the current focus.
    FocusMoveFirst,
    /// Focus the last focusable, stopping at the current focus.
    FocusMoveLast,
    /// Focus the next focusable, wrapping around.
    FocusMoveNext,
    /// Focus the previous focusable, wrapping around.
    FocusMovePrevious,
}

/// Change broadcast to subscribers.
#[derive(Clone, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FocusNotification {
    /// A focusable was registered.
    Registered(FocusableRef),
    /// A focusable was unregistered.
    Unregistered(FocusableRef),
    /// Focus moved.
    Changed {
        /// Previous focus.
        old: Option<FocusableRef>,
        /// New focus.
        new: Option<FocusableRef>,
    },
}

/// Handle returned by [`FocusManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Listener = Box<dyn FnMut(&FocusNotification)>;

/// A receiver of a binding's action.
enum Target {
    Manager,
    Application(ActionTargetRef),
    Focusable(FocusableRef),
}

/// Registry of focusable objects and the current focus.
pub struct FocusManager {
    classes: Rc<ClassRegistry>,
    class: Option<ClassId>,
    entries: Vec<FocusableRef>,
    current: Option<FocusableRef>,
    application: Option<ActionTargetRef>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: usize,
}

impl FocusManager {
    /// Create a manager. If `classes` has a [`FOCUS_MANAGER_CLASS`] the
    /// manager itself can be the target of bindings.
    pub fn new(classes: Rc<ClassRegistry>) -> Self {
        let class = classes.lookup(FOCUS_MANAGER_CLASS);
        Self {
            classes,
            class,
            entries: Vec::new(),
            current: None,
            application: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Class registry used to match binding targets.
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Set the application object that bindings may target.
    pub fn set_application(&mut self, application: Option<ActionTargetRef>) {
        self.application = application;
    }

    /// Call `listener` for every registration and focus change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&FocusNotification) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // Registration

    /// Append `focusable` to the registry.
    pub fn register(&mut self, focusable: &FocusableRef) {
        self.register_after(focusable, None);
    }

    /// Insert `focusable` right after `after`, or at the end if `after` is
    /// `None` or not registered.
    pub fn register_after(&mut self, focusable: &FocusableRef, after: Option<&FocusableRef>) {
        if self.is_registered(focusable) {
            tracing::debug!("focusable is already registered");
            return;
        }
        if !focusable.borrow().is_stylable() {
            tracing::warn!("refusing to register a focusable that is not stylable");
            return;
        }

        let index = after
            .and_then(|after| self.index_of(after))
            .map_or(self.entries.len(), |i| i + 1);
        self.entries.insert(index, Rc::clone(focusable));
        tracing::debug!(index, registered = self.entries.len(), "registered focusable");
        self.notify(&FocusNotification::Registered(Rc::clone(focusable)));
    }

    /// Remove `focusable`. If it held focus, focus moves to the next
    /// focusable entry or is cleared.
    pub fn unregister(&mut self, focusable: &FocusableRef) {
        let Some(index) = self.index_of(focusable) else {
            return;
        };

        if self.has_focus(focusable) {
            self.move_focus_away(focusable);
        }

        let removed = self.entries.remove(index);
        tracing::debug!(registered = self.entries.len(), "unregistered focusable");
        self.notify(&FocusNotification::Unregistered(removed));
    }

    /// Whether `focusable` is registered.
    pub fn is_registered(&self, focusable: &FocusableRef) -> bool {
        self.index_of(focusable).is_some()
    }

    /// Registered focusables in order.
    pub fn registered(&self) -> Vec<FocusableRef> {
        self.entries.clone()
    }

    /// Number of registered focusables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Focus

    /// The focused entry.
    pub fn focus(&self) -> Option<FocusableRef> {
        self.current.clone()
    }

    /// Whether `focusable` holds focus.
    pub fn has_focus(&self, focusable: &FocusableRef) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| same_entry(current, focusable))
    }

    /// Focus `focusable`. If it cannot take focus, the next entry that can
    /// is focused instead.
    pub fn set_focus(&mut self, focusable: &FocusableRef) {
        if !self.is_registered(focusable) {
            tracing::warn!("cannot focus an unregistered focusable");
            return;
        }

        let target = if focusable.borrow().can_focus() {
            Some(Rc::clone(focusable))
        } else {
            self.next_focusable(Some(focusable))
        };
        if target.is_some() {
            self.change_focus(target);
        } else {
            tracing::debug!("no focusable can take focus");
        }
    }

    /// The first entry after `from` that can take focus, wrapping around.
    /// `from` itself is the last candidate.
    pub fn next_focusable(&self, from: Option<&FocusableRef>) -> Option<FocusableRef> {
        let len = self.entries.len();
        let start = from.and_then(|f| self.index_of(f)).map_or(0, |i| i + 1);
        (0..len)
            .map(|step| &self.entries[(start + step) % len])
            .find(|entry| entry.borrow().can_focus())
            .cloned()
    }

    /// The first entry before `from` that can take focus, wrapping around.
    /// `from` itself is the last candidate.
    pub fn previous_focusable(&self, from: Option<&FocusableRef>) -> Option<FocusableRef> {
        let len = self.entries.len();
        let start = from.and_then(|f| self.index_of(f)).unwrap_or(len);
        (1..=len)
            .map(|step| &self.entries[(start + len - step) % len])
            .find(|entry| entry.borrow().can_focus())
            .cloned()
    }

    // Lifecycle

    /// `focusable` was destroyed.
    pub fn actor_destroyed(&mut self, focusable: &FocusableRef) {
        self.unregister(focusable);
    }

    /// `focusable` was hidden. It stays registered but loses focus.
    pub fn actor_hidden(&mut self, focusable: &FocusableRef) {
        if self.has_focus(focusable) {
            self.move_focus_away(focusable);
        }
    }

    /// `focusable` was unrealized. It stays registered but loses focus.
    pub fn actor_unrealized(&mut self, focusable: &FocusableRef) {
        self.actor_hidden(focusable);
    }

    // Event routing

    /// Route a key event.
    ///
    /// The event goes to `focusable`, or to the current focus if `None`.
    /// A matching binding's action is delivered to its targets until one
    /// handles it; otherwise the focusable handles the raw event itself.
    /// Returns whether the event was handled.
    pub fn handle_key_event(
        &mut self,
        bindings: &BindingsPool,
        event: &KeyEvent,
        focusable: Option<&FocusableRef>,
    ) -> bool {
        let Some(focusable) = focusable.cloned().or_else(|| self.current.clone()) else {
            return false;
        };

        let class = focusable.borrow().class();
        if let Some(binding) = bindings.find_for_event(&self.classes, class, event) {
            tracing::debug!(%binding, "key event matched binding");
            let targets = if binding.target.is_some() {
                self.targets_for(binding)
            } else {
                vec![Target::Focusable(Rc::clone(&focusable))]
            };
            if self.emit_action(&binding.action, event, targets) {
                return true;
            }
        }

        focusable.borrow_mut().handle_key_event(event)
    }

    /// Run one of the manager's own actions.
    pub fn run_action(&mut self, action: FocusAction) {
        let current = self.current.clone();
        let target = match action {
            FocusAction::FocusMoveNext => self.next_focusable(current.as_ref()),
            FocusAction::FocusMovePrevious => self.previous_focusable(current.as_ref()),
            FocusAction::FocusMoveFirst => self.first_before_current(false),
            FocusAction::FocusMoveLast => self.first_before_current(true),
        };
        if let Some(target) = target {
            self.change_focus(Some(target));
        }
    }

    /// Receivers of `binding`'s action in delivery order: the manager, the
    /// application, then matching focusables starting at the current focus.
    fn targets_for(&self, binding: &Binding) -> Vec<Target> {
        let Some(target) = binding.target.as_deref() else {
            return Vec::new();
        };
        let mut targets = Vec::new();

        if self
            .class
            .is_some_and(|class| self.classes.is_instance_of(class, target))
        {
            targets.push(Target::Manager);
        }

        if let Some(application) = &self.application {
            let class = application.borrow().class();
            if self.classes.is_instance_of(class, target) {
                targets.push(Target::Application(Rc::clone(application)));
            }
        }

        let len = self.entries.len();
        let start = self
            .current
            .as_ref()
            .and_then(|current| self.index_of(current))
            .unwrap_or(0);
        for step in 0..len {
            let entry = &self.entries[(start + step) % len];
            let matches = {
                let entry = entry.borrow();
                self.classes.is_instance_of(entry.class(), target)
                    && (binding.allows_unfocusable_targets() || entry.can_focus())
            };
            if matches {
                targets.push(Target::Focusable(Rc::clone(entry)));
            }
        }

        tracing::trace!(target, count = targets.len(), "collected action targets");
        targets
    }

    /// Deliver `action` to `targets` until one handles it.
    fn emit_action(&mut self, action: &str, event: &KeyEvent, targets: Vec<Target>) -> bool {
        for target in targets {
            let (result, class) = match target {
                Target::Manager => {
                    let result = if let Ok(action) = action.parse::<FocusAction>() {
                        self.run_action(action);
                        ActionResult::Handled
                    } else {
                        ActionResult::NotImplemented
                    };
                    (result, self.class)
                }
                Target::Application(application) => {
                    let mut application = application.borrow_mut();
                    (application.action(action, event), Some(application.class()))
                }
                Target::Focusable(focusable) => {
                    let mut focusable = focusable.borrow_mut();
                    let result = match focusable.action(action, event) {
                        ActionResult::NotImplemented => focusable.selection_action(action),
                        other => other,
                    };
                    (result, Some(focusable.class()))
                }
            };

            match result {
                ActionResult::Handled => {
                    tracing::debug!(action, "action handled");
                    return true;
                }
                ActionResult::Propagate => {}
                ActionResult::NotImplemented => {
                    let class_name = class
                        .and_then(|class| self.classes.name(class))
                        .unwrap_or("<unknown>");
                    let _ = warn_once(
                        "focus",
                        &format!("action '{action}' is not implemented by {class_name}"),
                    );
                }
            }
        }
        false
    }

    /// First focusable from the start (or end, if `reverse`) of the list,
    /// treating the current focus as a boundary.
    fn first_before_current(&self, reverse: bool) -> Option<FocusableRef> {
        let mut ordered: Box<dyn Iterator<Item = &FocusableRef>> = if reverse {
            Box::new(self.entries.iter().rev())
        } else {
            Box::new(self.entries.iter())
        };
        ordered
            .find(|entry| self.has_focus(entry) || entry.borrow().can_focus())
            .filter(|entry| !self.has_focus(entry))
            .cloned()
    }

    /// Move focus off `focusable` to the next entry that can take it, or
    /// clear focus.
    fn move_focus_away(&mut self, focusable: &FocusableRef) {
        let next = self
            .next_focusable(Some(focusable))
            .filter(|next| !same_entry(next, focusable));
        self.change_focus(next);
    }

    fn change_focus(&mut self, new: Option<FocusableRef>) {
        let unchanged = match (&self.current, &new) {
            (Some(current), Some(new)) => same_entry(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        let old = self.current.take();
        if let Some(old) = &old {
            old.borrow_mut().unset_focus();
        }
        if let Some(new) = &new {
            let mut entry = new.borrow_mut();
            entry.set_focus();
            if entry.supports_selection() && entry.selection().is_none() {
                let first = entry.find_selection(None, SelectionTarget::First);
                if first.is_some() {
                    let _ = entry.set_selection(first);
                }
            }
        }
        self.current.clone_from(&new);

        tracing::debug!(focused = new.is_some(), "focus changed");
        self.notify(&FocusNotification::Changed { old, new });
    }

    fn index_of(&self, focusable: &FocusableRef) -> Option<usize> {
        self.entries.iter().position(|entry| same_entry(entry, focusable))
    }

    fn notify(&mut self, notification: &FocusNotification) {
        for (_, listener) in &mut self.listeners {
            listener(notification);
        }
    }
}

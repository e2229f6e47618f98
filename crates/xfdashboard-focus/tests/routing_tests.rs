//! Integration tests for routing key events to actions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use xfdashboard_actor::{ActorId, ClassId, ClassRegistry};
use xfdashboard_bindings::{BindingsPool, EventType, KeyEvent};
use xfdashboard_focus::{
    ActionResult, ActionTarget, ActionTargetRef, FOCUS_MANAGER_CLASS, FocusManager, Focusable,
    FocusableRef, SelectionTarget, same_entry,
};

type Log = Rc<RefCell<Vec<String>>>;

/// Records every action and raw event it receives.
struct Recorder {
    name: &'static str,
    class: ClassId,
    focusable: bool,
    results: HashMap<&'static str, ActionResult>,
    raw_handled: bool,
    items: Vec<ActorId>,
    selected: Option<ActorId>,
    log: Log,
}

impl Recorder {
    fn new(name: &'static str, class: ClassId, log: &Log) -> Self {
        Self {
            name,
            class,
            focusable: true,
            results: HashMap::new(),
            raw_handled: false,
            items: Vec::new(),
            selected: None,
            log: Rc::clone(log),
        }
    }

    fn answers(mut self, action: &'static str, result: ActionResult) -> Self {
        let _ = self.results.insert(action, result);
        self
    }
}

impl ActionTarget for Recorder {
    fn class(&self) -> ClassId {
        self.class
    }

    fn action(&mut self, action: &str, _event: &KeyEvent) -> ActionResult {
        let result = self
            .results
            .get(action)
            .copied()
            .unwrap_or(ActionResult::NotImplemented);
        self.log.borrow_mut().push(format!("{}:{action}", self.name));
        result
    }
}

impl Focusable for Recorder {
    fn can_focus(&self) -> bool {
        self.focusable
    }

    fn handle_key_event(&mut self, _event: &KeyEvent) -> bool {
        self.log.borrow_mut().push(format!("{}:raw", self.name));
        self.raw_handled
    }

    fn supports_selection(&self) -> bool {
        !self.items.is_empty()
    }

    fn selection(&self) -> Option<ActorId> {
        self.selected
    }

    fn set_selection(&mut self, selection: Option<ActorId>) -> bool {
        let changed = self.selected != selection;
        self.selected = selection;
        changed
    }

    fn find_selection(&self, from: Option<ActorId>, direction: SelectionTarget) -> Option<ActorId> {
        use SelectionTarget::{First, Last, Next, Previous};

        let index = from.and_then(|f| self.items.iter().position(|&i| i == f));
        match (direction, index) {
            (First, _) | (Next | Previous, None) => self.items.first().copied(),
            (Last, _) => self.items.last().copied(),
            (Next, Some(i)) => self.items.get(i + 1).copied(),
            (Previous, Some(i)) => i.checked_sub(1).map(|i| self.items[i]),
            _ => None,
        }
    }
}

/// An application object that only receives actions.
struct Application {
    class: ClassId,
    log: Log,
}

impl ActionTarget for Application {
    fn class(&self) -> ClassId {
        self.class
    }

    fn action(&mut self, action: &str, _event: &KeyEvent) -> ActionResult {
        self.log.borrow_mut().push(format!("app:{action}"));
        ActionResult::from_handled(action == "exit")
    }
}

/// ```text
/// FocusManager
/// Application
/// Actor
/// ├── View       (Focusable)
/// │   └── SearchView
/// └── Button
/// ```
fn classes() -> Rc<ClassRegistry> {
    let mut classes = ClassRegistry::new();
    let _ = classes.register(FOCUS_MANAGER_CLASS, None, &[]).unwrap();
    let _ = classes.register("Application", None, &[]).unwrap();
    let _ = classes.register("Actor", None, &[]).unwrap();
    let _ = classes.register("View", Some("Actor"), &["Focusable"]).unwrap();
    let _ = classes.register("SearchView", Some("View"), &[]).unwrap();
    let _ = classes.register("Button", Some("Actor"), &[]).unwrap();
    Rc::new(classes)
}

fn pool(markup: &str) -> BindingsPool {
    let mut pool = BindingsPool::new();
    let _ = pool.load_str(markup, "test-bindings.xml").unwrap();
    pool
}

fn press(spec: &str) -> KeyEvent {
    KeyEvent::from_spec(EventType::KeyPress, spec).unwrap()
}

struct Setup {
    manager: FocusManager,
    log: Log,
    entries: Vec<Rc<RefCell<Recorder>>>,
}

impl Setup {
    fn new(entries: Vec<Recorder>, log: Log) -> Self {
        let mut manager = FocusManager::new(classes());
        let entries: Vec<_> = entries.into_iter().map(|r| Rc::new(RefCell::new(r))).collect();
        for e in &entries {
            manager.register(&(Rc::clone(e) as FocusableRef));
        }
        Self {
            manager,
            log,
            entries,
        }
    }

    fn handle(&self, index: usize) -> FocusableRef {
        Rc::clone(&self.entries[index]) as FocusableRef
    }

    fn focus(&mut self, index: usize) {
        let focusable = self.handle(index);
        self.manager.set_focus(&focusable);
    }

    fn send(&mut self, pool: &BindingsPool, spec: &str) -> bool {
        self.log.borrow_mut().clear();
        self.manager.handle_key_event(pool, &press(spec), None)
    }

    fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

/// Registration is deterministic, so ids from a fresh registry match the
/// manager's.
fn class(name: &str) -> ClassId {
    classes().lookup(name).unwrap()
}

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

// Delivery to the focused entry

#[test]
fn test_binding_without_target_goes_to_focus() {
    let log = new_log();
    let mut setup = Setup::new(
        vec![Recorder::new("view", class("View"), &log).answers("activate", ActionResult::Handled)],
        log,
    );
    setup.focus(0);

    let pool = pool(r#"<bindings><key code="Return" source="View">activate</key></bindings>"#);
    assert!(setup.send(&pool, "Return"));
    assert_eq!(setup.log(), ["view:activate"]);
}

#[test]
fn test_unhandled_action_falls_back_to_raw_event() {
    let log = new_log();
    let mut setup = Setup::new(
        vec![
            Recorder::new("view", class("View"), &log)
                .answers("activate", ActionResult::Propagate),
        ],
        log,
    );
    setup.focus(0);

    let pool = pool(r#"<bindings><key code="Return" source="View">activate</key></bindings>"#);
    assert!(!setup.send(&pool, "Return"));
    assert_eq!(setup.log(), ["view:activate", "view:raw"]);

    setup.entries[0].borrow_mut().raw_handled = true;
    assert!(setup.send(&pool, "a"));
    assert_eq!(setup.log(), ["view:raw"]);
}

#[test]
fn test_nothing_focused_is_not_handled() {
    let log = new_log();
    let mut setup = Setup::new(vec![Recorder::new("view", class("View"), &log)], log);
    let pool = pool(r#"<bindings><key code="Return">activate</key></bindings>"#);
    assert!(!setup.send(&pool, "Return"));
    assert!(setup.log().is_empty());
}

#[test]
fn test_explicit_focusable_overrides_current_focus() {
    let log = new_log();
    let mut setup = Setup::new(
        vec![
            Recorder::new("first", class("View"), &log),
            Recorder::new("second", class("Button"), &log),
        ],
        log,
    );
    setup.focus(0);

    let pool = pool(r#"<bindings><key code="Return" source="Button">press</key></bindings>"#);
    let second = setup.handle(1);
    let _ = setup
        .manager
        .handle_key_event(&pool, &press("Return"), Some(&second));
    assert_eq!(setup.log(), ["second:press", "second:raw"]);
}

// Targets

#[test]
fn test_manager_handles_focus_actions() {
    let log = new_log();
    let mut setup = Setup::new(
        vec![
            Recorder::new("a", class("View"), &log),
            Recorder::new("b", class("Button"), &log),
        ],
        log,
    );
    setup.focus(0);

    let pool = pool(
        r#"<bindings>
  <key code="Tab" source="Actor" target="FocusManager">focus-move-next</key>
</bindings>"#,
    );
    assert!(setup.send(&pool, "Tab"));
    assert!(setup.manager.has_focus(&setup.handle(1)));
    assert!(setup.send(&pool, "Tab"));
    assert!(setup.manager.has_focus(&setup.handle(0)));
    assert!(setup.log().is_empty());
}

#[test]
fn test_targets_start_at_current_focus_and_stop_when_handled() {
    let log = new_log();
    let mut setup = Setup::new(
        vec![
            Recorder::new("v0", class("View"), &log).answers("refresh", ActionResult::Handled),
            Recorder::new("button", class("Button"), &log),
            Recorder::new("v2", class("SearchView"), &log)
                .answers("refresh", ActionResult::Propagate),
            Recorder::new("v3", class("View"), &log).answers("refresh", ActionResult::Handled),
        ],
        log,
    );
    setup.focus(2);

    let pool = pool(r#"<bindings><key code="F5" target="Focusable">refresh</key></bindings>"#);
    assert!(setup.send(&pool, "F5"));
    assert_eq!(setup.log(), ["v2:refresh", "v3:refresh"]);
}

#[test]
fn test_not_implemented_target_is_skipped() {
    let log = new_log();
    let mut setup = Setup::new(
        vec![
            Recorder::new("silent", class("View"), &log),
            Recorder::new("worker", class("View"), &log).answers("refresh", ActionResult::Handled),
        ],
        log,
    );
    setup.focus(0);

    let pool = pool(r#"<bindings><key code="F5" target="View">refresh</key></bindings>"#);
    assert!(setup.send(&pool, "F5"));
    assert_eq!(setup.log(), ["silent:refresh", "worker:refresh"]);
}

#[test]
fn test_unfocusable_targets_need_permission() {
    let log = new_log();
    let mut hidden =
        Recorder::new("hidden", class("Button"), &log).answers("refresh", ActionResult::Handled);
    hidden.focusable = false;
    let mut setup = Setup::new(
        vec![Recorder::new("view", class("View"), &log), hidden],
        log,
    );
    setup.focus(0);

    let strict = pool(r#"<bindings><key code="F5" target="Button">refresh</key></bindings>"#);
    assert!(!setup.send(&strict, "F5"));
    assert_eq!(setup.log(), ["view:raw"]);

    let lenient = pool(
        r#"<bindings><key code="F5" target="Button" allow-unfocusable-targets="true">refresh</key></bindings>"#,
    );
    assert!(setup.send(&lenient, "F5"));
    assert_eq!(setup.log(), ["hidden:refresh"]);
}

#[test]
fn test_application_receives_actions_before_focusables() {
    let log = new_log();
    let mut setup = Setup::new(
        vec![Recorder::new("view", class("View"), &log).answers("exit", ActionResult::Handled)],
        Rc::clone(&log),
    );
    let application: ActionTargetRef = Rc::new(RefCell::new(Application {
        class: class("Application"),
        log: Rc::clone(&log),
    }));
    setup.manager.set_application(Some(application));
    setup.focus(0);

    let pool = pool(
        r#"<bindings>
  <key code="Escape" target="Application">exit</key>
  <key code="q" target="Application">quit</key>
</bindings>"#,
    );
    assert!(setup.send(&pool, "Escape"));
    assert_eq!(setup.log(), ["app:exit"]);

    // Application does not consume "quit" and the view is not a target
    assert!(!setup.send(&pool, "q"));
    assert_eq!(setup.log(), ["app:quit", "view:raw"]);
}

#[test]
fn test_no_binding_delivers_raw_event() {
    let log = new_log();
    let mut setup = Setup::new(vec![Recorder::new("view", class("View"), &log)], log);
    setup.focus(0);
    let pool = BindingsPool::new();
    assert!(!setup.send(&pool, "x"));
    assert_eq!(setup.log(), ["view:raw"]);
}

// Selection

#[test]
fn test_focus_selects_first_item() {
    let log = new_log();
    let mut list = Recorder::new("list", class("View"), &log);
    list.items = vec![ActorId(10), ActorId(11), ActorId(12)];
    let mut setup = Setup::new(vec![list], log);
    setup.focus(0);
    assert_eq!(setup.entries[0].borrow().selected, Some(ActorId(10)));
}

#[test]
fn test_selection_actions_are_built_in() {
    let log = new_log();
    let mut list = Recorder::new("list", class("View"), &log);
    list.items = vec![ActorId(10), ActorId(11), ActorId(12)];
    let mut setup = Setup::new(vec![list], log);
    setup.focus(0);

    let pool = pool(
        r#"<bindings>
  <key code="Down" source="View">selection-move-next</key>
  <key code="End" source="View">selection-move-last</key>
</bindings>"#,
    );
    assert!(setup.send(&pool, "Down"));
    assert_eq!(setup.entries[0].borrow().selected, Some(ActorId(11)));
    assert!(setup.send(&pool, "End"));
    assert_eq!(setup.entries[0].borrow().selected, Some(ActorId(12)));

    // Already at the end: handled, selection unchanged
    assert!(setup.send(&pool, "Down"));
    assert_eq!(setup.entries[0].borrow().selected, Some(ActorId(12)));
}

#[test]
fn test_selection_action_without_selection_support() {
    let log = new_log();
    let mut setup = Setup::new(vec![Recorder::new("plain", class("Button"), &log)], log);
    setup.focus(0);
    let pool = pool(r#"<bindings><key code="Down">selection-move-next</key></bindings>"#);
    assert!(!setup.send(&pool, "Down"));
    assert_eq!(setup.log(), ["plain:selection-move-next", "plain:raw"]);
    assert!(same_entry(&setup.manager.focus().unwrap(), &setup.handle(0)));
}

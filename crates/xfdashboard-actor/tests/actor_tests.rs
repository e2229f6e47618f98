//! Tests for the class registry and the actor tree.

use std::rc::Rc;

use xfdashboard_actor::{ClassError, ClassRegistry, Stage};

fn widget_classes() -> ClassRegistry {
    let mut classes = ClassRegistry::new();
    let _ = classes.register("Actor", None, &[]).unwrap();
    let _ = classes.register("Widget", Some("Actor"), &["Stylable"]).unwrap();
    let _ = classes
        .register("Button", Some("Widget"), &["Focusable"])
        .unwrap();
    let _ = classes
        .register("ToggleButton", Some("Button"), &["Focusable", "Toggle"])
        .unwrap();
    classes
}

// ========== ClassRegistry ==========

#[test]
fn test_register_and_lookup() {
    let classes = widget_classes();
    let button = classes.lookup("Button").unwrap();
    assert_eq!(classes.name(button), Some("Button"));
    assert_eq!(classes.parent(button), classes.lookup("Widget"));
    assert_eq!(classes.len(), 4);
}

#[test]
fn test_duplicate_class_is_rejected() {
    let mut classes = widget_classes();
    assert_eq!(
        classes.register("Button", Some("Widget"), &[]),
        Err(ClassError::DuplicateClass("Button".to_string()))
    );
}

#[test]
fn test_unknown_parent_is_rejected() {
    let mut classes = ClassRegistry::new();
    let err = classes.register("Label", Some("Missing"), &[]).unwrap_err();
    assert!(matches!(err, ClassError::UnknownParent { ref parent, .. } if parent == "Missing"));
    assert!(classes.is_empty());
}

#[test]
fn test_lineage_is_most_derived_first() {
    let classes = widget_classes();
    let toggle = classes.lookup("ToggleButton").unwrap();
    let names: Vec<&str> = classes
        .lineage(toggle)
        .filter_map(|c| classes.name(c))
        .collect();
    assert_eq!(names, ["ToggleButton", "Button", "Widget", "Actor"]);
    assert_eq!(classes.depth(toggle), 3);
}

#[test]
fn test_type_distance() {
    let classes = widget_classes();
    let toggle = classes.lookup("ToggleButton").unwrap();
    let widget = classes.lookup("Widget").unwrap();
    assert_eq!(classes.type_distance(toggle, toggle), Some(0));
    assert_eq!(classes.type_distance(toggle, widget), Some(2));
    assert_eq!(classes.type_distance(widget, toggle), None);
    assert!(classes.is_a(toggle, widget));
    assert!(!classes.is_a(widget, toggle));
}

#[test]
fn test_interfaces_are_deduplicated_in_discovery_order() {
    let classes = widget_classes();
    let toggle = classes.lookup("ToggleButton").unwrap();
    assert_eq!(
        classes.interfaces(toggle),
        ["Focusable", "Toggle", "Stylable"]
    );
    assert!(classes.implements(toggle, "Stylable"));
    assert!(!classes.implements(classes.lookup("Actor").unwrap(), "Stylable"));
}

#[test]
fn test_is_instance_of_accepts_classes_and_interfaces() {
    let classes = widget_classes();
    let button = classes.lookup("Button").unwrap();
    assert!(classes.is_instance_of(button, "Widget"));
    assert!(classes.is_instance_of(button, "Focusable"));
    assert!(!classes.is_instance_of(button, "ToggleButton"));
    assert!(!classes.is_instance_of(button, "Unknown"));
}

// ========== Stage ==========

#[test]
fn test_append_and_reparent() {
    let classes = Rc::new(widget_classes());
    let widget = classes.lookup("Widget").unwrap();
    let mut stage = Stage::new(Rc::clone(&classes));

    let a = stage.create_actor(widget);
    let b = stage.create_actor(widget);
    let child = stage.create_actor(widget);

    stage.append_child(a, child);
    assert_eq!(stage.parent(child), Some(a));
    assert_eq!(stage.children(a), &[child]);

    stage.append_child(b, child);
    assert_eq!(stage.parent(child), Some(b));
    assert!(stage.children(a).is_empty());
}

#[test]
fn test_append_refuses_cycles() {
    let classes = Rc::new(widget_classes());
    let widget = classes.lookup("Widget").unwrap();
    let mut stage = Stage::new(classes);

    let root = stage.create_actor(widget);
    let child = stage.create_actor(widget);
    stage.append_child(root, child);
    stage.append_child(child, root);

    assert_eq!(stage.parent(root), None);
    assert_eq!(stage.ancestors(child).collect::<Vec<_>>(), vec![root]);
}

#[test]
fn test_style_classes_keep_insertion_order() {
    let classes = Rc::new(widget_classes());
    let widget = classes.lookup("Widget").unwrap();
    let mut stage = Stage::new(classes);
    let actor = stage.create_actor(widget);

    assert!(stage.add_class(actor, "primary"));
    assert!(stage.add_class(actor, "large"));
    assert!(!stage.add_class(actor, "primary"));
    assert_eq!(stage.get(actor).unwrap().style_classes, ["primary", "large"]);

    assert!(stage.remove_class(actor, "primary"));
    assert!(!stage.has_class(actor, "primary"));
    assert!(stage.has_class(actor, "large"));
}

#[test]
fn test_pseudo_classes() {
    let classes = Rc::new(widget_classes());
    let widget = classes.lookup("Widget").unwrap();
    let mut stage = Stage::new(classes);
    let actor = stage.create_actor(widget);

    assert!(stage.add_pseudo_class(actor, "focus"));
    assert!(stage.has_pseudo_class(actor, "focus"));
    assert!(stage.remove_pseudo_class(actor, "focus"));
    assert!(!stage.remove_pseudo_class(actor, "focus"));
}

#[test]
fn test_focusable_now_respects_hidden_ancestors() {
    let classes = Rc::new(widget_classes());
    let widget = classes.lookup("Widget").unwrap();
    let mut stage = Stage::new(classes);
    let parent = stage.create_actor(widget);
    let child = stage.create_actor(widget);
    stage.append_child(parent, child);

    assert!(stage.is_focusable_now(child));
    stage.get_mut(parent).unwrap().visible = false;
    assert!(!stage.is_focusable_now(child));
}

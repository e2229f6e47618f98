//! Integration tests for the bindings file format.

use xfdashboard_bindings::{BindingFlags, BindingsError, BindingsPool, EventType, Modifiers};

fn load(markup: &str) -> Result<BindingsPool, BindingsError> {
    let mut pool = BindingsPool::new();
    let _ = pool.load_str(markup, "bindings.xml")?;
    Ok(pool)
}

fn position(err: &BindingsError) -> (u32, u32) {
    match err {
        BindingsError::MalformedConfig { line, column, .. } => (*line, *column),
        other => panic!("expected a markup error, got {other:?}"),
    }
}

#[test]
fn test_key_attributes() {
    let pool = load(
        r#"<?xml version="1.0"?>
<bindings version="1">
  <!-- application-wide -->
  <key code="&lt;Ctrl&gt;+q" source="Core" when="released" target="Application"
       allow-unfocusable-targets="true">  exit  </key>
</bindings>"#,
    )
    .unwrap();

    let binding = pool.iter().next().unwrap();
    assert_eq!(binding.class_name.as_deref(), Some("Core"));
    assert_eq!(binding.key, u32::from('q'));
    assert_eq!(binding.modifiers, Modifiers::CONTROL);
    assert_eq!(binding.event_type, EventType::KeyRelease);
    assert_eq!(binding.action, "exit");
    assert_eq!(binding.target.as_deref(), Some("Application"));
    assert!(binding.allows_unfocusable_targets());
}

#[test]
fn test_defaults() {
    let pool = load(r#"<bindings><key code="Escape">close</key></bindings>"#).unwrap();
    let binding = pool.iter().next().unwrap();
    assert_eq!(binding.class_name, None);
    assert_eq!(binding.event_type, EventType::KeyPress);
    assert_eq!(binding.target, None);
    assert_eq!(binding.flags, BindingFlags::empty());
}

#[test]
fn test_class_blocks_set_the_source() {
    let pool = load(
        r#"<bindings>
  <SearchView>
    <key code="Down">selection-move-next</key>
    <key code="Up" source="SearchView">selection-move-previous</key>
  </SearchView>
</bindings>"#,
    )
    .unwrap();

    assert_eq!(pool.len(), 2);
    assert!(pool.iter().all(|b| b.class_name.as_deref() == Some("SearchView")));
}

#[test]
fn test_later_duplicate_in_one_file_wins() {
    let pool = load(
        r#"<bindings>
  <key code="F5" source="Core">refresh</key>
  <key code="F5" source="Core">reload</key>
  <key code="F5" source="Core" when="released">other</key>
</bindings>"#,
    )
    .unwrap();

    assert_eq!(pool.len(), 2);
    let pressed = pool
        .iter()
        .find(|b| b.event_type == EventType::KeyPress)
        .unwrap();
    assert_eq!(pressed.action, "reload");
}

#[test]
fn test_missing_code_reports_position() {
    let err = load("<bindings>\n  <key when=\"pressed\">x</key>\n</bindings>").unwrap_err();
    assert_eq!(position(&err), (2, 3));
    assert!(err.to_string().contains("'code'"), "{err}");
    assert!(err.to_string().starts_with("bindings.xml:2:3:"), "{err}");
}

#[test]
fn test_invalid_attribute_values() {
    let cases = [
        r#"<bindings><key code="&lt;Fancy&gt;a">x</key></bindings>"#,
        r#"<bindings><key code="NoSuchKey">x</key></bindings>"#,
        r#"<bindings><key code="a b">x</key></bindings>"#,
        r#"<bindings><key code=" + ">x</key></bindings>"#,
        r#"<bindings><key code="a" when="sometimes">x</key></bindings>"#,
        r#"<bindings><key code="a" allow-unfocusable-targets="maybe">x</key></bindings>"#,
        r#"<bindings><key code="a" target="">x</key></bindings>"#,
        r#"<bindings><key code="a" colour="red">x</key></bindings>"#,
    ];
    for markup in cases {
        let err = load(markup).unwrap_err();
        assert_eq!(position(&err), (1, 11), "{markup}: {err}");
    }
}

#[test]
fn test_structure_errors() {
    let cases = [
        ("<bindings><key code=\"a\">  </key></bindings>", (1, 11)),
        ("<bindings><key code=\"a\"><b/></key></bindings>", (1, 25)),
        ("<bindings>stray</bindings>", (1, 11)),
        ("<keys/>", (1, 1)),
        ("<bindings version=\"2\"/>", (1, 1)),
        ("<bindings/><bindings/>", (1, 12)),
        (
            "<bindings>\n  <Core>\n    <key code=\"a\" source=\"Other\">x</key>\n  </Core>\n</bindings>",
            (3, 5),
        ),
        ("<bindings><Core name=\"x\"/></bindings>", (1, 11)),
        ("<bindings><Core><Inner/></Core></bindings>", (1, 17)),
    ];
    for (markup, expected) in cases {
        let err = load(markup).unwrap_err();
        assert_eq!(position(&err), expected, "{markup}: {err}");
    }
}

#[test]
fn test_empty_document_is_an_error() {
    let err = load("  <!-- nothing -->  ").unwrap_err();
    assert!(matches!(err, BindingsError::MalformedConfig { .. }), "{err}");
}

#[test]
fn test_ill_formed_xml_is_an_error() {
    let err = load("<bindings>\n  <key code=\"a\">x</kee>\n</bindings>").unwrap_err();
    let (line, _) = position(&err);
    assert_eq!(line, 2);
}

#[test]
fn test_failed_parse_leaves_pool_unchanged() {
    let mut pool = load(r#"<bindings><key code="a">first</key></bindings>"#).unwrap();
    let result = pool.load_str(
        r#"<bindings><key code="a">second</key><key code="??">x</key></bindings>"#,
        "broken.xml",
    );
    assert!(result.is_err());
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.iter().next().unwrap().action, "first");
}

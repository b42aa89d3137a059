//! Resolution of effective values and the CSS they compile to.

mod support;

use fontsync::config::{CODE_FONT_FAMILY, ROOT};
use fontsync::{Properties, Property, ScopeId};
use insta::assert_snapshot;
use support::{Harness, doc};

#[test]
fn test_document_override_beats_global() {
    let h = Harness::enabled();
    h.tracker.open("a");
    h.tracker.open("b");

    h.manager.set_code_font_size(None, Some("13px")).unwrap();
    h.manager.set_code_font_size(Some("a"), Some("16px")).unwrap();

    assert_eq!(h.manager.code_font_size(Some("a")), "16px");
    assert_eq!(h.manager.code_font_size(Some("b")), "13px");
    assert_eq!(h.manager.code_font_size(None), "13px");
}

#[test]
fn test_unset_properties_fall_through() {
    let h = Harness::enabled();
    h.tracker.open("a");
    h.manager.set_code_line_height(None, Some("1.75")).unwrap();
    h.manager.set_code_font_size(Some("a"), Some("16px")).unwrap();

    assert_eq!(h.manager.code_line_height(Some("a")), "1.75");
    assert_eq!(h.manager.code_font_family(Some("a")), "Source Code Pro");
    assert_eq!(
        h.manager.document_overrides("a").unwrap(),
        Properties::FONT_SIZE
    );
}

#[test]
fn test_clearing_an_override_inherits_again() {
    let h = Harness::enabled();
    h.tracker.open("a");
    h.manager.set_code_font_size(Some("a"), Some("16px")).unwrap();
    h.manager.set_code_font_size(Some("a"), None).unwrap();
    assert_eq!(h.manager.code_font_size(Some("a")), "13px");

    h.manager.set_code_font_size(None, Some("14px")).unwrap();
    assert_eq!(h.manager.code_font_size(Some("a")), "14px");
    assert!(h.manager.document_overrides("a").unwrap().is_empty());
}

#[test]
fn test_font_family_quoting_round_trip() {
    let h = Harness::enabled();
    h.tracker.open("a");

    h.manager.set_code_font_family(None, Some("Fira Code")).unwrap();
    assert_eq!(h.manager.code_font_family(None), "Fira Code");
    assert_eq!(
        h.manager.global_value(Property::FontFamily).as_deref(),
        Some(r#""Fira Code", "Source Code Pro", monospace"#)
    );

    h.manager.set_code_font_family(Some("a"), Some("Iosevka")).unwrap();
    assert_eq!(h.manager.code_font_family(Some("a")), "Iosevka");
    let styles = h.manager.document_styles("a").unwrap();
    assert_eq!(
        styles.lookup(&[ROOT, CODE_FONT_FAMILY]),
        Ok(r#""Iosevka", monospace"#)
    );
}

#[test]
fn test_global_css() {
    let h = Harness::enabled();
    h.manager.set_code_font_family(None, Some("Fira Code")).unwrap();
    h.manager.set_code_font_size(None, Some("14px")).unwrap();

    assert_snapshot!(h.css(&ScopeId::Global).unwrap(), @r#"
    :root {
      --jp-code-font-family: "Fira Code", "Source Code Pro", monospace;
      --jp-code-font-size: 14px;
    }
    "#);
}

#[test]
fn test_document_css_is_scoped_to_its_id() {
    let h = Harness::enabled();
    h.tracker.open("nb-1");
    h.tracker.open("nb-10");
    h.manager.set_code_font_size(Some("nb-1"), Some("16px")).unwrap();
    h.manager.set_code_line_height(Some("nb-10"), Some("2")).unwrap();

    let first = h.css(&doc("nb-1")).unwrap();
    let second = h.css(&doc("nb-10")).unwrap();
    assert_eq!(first, "#nb-1 {\n  --jp-code-font-size: 16px;\n}\n");
    assert_eq!(second, "#nb-10 {\n  --jp-code-line-height: 2;\n}\n");
    assert!(!first.contains("#nb-10"));
}

#[test]
fn test_disabled_global_suppresses_global_only() {
    let mut h = Harness::enabled();
    h.tracker.open("a");
    h.manager.set_code_font_size(None, Some("15px")).unwrap();
    h.manager.set_code_font_size(Some("a"), Some("16px")).unwrap();
    h.tick();
    assert!(!h.live(&ScopeId::Global).unwrap().is_empty());

    h.manager.set_enabled(false).unwrap();
    h.tick();

    assert_eq!(h.css(&ScopeId::Global).as_deref(), Some(""));
    assert_eq!(h.live(&ScopeId::Global).as_deref(), Some(""));
    assert_eq!(
        h.live(&doc("a")).as_deref(),
        Some("#a {\n  --jp-code-font-size: 16px;\n}\n")
    );

    // Values are still reported while disabled.
    assert_eq!(h.manager.code_font_size(None), "15px");
}

#[test]
fn test_nested_global_styles_pass_through() {
    let h = Harness::enabled();
    let styles: fcss::StyleTree = serde_json::from_str(
        r#"{
            ":root": { "--jp-code-font-size": "12px" },
            ".jp-CodeCell": { "&:hover": { "opacity": "0.9" } },
            "@font-face": { "font-family": "Fira Code", "src": "url(fira.woff2)" }
        }"#,
    )
    .unwrap();
    h.manager.set_global_styles(&styles).unwrap();

    assert_snapshot!(h.css(&ScopeId::Global).unwrap(), @r#"
    :root {
      --jp-code-font-size: 12px;
    }
    .jp-CodeCell:hover {
      opacity: 0.9;
    }
    @font-face {
      font-family: Fira Code;
      src: url(fira.woff2);
    }
    "#);
}

use codefonts::{Error, compile_document, compile_settings};
use insta::assert_snapshot;

#[test]
fn test_disabled_settings_compile_to_nothing() {
    let css = compile_settings(
        r#"{"enabled": false, "styles": {":root": {"--jp-code-font-size": "14px"}}}"#,
    )
    .unwrap();
    assert_eq!(css, "");
    assert_eq!(compile_settings("{}").unwrap(), "");
}

#[test]
fn test_global_settings() {
    let css = compile_settings(
        r#"{
            "enabled": true,
            "styles": {
                ":root": {
                    "--jp-code-font-family": "\"Fira Code\", \"Source Code Pro\", monospace",
                    "--jp-code-line-height": "1.5"
                },
                ".jp-Notebook": { "fontVariantLigatures": "none" }
            }
        }"#,
    )
    .unwrap();
    assert_snapshot!(css, @r#"
    :root {
      --jp-code-font-family: "Fira Code", "Source Code Pro", monospace;
      --jp-code-line-height: 1.5;
    }
    .jp-Notebook {
      font-variant-ligatures: none;
    }
    "#);
}

#[test]
fn test_document_section() {
    let css = compile_document(
        r#"{"styles": {":root": {"--jp-code-font-size": "18px"}}, "other": 1}"#,
        "nb-2",
    )
    .unwrap();
    assert_eq!(css, "#nb-2 {\n  --jp-code-font-size: 18px;\n}\n");
}

#[test]
fn test_errors() {
    assert!(matches!(compile_settings("{"), Err(Error::Json(_))));
    assert!(matches!(
        compile_settings(r#"{"enabled": true, "styles": "red"}"#),
        Err(Error::Compile(_))
    ));
    assert!(matches!(compile_document("[1]", "nb"), Err(Error::Compile(_))));
}

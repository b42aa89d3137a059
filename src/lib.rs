pub mod error;

use fcss::{StyleTree, compile, id_selector};
use fontsync::config::{ENABLED_KEY, STYLES_KEY};
use serde_json::Value;

pub use error::{Error, Result};
pub use fcss;
pub use fontsync;
pub use fontsync::{FontManager, Property, ScopeId};

/// Compiles a raw global settings document into the global CSS text.
///
/// Disabled settings compile to an empty string.
///
/// ```
/// let css = codefonts::compile_settings(
///     r#"{"enabled": true, "styles": {":root": {"--jp-code-font-size": "14px"}}}"#,
/// )
/// .unwrap();
/// assert_eq!(css, ":root {\n  --jp-code-font-size: 14px;\n}\n");
/// ```
pub fn compile_settings(json: &str) -> Result<String> {
    let settings: Value = serde_json::from_str(json)?;
    let enabled = settings
        .get(ENABLED_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !enabled {
        log::debug!("settings are disabled, nothing to compile");
        return Ok(String::new());
    }
    let styles = StyleTree::from_optional_json(settings.get(STYLES_KEY))?;
    Ok(compile(&styles, None))
}

/// Compiles one document's override section (`{"styles": {...}}`) scoped to
/// the element with id `document_id`.
pub fn compile_document(json: &str, document_id: &str) -> Result<String> {
    let section: Value = serde_json::from_str(json)?;
    let styles = match &section {
        Value::Object(map) => StyleTree::from_optional_json(map.get(STYLES_KEY))?,
        other => StyleTree::from_json(other)?,
    };
    Ok(compile(&styles, Some(&id_selector(document_id))))
}

//! Validating conversion between JSON values and [`StyleTree`]s.
//!
//! Stored configuration arrives as untyped JSON. This is the only place it is
//! inspected: objects become trees, strings become leaves, and everything
//! else is dropped with a debug log line. A value that is not an object at
//! the top level is a [`CompileError`].

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::CompileError;
use crate::tree::{StyleTree, StyleValue};

impl StyleTree {
    /// Builds a tree from a JSON object, dropping malformed entries.
    ///
    /// ```rust
    /// use fcss::StyleTree;
    /// use serde_json::json;
    ///
    /// let tree = StyleTree::from_json(&json!({
    ///     ":root": { "--jp-code-font-size": "14px", "--bogus": 12 },
    /// }))
    /// .unwrap();
    /// assert_eq!(tree.lookup(&[":root", "--jp-code-font-size"]), Ok("14px"));
    /// assert!(tree.lookup(&[":root", "--bogus"]).is_err());
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, CompileError> {
        match value {
            Value::Object(map) => Ok(parse_object(map, "")),
            other => Err(CompileError::NotAMapping {
                found: kind_name(other),
            }),
        }
    }

    /// Like [`StyleTree::from_json`], but a missing or `null` value is an empty tree.
    pub fn from_optional_json(value: Option<&Value>) -> Result<Self, CompileError> {
        match value {
            None | Some(Value::Null) => Ok(StyleTree::new()),
            Some(value) => StyleTree::from_json(value),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in self.iter() {
            let value = match value {
                StyleValue::Leaf(leaf) => Value::String(leaf.clone()),
                StyleValue::Tree(tree) => tree.to_json(),
            };
            map.insert(key.to_string(), value);
        }
        Value::Object(map)
    }
}

fn parse_object(map: &Map<String, Value>, path: &str) -> StyleTree {
    let mut tree = StyleTree::new();
    for (key, value) in map {
        let entry_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}/{key}")
        };
        if !is_valid_fragment(key) || key.trim().is_empty() {
            log::debug!("dropping style entry with invalid key {entry_path:?}");
            continue;
        }
        match value {
            Value::String(leaf) if is_valid_fragment(leaf) => {
                tree.insert(key, leaf.as_str());
            }
            Value::Object(child) => {
                tree.insert(key, parse_object(child, &entry_path));
            }
            other => {
                log::debug!(
                    "dropping malformed style entry {entry_path:?}: expected string or mapping, found {}",
                    kind_name(other)
                );
            }
        }
    }
    tree
}

/// Block delimiters would let a key or value escape its rule.
fn is_valid_fragment(text: &str) -> bool {
    !text.contains(['{', '}'])
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

impl Serialize for StyleTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            match value {
                StyleValue::Leaf(leaf) => map.serialize_entry(key, leaf)?,
                StyleValue::Tree(tree) => map.serialize_entry(key, tree)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StyleTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        StyleTree::from_optional_json(Some(&value)).map_err(de::Error::custom)
    }
}

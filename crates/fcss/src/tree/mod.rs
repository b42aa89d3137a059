//! Nested style declarations.
//!
//! A [`StyleTree`] is an ordered mapping from keys to [`StyleValue`]s, where a
//! value is either a leaf CSS property value or another tree. Keys fall into
//! three kinds, see [`KeyKind`]:
//!
//! ```json
//! {
//!     ":root": { "--jp-code-font-size": "16px" },
//!     ".CodeMirror": { "letter-spacing": "0.02em" },
//!     "@font-face": { "font-family": "Fira Code", "src": "url(fira.woff2)" }
//! }
//! ```
//!
//! Trees are only ever built through the validating parse step in [`parse`]
//! or through the typed mutators below, so every leaf is a string and every
//! branch is a well-formed tree.

pub mod parse;

use indexmap::IndexMap;

use crate::error::ResolutionError;

/// The reserved key whose children are the top-level properties of a scope.
pub const ROOT: &str = ":root";

/// How a key inside a [`StyleTree`] is interpreted by the compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    /// The [`ROOT`] sentinel.
    Root,
    /// A key starting with `@`, emitted verbatim at the top level.
    AtRule,
    /// Anything else: a nested selector, or a property name for leaf values.
    Selector,
}

impl KeyKind {
    pub fn of(key: &str) -> Self {
        if key == ROOT {
            KeyKind::Root
        } else if key.starts_with('@') {
            KeyKind::AtRule
        } else {
            KeyKind::Selector
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleValue {
    Leaf(String),
    Tree(StyleTree),
}

impl StyleValue {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            StyleValue::Leaf(value) => Some(value.as_str()),
            StyleValue::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&StyleTree> {
        match self {
            StyleValue::Tree(tree) => Some(tree),
            StyleValue::Leaf(_) => None,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Leaf(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Leaf(value)
    }
}

impl From<StyleTree> for StyleValue {
    fn from(tree: StyleTree) -> Self {
        StyleValue::Tree(tree)
    }
}

/// An ordered, validated nested style declaration.
///
/// Entry order is preserved so that compiling the same tree always produces
/// the same text. Equality ignores order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleTree {
    entries: IndexMap<String, StyleValue>,
}

impl StyleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, returning the updated tree for chaining.
    ///
    /// ```rust
    /// use fcss::{StyleTree, ROOT};
    ///
    /// let tree = StyleTree::new()
    ///     .with(ROOT, StyleTree::new().with("--jp-code-font-size", "16px"))
    ///     .with(".cm-line", StyleTree::new().with("letter-spacing", "0.02em"));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn with<V: Into<StyleValue>>(mut self, key: &str, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut StyleValue> {
        self.entries.get_mut(key)
    }

    /// Inserts or replaces an entry. A replaced entry keeps its position.
    pub fn insert<V: Into<StyleValue>>(&mut self, key: &str, value: V) -> Option<StyleValue> {
        self.entries.insert(key.to_string(), value.into())
    }

    /// Removes an entry, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.entries.shift_remove(key)
    }

    /// The children of the [`ROOT`] entry, if it is a tree.
    pub fn root(&self) -> Option<&StyleTree> {
        self.get(ROOT).and_then(StyleValue::as_tree)
    }

    /// Reads the leaf at `path`.
    ///
    /// Every key but the last must name a tree; the last must name a leaf.
    pub fn lookup(&self, path: &[&str]) -> Result<&str, ResolutionError> {
        let mut current = self;
        for (depth, key) in path.iter().enumerate() {
            let value = current.get(key).ok_or_else(|| ResolutionError::MissingPath {
                path: path[..=depth].join("/"),
            })?;
            let is_last = depth + 1 == path.len();
            match (value, is_last) {
                (StyleValue::Leaf(leaf), true) => return Ok(leaf.as_str()),
                (StyleValue::Tree(tree), false) => current = tree,
                _ => {
                    return Err(ResolutionError::WrongShape {
                        path: path[..=depth].join("/"),
                    });
                }
            }
        }
        Err(ResolutionError::WrongShape {
            path: path.join("/"),
        })
    }

    /// Writes (`Some`) or removes (`None`) the leaf at `path`.
    ///
    /// Missing intermediate trees are created on write. An intermediate leaf
    /// standing in the way is replaced by a tree.
    pub fn set_path(&mut self, path: &[&str], value: Option<String>) {
        match path {
            [] => {}
            [last] => match value {
                Some(value) => {
                    self.insert(last, value);
                }
                None => {
                    self.remove(last);
                }
            },
            [head, rest @ ..] => {
                if !matches!(self.get(head), Some(StyleValue::Tree(_))) {
                    if value.is_none() {
                        return;
                    }
                    self.insert(head, StyleTree::new());
                }
                if let Some(StyleValue::Tree(child)) = self.get_mut(head) {
                    child.set_path(rest, value);
                }
            }
        }
    }
}

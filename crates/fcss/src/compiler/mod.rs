//! Compilation of [`StyleTree`]s into scoped CSS text.
//!
//! The walk produces flat [`emit::Item`]s, the same way nested rules are
//! lifted out of their parents before the cascade:
//!
//! ```text
//! { ":root": { "--jp-code-font-size": "16px" },      #nb {
//!   ".cm-line": { "color": "red",             =>       --jp-code-font-size: 16px;
//!                 "&:hover": { ... } } }             }
//!                                                    #nb .cm-line { color: red; }
//!                                                    #nb .cm-line:hover { ... }
//! ```
//!
//! - entries under [`ROOT`] and top-level leaves are declarations of the scope rule
//! - `@` keys are hoisted to the top level verbatim, untouched by scoping
//! - other tree-valued keys become nested rules, see [`selectors::compose`]
//!
//! Output only depends on the tree and the scope, so compiling twice yields
//! byte-identical text.

pub mod emit;
pub mod selectors;

use serde_json::Value;

use crate::compiler::emit::{AtRuleBlock, Item, RuleBlock, property_name, write_items};
use crate::error::CompileError;
use crate::tree::{KeyKind, ROOT, StyleTree, StyleValue};

/// Compiles a tree into CSS text.
///
/// With `scope` set, every rule is prefixed by that selector. Without it the
/// root properties land in a `:root` rule and nested keys stand alone.
///
/// ```rust
/// use fcss::{compile, StyleTree, ROOT};
///
/// let tree = StyleTree::new().with(ROOT, StyleTree::new().with("--jp-code-font-size", "16px"));
/// assert_eq!(
///     compile(&tree, Some("#nb")),
///     "#nb {\n  --jp-code-font-size: 16px;\n}\n"
/// );
/// assert_eq!(compile(&StyleTree::new(), Some("#nb")), "");
/// ```
pub fn compile(tree: &StyleTree, scope: Option<&str>) -> String {
    let scope_selector = scope.unwrap_or(ROOT).to_string();
    let parents = match scope {
        Some(selector) => vec![selector.to_string()],
        None => Vec::new(),
    };

    let mut declarations = Vec::new();
    let mut items = Vec::new();
    walk(tree, &parents, &mut declarations, &mut items, true);

    let mut all = Vec::with_capacity(items.len() + 1);
    all.push(Item::Rule(RuleBlock {
        selectors: vec![scope_selector],
        declarations,
    }));
    all.extend(items);

    let mut out = String::new();
    write_items(&mut out, &all, 0);
    out
}

/// Validates an untyped value and compiles it.
///
/// Fails only if `value` is not a mapping; malformed entries inside are dropped.
pub fn compile_value(value: &Value, scope: Option<&str>) -> Result<String, CompileError> {
    let tree = StyleTree::from_json(value)?;
    Ok(compile(&tree, scope))
}

fn walk(
    tree: &StyleTree,
    parents: &[String],
    declarations: &mut Vec<(String, String)>,
    items: &mut Vec<Item>,
    top_level: bool,
) {
    for (key, value) in tree.iter() {
        match (KeyKind::of(key), value) {
            (KeyKind::Root, StyleValue::Tree(root)) if top_level => {
                walk(root, parents, declarations, items, false);
            }
            (KeyKind::Root, StyleValue::Leaf(_)) if top_level => {
                log::debug!("dropping {ROOT} entry: expected a mapping of properties");
            }
            (KeyKind::AtRule, value) => items.push(at_rule(key, value)),
            (_, StyleValue::Leaf(leaf)) => {
                declarations.push((property_name(key), leaf.clone()));
            }
            (_, StyleValue::Tree(child)) => nested_rule(key, child, parents, items),
        }
    }
}

fn nested_rule(key: &str, tree: &StyleTree, parents: &[String], items: &mut Vec<Item>) {
    let Some(selectors) = selectors::compose(parents, key) else {
        log::debug!("dropping nested rule with malformed selector {key:?}");
        return;
    };

    // Reserve the slot so the rule precedes the rules nested inside it.
    let slot = items.len();
    items.push(Item::Rule(RuleBlock::default()));

    let mut declarations = Vec::new();
    walk(tree, &selectors, &mut declarations, items, false);
    items[slot] = Item::Rule(RuleBlock {
        selectors,
        declarations,
    });
}

fn at_rule(key: &str, value: &StyleValue) -> Item {
    match value {
        StyleValue::Leaf(statement) => Item::Statement(format!("{key} {statement};")),
        StyleValue::Tree(body) => {
            let mut block = AtRuleBlock {
                prelude: key.to_string(),
                ..AtRuleBlock::default()
            };
            walk(body, &[], &mut block.declarations, &mut block.items, false);
            Item::AtRule(block)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_leaves_join_scope_rule() {
        let tree = StyleTree::new()
            .with("color", "red")
            .with(ROOT, StyleTree::new().with("--x", "1"));
        assert_eq!(
            compile(&tree, Some("#nb")),
            "#nb {\n  color: red;\n  --x: 1;\n}\n"
        );
    }

    #[test]
    fn test_root_leaf_is_dropped() {
        let tree = StyleTree::new().with(ROOT, "16px");
        assert_eq!(compile(&tree, Some("#nb")), "");
    }

    #[test]
    fn test_nested_root_key_is_a_selector() {
        let inner = StyleTree::new().with(ROOT, StyleTree::new().with("color", "red"));
        let tree = StyleTree::new().with(".a", inner);
        assert_eq!(
            compile(&tree, Some("#nb")),
            "#nb .a :root {\n  color: red;\n}\n"
        );
    }

    #[test]
    fn test_malformed_selector_is_dropped() {
        let tree = StyleTree::new()
            .with(":is(.a", StyleTree::new().with("color", "red"))
            .with(".b", StyleTree::new().with("color", "blue"));
        assert_eq!(compile(&tree, Some("#nb")), "#nb .b {\n  color: blue;\n}\n");
    }

    #[test]
    fn test_compile_value_rejects_non_mapping() {
        assert_eq!(
            compile_value(&Value::Bool(true), None),
            Err(CompileError::NotAMapping { found: "boolean" })
        );
    }
}

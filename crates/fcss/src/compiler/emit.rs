//! Flat rule blocks and their text form.

use std::fmt::Write;

/// A selector with its declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleBlock {
    pub selectors: Vec<String>,
    pub declarations: Vec<(String, String)>,
}

/// An at-rule with a block body, e.g. `@font-face { ... }` or `@media ... { ... }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtRuleBlock {
    pub prelude: String,
    pub declarations: Vec<(String, String)>,
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Rule(RuleBlock),
    AtRule(AtRuleBlock),
    /// A body-less at-rule such as `@import url(x);`.
    Statement(String),
}

impl Item {
    fn is_empty(&self) -> bool {
        match self {
            Item::Rule(rule) => rule.declarations.is_empty(),
            Item::AtRule(at) => at.declarations.is_empty() && at.items.iter().all(Item::is_empty),
            Item::Statement(_) => false,
        }
    }
}

/// Converts a camelCase property name to kebab-case.
///
/// Custom properties (`--name`) and names that are already lowercase pass
/// through untouched.
pub fn property_name(key: &str) -> String {
    if key.starts_with("--") || !key.contains(|c: char| c.is_ascii_uppercase()) {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn write_items(out: &mut String, items: &[Item], depth: usize) {
    for item in items {
        if item.is_empty() {
            continue;
        }
        match item {
            Item::Rule(rule) => {
                let _ = writeln!(out, "{}{} {{", indent(depth), rule.selectors.join(", "));
                write_declarations(out, &rule.declarations, depth + 1);
                let _ = writeln!(out, "{}}}", indent(depth));
            }
            Item::AtRule(at) => {
                let _ = writeln!(out, "{}{} {{", indent(depth), at.prelude);
                write_declarations(out, &at.declarations, depth + 1);
                write_items(out, &at.items, depth + 1);
                let _ = writeln!(out, "{}}}", indent(depth));
            }
            Item::Statement(statement) => {
                let _ = writeln!(out, "{}{statement}", indent(depth));
            }
        }
    }
}

fn write_declarations(out: &mut String, declarations: &[(String, String)], depth: usize) {
    for (name, value) in declarations {
        let _ = writeln!(out, "{}{name}: {value};", indent(depth));
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

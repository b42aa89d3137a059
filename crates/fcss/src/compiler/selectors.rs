//! Selector key parsing and composition.
//!
//! Nested keys are not parsed into a full selector grammar; the compiler only
//! needs to know where the top-level commas are and where `&` appears. Quoted
//! strings, attribute brackets and parenthesised arguments are kept opaque so
//! that `:is(.a, .b)` or `[title="a,b"]` are never split.
//!
//! ## Composition Rules
//!
//! - `&` is replaced by the parent selector: `&:hover` under `#nb` is `#nb:hover`
//! - a key without `&` composes as a descendant: `.cm-line` is `#nb .cm-line`
//! - a leading combinator is kept: `> .cell` is `#nb > .cell`
//! - comma lists compose every parent with every member

use nom::{
    IResult,
    branch::alt,
    bytes::complete::is_not,
    character::complete::char,
    combinator::{all_consuming, map, opt, recognize},
    multi::{many0, many1, separated_list1},
    sequence::delimited,
};

use crate::tree::ROOT;

/// One piece of a selector template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Parent,
}

/// A single member of a comma-separated selector key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorTemplate<'a> {
    pub segments: Vec<Segment<'a>>,
}

impl SelectorTemplate<'_> {
    pub fn has_parent_ref(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Parent))
    }

    /// Renders the template with `&` replaced by `parent`.
    pub fn render(&self, parent: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Parent => out.push_str(parent),
            }
        }
        out.trim().to_string()
    }
}

fn quoted(input: &str) -> IResult<&str, &str> {
    recognize(alt((
        delimited(char('"'), opt(is_not("\"")), char('"')),
        delimited(char('\''), opt(is_not("'")), char('\'')),
    )))(input)
}

fn bracketed(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('['), opt(is_not("]")), char(']')))(input)
}

fn parenthesized(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('('),
        many0(alt((parenthesized, quoted, is_not("()\"'")))),
        char(')'),
    ))(input)
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(char('&'), |_| Segment::Parent),
        map(
            alt((quoted, bracketed, parenthesized, is_not(",&\"'[("))),
            Segment::Text,
        ),
    ))(input)
}

fn template(input: &str) -> IResult<&str, SelectorTemplate<'_>> {
    map(many1(segment), |segments| SelectorTemplate { segments })(input)
}

/// Parses a nested selector key into its comma-separated templates.
///
/// Returns `None` when the key has unbalanced quotes, brackets or parentheses,
/// or an empty list member.
pub fn parse_selector_key(key: &str) -> Option<Vec<SelectorTemplate<'_>>> {
    let (_, templates) = all_consuming(separated_list1(char(','), template))(key).ok()?;
    if templates
        .iter()
        .any(|t| t.render("").is_empty() && !t.has_parent_ref())
    {
        return None;
    }
    Some(templates)
}

/// Composes a nested key under each of `parents`.
///
/// With no parents the key stands alone and `&` refers to [`ROOT`].
pub fn compose(parents: &[String], key: &str) -> Option<Vec<String>> {
    let templates = parse_selector_key(key)?;
    let mut combined = Vec::new();
    if parents.is_empty() {
        for t in &templates {
            combined.push(t.render(ROOT));
        }
        return Some(combined);
    }
    for parent in parents {
        for t in &templates {
            if t.has_parent_ref() {
                combined.push(t.render(parent));
            } else {
                combined.push(format!("{parent} {}", t.render(parent)));
            }
        }
    }
    Some(combined)
}

/// Builds an id selector for an element id, escaping it as a CSS identifier.
///
/// ```rust
/// use fcss::id_selector;
///
/// assert_eq!(id_selector("notebook-1"), "#notebook-1");
/// assert_eq!(id_selector("a.b"), "#a\\.b");
/// assert_eq!(id_selector("1st"), "#\\31 st");
/// assert_eq!(id_selector("-1x"), "#-\\31 x");
/// ```
pub fn id_selector(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 1);
    out.push('#');
    if id == "-" {
        out.push_str("\\-");
        return out;
    }
    let leading_dash = id.starts_with('-');
    for (i, c) in id.chars().enumerate() {
        let starts_ident = i == 0 || (i == 1 && leading_dash);
        if starts_ident && c.is_ascii_digit() {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parents(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_descendant_composition() {
        assert_eq!(
            compose(&parents(&["#nb"]), ".cm-line"),
            Some(vec!["#nb .cm-line".to_string()])
        );
    }

    #[test]
    fn test_parent_reference() {
        assert_eq!(
            compose(&parents(&["#nb"]), "&:hover"),
            Some(vec!["#nb:hover".to_string()])
        );
        assert_eq!(
            compose(&parents(&["#nb"]), ".dark &"),
            Some(vec![".dark #nb".to_string()])
        );
    }

    #[test]
    fn test_leading_combinator() {
        assert_eq!(
            compose(&parents(&["#nb"]), "> .cell"),
            Some(vec!["#nb > .cell".to_string()])
        );
    }

    #[test]
    fn test_comma_lists_multiply() {
        let composed = compose(&parents(&["#a", "#b"]), ".x, .y").unwrap();
        assert_eq!(composed, vec!["#a .x", "#a .y", "#b .x", "#b .y"]);
    }

    #[test]
    fn test_commas_inside_groups_do_not_split() {
        let composed = compose(&parents(&["#nb"]), ":is(.a, .b) [title=\"x,y\"]").unwrap();
        assert_eq!(composed, vec!["#nb :is(.a, .b) [title=\"x,y\"]"]);
    }

    #[test]
    fn test_unscoped_keys_stand_alone() {
        assert_eq!(
            compose(&[], ".jp-Notebook"),
            Some(vec![".jp-Notebook".to_string()])
        );
        assert_eq!(compose(&[], "&.x"), Some(vec![":root.x".to_string()]));
    }

    #[test]
    fn test_unbalanced_keys_are_rejected() {
        assert_eq!(parse_selector_key(":is(.a"), None);
        assert_eq!(parse_selector_key("[title"), None);
        assert_eq!(parse_selector_key(".a,"), None);
        assert_eq!(parse_selector_key(".a, ,.b"), None);
    }

    #[test]
    fn test_id_selector_passes_plain_ids() {
        assert_eq!(id_selector("id-3f9a_b"), "#id-3f9a_b");
        assert_eq!(id_selector("-x1"), "#-x1");
        assert_eq!(id_selector("--1"), "#--1");
    }

    #[test]
    fn test_id_selector_escapes_dash_prefixed_digits() {
        assert_eq!(id_selector("-1x"), "#-\\31 x");
        assert_eq!(id_selector("-"), "#\\-");
    }
}

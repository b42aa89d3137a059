//! Effective values of the code font properties.
//!
//! A property resolves with this precedence:
//!
//! 1. the document's override, if a document is given and it sets one
//! 2. the value stored in the global styles
//! 3. the built-in default
//!
//! Stored values are CSS text. Font family is stored as a fallback chain
//! (`"Fira Code", "Source Code Pro", monospace`) and resolves to its first
//! family, unquoted.

use bitflags::bitflags;
use fcss::StyleTree;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till, take_till1},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res},
    sequence::{delimited, preceded, terminated},
};
use phf::phf_map;

use crate::config::{
    CODE_FONT_FAMILY, CODE_FONT_SIZE, CODE_FONT_SIZE_DEFAULT, CODE_LINE_HEIGHT,
    CODE_LINE_HEIGHT_DEFAULT, EngineOptions, ROOT,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    FontFamily,
    FontSize,
    LineHeight,
}

static PROPERTY_KEYS: phf::Map<&'static str, Property> = phf_map! {
    "--jp-code-font-family" => Property::FontFamily,
    "--jp-code-font-size" => Property::FontSize,
    "--jp-code-line-height" => Property::LineHeight,
};

impl Property {
    pub const ALL: [Property; 3] = [Property::FontFamily, Property::FontSize, Property::LineHeight];

    /// The custom property this is stored under.
    pub fn key(self) -> &'static str {
        match self {
            Property::FontFamily => CODE_FONT_FAMILY,
            Property::FontSize => CODE_FONT_SIZE,
            Property::LineHeight => CODE_LINE_HEIGHT,
        }
    }

    pub fn from_key(key: &str) -> Option<Property> {
        PROPERTY_KEYS.get(key).copied()
    }

    pub fn default_value(self, options: &EngineOptions) -> String {
        match self {
            Property::FontFamily => options.default_family.clone(),
            Property::FontSize => CODE_FONT_SIZE_DEFAULT.to_string(),
            Property::LineHeight => CODE_LINE_HEIGHT_DEFAULT.to_string(),
        }
    }

    pub fn flag(self) -> Properties {
        match self {
            Property::FontFamily => Properties::FONT_FAMILY,
            Property::FontSize => Properties::FONT_SIZE,
            Property::LineHeight => Properties::LINE_HEIGHT,
        }
    }
}

bitflags! {
    /// A set of [`Property`]s, e.g. the ones a document overrides.
    ///
    /// ```
    /// use fontsync::resolve::{Properties, Property};
    ///
    /// let set = Property::FontSize.flag() | Property::LineHeight.flag();
    /// assert!(set.contains(Properties::FONT_SIZE));
    /// assert!(!set.contains(Properties::FONT_FAMILY));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Properties: u8 {
        const FONT_FAMILY = 0b001;
        const FONT_SIZE   = 0b010;
        const LINE_HEIGHT = 0b100;
    }
}

impl Properties {
    /// The properties `tree` sets to a usable value.
    pub fn set_in(tree: &StyleTree) -> Properties {
        Property::ALL
            .into_iter()
            .filter(|property| lookup(tree, *property).is_some())
            .fold(Properties::empty(), |set, property| set | property.flag())
    }
}

fn quoted_family(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
    ))(input)
}

fn leading_family(input: &str) -> IResult<&str, &str> {
    preceded(
        multispace0,
        alt((quoted_family, map(take_till1(|c: char| c == ','), str::trim))),
    )(input)
}

/// The first family of a `font-family` list, unquoted.
///
/// ```
/// use fontsync::resolve::first_family;
///
/// assert_eq!(first_family(r#""Fira Code", "Source Code Pro", monospace"#).as_deref(), Some("Fira Code"));
/// assert_eq!(first_family("Menlo, monospace").as_deref(), Some("Menlo"));
/// assert_eq!(first_family("  "), None);
/// ```
pub fn first_family(value: &str) -> Option<String> {
    let (_, family) = leading_family(value).ok()?;
    let family = family.trim();
    (!family.is_empty()).then(|| family.to_string())
}

/// Parses a whole-pixel length such as `13px`.
pub fn parse_px(value: &str) -> Option<u32> {
    let result: IResult<&str, u32> = all_consuming(terminated(
        map_res(digit1, |digits: &str| digits.parse::<u32>()),
        tag("px"),
    ))(value.trim());
    result.ok().map(|(_, px)| px)
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    value
}

/// Turns stored CSS text into the value reported for `property`.
pub fn normalize(property: Property, raw: &str) -> Option<String> {
    match property {
        Property::FontFamily => first_family(raw),
        Property::FontSize | Property::LineHeight => {
            let value = unquote(raw);
            (!value.is_empty()).then(|| value.to_string())
        }
    }
}

/// Reads `property` out of the root properties of `tree`.
pub fn lookup(tree: &StyleTree, property: Property) -> Option<String> {
    match tree.lookup(&[ROOT, property.key()]) {
        Ok(raw) => normalize(property, raw),
        Err(err) => {
            log::trace!("{} not set: {err}", property.key());
            None
        }
    }
}

pub fn resolve(
    property: Property,
    document: Option<&StyleTree>,
    global: &StyleTree,
    options: &EngineOptions,
) -> String {
    document
        .and_then(|tree| lookup(tree, property))
        .or_else(|| lookup(global, property))
        .unwrap_or_else(|| property.default_value(options))
}

/// The CSS text stored in the global styles when `value` is chosen.
pub fn encode_global(property: Property, value: &str, options: &EngineOptions) -> Option<String> {
    match property {
        Property::FontFamily => first_family(value).map(|family| {
            // Generic fallback stays unquoted: a quoted "monospace" names a
            // font, not the generic family.
            format!(
                "\"{family}\", \"{}\", {}",
                options.default_family, options.fallback_family
            )
        }),
        _ => normalize(property, value),
    }
}

/// The CSS text stored in a document's overrides when `value` is chosen.
pub fn encode_document(property: Property, value: &str, options: &EngineOptions) -> Option<String> {
    match property {
        Property::FontFamily => {
            first_family(value).map(|family| format!("\"{family}\", {}", options.fallback_family))
        }
        _ => normalize(property, value),
    }
}

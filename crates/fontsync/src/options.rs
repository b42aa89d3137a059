//! Discrete option domains and the registered font table.
//!
//! Every option list handed to a picker starts with `None`, meaning "inherit
//! the default".

use once_cell::sync::Lazy;

pub const FONT_SIZE_MIN: u32 = 8;
pub const FONT_SIZE_MAX: u32 = 32;

/// `"8px"` through `"32px"`.
pub static FONT_SIZES: Lazy<Vec<String>> = Lazy::new(|| {
    (FONT_SIZE_MIN..=FONT_SIZE_MAX)
        .map(|px| format!("{px}px"))
        .collect()
});

/// `"1"` through `"2.75"` in steps of 0.25.
pub static LINE_HEIGHTS: Lazy<Vec<String>> = Lazy::new(|| {
    (0..8u8)
        .map(|step| format!("{}", 1.0 + f64::from(step) * 0.25))
        .collect()
});

pub fn font_size_options() -> &'static [String] {
    &FONT_SIZES
}

pub fn line_height_options() -> &'static [String] {
    &LINE_HEIGHTS
}

/// Prepends the "inherit" choice to `values`.
pub fn with_inherit<I, S>(values: I) -> Vec<Option<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    std::iter::once(None)
        .chain(values.into_iter().map(|value| Some(value.into())))
        .collect()
}

pub fn font_size_choices() -> Vec<Option<String>> {
    with_inherit(font_size_options().iter().cloned())
}

pub fn line_height_choices() -> Vec<Option<String>> {
    with_inherit(line_height_options().iter().cloned())
}

/// Makes a name usable in a command id.
///
/// ```
/// use fontsync::options::slugify;
///
/// assert_eq!(slugify("Fira Code Light"), "fira-code-light");
/// assert_eq!(slugify("IBM Plex Mono 500"), "ibm-plex-mono-500");
/// ```
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredFont {
    pub name: String,
    /// Face names, never empty.
    pub variants: Vec<String>,
}

/// Fonts known to the host, in registration order.
#[derive(Clone, Debug, Default)]
pub struct FontTable {
    fonts: Vec<RegisteredFont>,
}

impl FontTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with its variant faces. Without variants the font has
    /// a single face named after it; otherwise each face is `"<name> <variant>"`.
    ///
    /// Registering a name again replaces the earlier entry in place.
    pub fn register(&mut self, name: &str, variants: &[&str]) -> &RegisteredFont {
        let variants = if variants.is_empty() {
            vec![name.to_string()]
        } else {
            variants
                .iter()
                .map(|variant| format!("{name} {variant}"))
                .collect()
        };
        let font = RegisteredFont {
            name: name.to_string(),
            variants,
        };
        let index = match self.fonts.iter().position(|f| f.name == name) {
            Some(index) => {
                log::debug!("replacing registered font {name}");
                self.fonts[index] = font;
                index
            }
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        };
        &self.fonts[index]
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredFont> {
        self.fonts.iter().find(|font| font.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredFont> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Every face of every font, in table order.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.fonts
            .iter()
            .flat_map(|font| font.variants.iter().map(String::as_str))
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&str> {
        self.variants().find(|variant| slugify(variant) == slug)
    }

    pub fn choices(&self) -> Vec<Option<String>> {
        with_inherit(self.fonts.iter().map(|font| font.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_sizes() {
        let sizes = font_size_options();
        assert_eq!(sizes.len(), 25);
        assert_eq!(sizes.first().map(String::as_str), Some("8px"));
        assert_eq!(sizes.last().map(String::as_str), Some("32px"));
        assert!(sizes.windows(2).all(|pair| {
            pair[0].trim_end_matches("px").parse::<u32>().unwrap() + 1
                == pair[1].trim_end_matches("px").parse::<u32>().unwrap()
        }));
    }

    #[test]
    fn test_line_heights() {
        assert_eq!(
            line_height_options(),
            ["1", "1.25", "1.5", "1.75", "2", "2.25", "2.5", "2.75"]
        );
    }

    #[test]
    fn test_choices_start_with_inherit() {
        let choices = font_size_choices();
        assert_eq!(choices.len(), 26);
        assert_eq!(choices[0], None);
        assert_eq!(choices[1].as_deref(), Some("8px"));
        assert_eq!(line_height_choices()[0], None);
    }

    #[test]
    fn test_register_without_variants() {
        let mut table = FontTable::new();
        let font = table.register("Anonymous Pro", &[]);
        assert_eq!(font.variants, vec!["Anonymous Pro"]);
    }

    #[test]
    fn test_register_with_variants() {
        let mut table = FontTable::new();
        table.register("Fira Code", &["Light", "Bold"]);
        assert_eq!(
            table.variants().collect::<Vec<_>>(),
            vec!["Fira Code Light", "Fira Code Bold"]
        );
        assert_eq!(table.find_by_slug("fira-code-bold"), Some("Fira Code Bold"));
        assert_eq!(table.find_by_slug("fira-code"), None);
    }

    #[test]
    fn test_last_registration_wins_in_place() {
        let mut table = FontTable::new();
        table.register("A", &[]);
        table.register("B", &[]);
        table.register("A", &["Italic"]);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.choices(),
            vec![None, Some("A".to_string()), Some("B".to_string())]
        );
        assert_eq!(table.get("A").map(|f| f.variants.clone()), Some(vec!["A Italic".to_string()]));
    }
}

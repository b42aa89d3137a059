//! Discrete commands for menus and command palettes.
//!
//! Command ids follow `<domain>:<value-or-action>`:
//!
//! | id                           | effect                               |
//! |------------------------------|--------------------------------------|
//! | `code-font-size:14px`        | set the code font size               |
//! | `code-font-size:increase`    | step the effective size up by 1px    |
//! | `code-font-size:decrease`    | step the effective size down by 1px  |
//! | `code-line-height:1.5`       | set the code line height             |
//! | `code-font-family:<slug>`    | set the family to a registered face  |
//! | `custom-fonts:enable`        | enable the global styles             |
//! | `custom-fonts:disable`       | disable the global styles            |

use crate::error::{FontsError, Result};
use crate::manager::FontManager;
use crate::options::{
    FONT_SIZE_MAX, FONT_SIZE_MIN, FontTable, font_size_options, line_height_options, slugify,
};
use crate::resolve::{Property, parse_px};

pub const CMD_CODE_FONT_SIZE: &str = "code-font-size";
pub const CMD_CODE_LINE_HEIGHT: &str = "code-line-height";
pub const CMD_CODE_FONT_FAMILY: &str = "code-font-family";
pub const CMD_CUSTOM_FONTS: &str = "custom-fonts";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontCommand {
    FontSize(String),
    IncreaseFontSize,
    DecreaseFontSize,
    LineHeight(String),
    /// A registered face, e.g. `Fira Code Light`.
    FontFamily(String),
    Enable,
    Disable,
}

impl FontCommand {
    pub fn id(&self) -> String {
        match self {
            FontCommand::FontSize(px) => format!("{CMD_CODE_FONT_SIZE}:{px}"),
            FontCommand::IncreaseFontSize => format!("{CMD_CODE_FONT_SIZE}:increase"),
            FontCommand::DecreaseFontSize => format!("{CMD_CODE_FONT_SIZE}:decrease"),
            FontCommand::LineHeight(ratio) => format!("{CMD_CODE_LINE_HEIGHT}:{ratio}"),
            FontCommand::FontFamily(face) => format!("{CMD_CODE_FONT_FAMILY}:{}", slugify(face)),
            FontCommand::Enable => format!("{CMD_CUSTOM_FONTS}:enable"),
            FontCommand::Disable => format!("{CMD_CUSTOM_FONTS}:disable"),
        }
    }

    pub fn label(&self) -> String {
        match self {
            FontCommand::FontSize(value)
            | FontCommand::LineHeight(value)
            | FontCommand::FontFamily(value) => value.clone(),
            FontCommand::IncreaseFontSize => "Increase Code Font Size".to_string(),
            FontCommand::DecreaseFontSize => "Decrease Code Font Size".to_string(),
            FontCommand::Enable => "Enable Custom Fonts".to_string(),
            FontCommand::Disable => "Disable Custom Fonts".to_string(),
        }
    }

    /// Maps a command id back to its command. Font family ids only resolve
    /// to faces registered in `fonts`.
    pub fn parse(id: &str, fonts: &FontTable) -> Option<FontCommand> {
        let (domain, value) = id.split_once(':')?;
        match (domain, value) {
            (CMD_CODE_FONT_SIZE, "increase") => Some(FontCommand::IncreaseFontSize),
            (CMD_CODE_FONT_SIZE, "decrease") => Some(FontCommand::DecreaseFontSize),
            (CMD_CODE_FONT_SIZE, px) => font_size_options()
                .iter()
                .any(|option| option == px)
                .then(|| FontCommand::FontSize(px.to_string())),
            (CMD_CODE_LINE_HEIGHT, ratio) => line_height_options()
                .iter()
                .any(|option| option == ratio)
                .then(|| FontCommand::LineHeight(ratio.to_string())),
            (CMD_CODE_FONT_FAMILY, slug) => fonts
                .find_by_slug(slug)
                .map(|face| FontCommand::FontFamily(face.to_string())),
            (CMD_CUSTOM_FONTS, "enable") => Some(FontCommand::Enable),
            (CMD_CUSTOM_FONTS, "disable") => Some(FontCommand::Disable),
            _ => None,
        }
    }

    /// Every command, in menu order.
    pub fn catalog(fonts: &FontTable) -> Vec<FontCommand> {
        let mut commands = vec![FontCommand::IncreaseFontSize, FontCommand::DecreaseFontSize];
        commands.extend(font_size_options().iter().cloned().map(FontCommand::FontSize));
        commands.extend(line_height_options().iter().cloned().map(FontCommand::LineHeight));
        commands.extend(
            fonts
                .variants()
                .map(|face| FontCommand::FontFamily(face.to_string())),
        );
        commands.push(FontCommand::Enable);
        commands.push(FontCommand::Disable);
        commands
    }
}

impl FontManager {
    pub fn commands(&self) -> Vec<FontCommand> {
        FontCommand::catalog(&self.fonts())
    }

    pub fn is_toggled(&self, command: &FontCommand, document: Option<&str>) -> bool {
        match command {
            FontCommand::FontSize(px) => self.value(document, Property::FontSize) == *px,
            FontCommand::LineHeight(ratio) => self.value(document, Property::LineHeight) == *ratio,
            FontCommand::FontFamily(face) => self.value(document, Property::FontFamily) == *face,
            FontCommand::Enable => self.enabled(),
            FontCommand::Disable => !self.enabled(),
            FontCommand::IncreaseFontSize | FontCommand::DecreaseFontSize => false,
        }
    }

    pub fn is_visible(&self, command: &FontCommand) -> bool {
        match command {
            FontCommand::Enable => !self.enabled(),
            FontCommand::Disable => self.enabled(),
            _ => self.enabled(),
        }
    }

    pub fn execute(&self, command: &FontCommand, document: Option<&str>) -> Result<()> {
        log::debug!("executing {}", command.id());
        match command {
            FontCommand::FontSize(px) => {
                self.set_value(document, Property::FontSize, Some(px.as_str()))
            }
            FontCommand::IncreaseFontSize => self.step_font_size(document, 1),
            FontCommand::DecreaseFontSize => self.step_font_size(document, -1),
            FontCommand::LineHeight(ratio) => {
                self.set_value(document, Property::LineHeight, Some(ratio.as_str()))
            }
            FontCommand::FontFamily(face) => {
                self.set_value(document, Property::FontFamily, Some(face.as_str()))
            }
            FontCommand::Enable => self.set_enabled(true),
            FontCommand::Disable => self.set_enabled(false),
        }
    }

    /// Parses and executes a command id.
    pub fn execute_id(&self, id: &str, document: Option<&str>) -> Result<()> {
        let command = FontCommand::parse(id, &self.fonts())
            .ok_or_else(|| FontsError::UnknownCommand(id.to_string()))?;
        self.execute(&command, document)
    }

    fn step_font_size(&self, document: Option<&str>, delta: i64) -> Result<()> {
        let current = parse_px(&self.value(document, Property::FontSize))
            .or_else(|| parse_px(&Property::FontSize.default_value(self.options())))
            .unwrap_or(FONT_SIZE_MIN);
        let next = (i64::from(current) + delta)
            .clamp(i64::from(FONT_SIZE_MIN), i64::from(FONT_SIZE_MAX));
        let px = format!("{next}px");
        self.set_value(document, Property::FontSize, Some(px.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FontTable {
        let mut fonts = FontTable::new();
        fonts.register("Fira Code", &["Light", "Bold"]);
        fonts.register("Anonymous Pro", &[]);
        fonts
    }

    #[test]
    fn test_ids_parse_back() {
        let fonts = table();
        for command in FontCommand::catalog(&fonts) {
            assert_eq!(FontCommand::parse(&command.id(), &fonts), Some(command));
        }
    }

    #[test]
    fn test_ids() {
        assert_eq!(FontCommand::FontSize("14px".into()).id(), "code-font-size:14px");
        assert_eq!(FontCommand::LineHeight("1.25".into()).id(), "code-line-height:1.25");
        assert_eq!(
            FontCommand::FontFamily("Fira Code Light".into()).id(),
            "code-font-family:fira-code-light"
        );
        assert_eq!(FontCommand::Disable.id(), "custom-fonts:disable");
    }

    #[test]
    fn test_unknown_ids() {
        let fonts = table();
        assert_eq!(FontCommand::parse("code-font-size:7px", &fonts), None);
        assert_eq!(FontCommand::parse("code-line-height:3", &fonts), None);
        assert_eq!(FontCommand::parse("code-font-family:menlo", &fonts), None);
        assert_eq!(FontCommand::parse("custom-fonts", &fonts), None);
        assert_eq!(FontCommand::parse("other:enable", &fonts), None);
    }

    #[test]
    fn test_catalog_order() {
        let commands = FontCommand::catalog(&table());
        assert_eq!(commands.len(), 2 + 25 + 8 + 3 + 2);
        assert_eq!(commands[0], FontCommand::IncreaseFontSize);
        assert_eq!(commands[2], FontCommand::FontSize("8px".into()));
        assert_eq!(commands.last(), Some(&FontCommand::Disable));
    }

    #[test]
    fn test_labels() {
        assert_eq!(FontCommand::IncreaseFontSize.label(), "Increase Code Font Size");
        assert_eq!(FontCommand::FontSize("9px".into()).label(), "9px");
        assert_eq!(FontCommand::Enable.label(), "Enable Custom Fonts");
    }
}

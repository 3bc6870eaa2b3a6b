//! Theme configuration options for fm
//!
//! This module defines the `[theme]` table of the fm.toml configuration file.
//! Without any theme the browser looks like a plain curses program: bold header and
//! directories, reversed cursor row.

use crate::utils::parse_color;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Theme configuration options
/// # Examples
/// ```toml
/// [theme]
/// directory.fg = "blue"
/// selection = { fg = "black", bg = "#d79921" }
/// ```
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Theme {
    path: ColorPair,
    entry: ColorPair,
    directory: ColorPair,
    /// Unset means reversed video.
    selection: Option<ColorPair>,
    marker: ColorPair,
    status: ColorPair,
}

impl Theme {
    /// Header line with the current path.
    pub fn path_style(&self) -> Style {
        self.path.style().add_modifier(Modifier::BOLD)
    }

    pub fn entry_style(&self) -> Style {
        self.entry.style()
    }

    pub fn directory_style(&self) -> Style {
        self.entry
            .resolve(&self.directory)
            .style()
            .add_modifier(Modifier::BOLD)
    }

    /// Applies the cursor highlight on top of a row style.
    pub fn selection_style(&self, base: Style) -> Style {
        match &self.selection {
            None => base.add_modifier(Modifier::REVERSED),
            Some(pair) => base.patch(pair.style()),
        }
    }

    pub fn marker_style(&self) -> Style {
        self.marker.style()
    }

    pub fn status_style(&self) -> Style {
        self.status.style()
    }
}

/// Foreground and background color of one themed element.
/// `Color::Reset` means "not set".
#[derive(Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct ColorPair {
    #[serde(default, deserialize_with = "deserialize_color_field")]
    fg: Color,
    #[serde(default, deserialize_with = "deserialize_color_field")]
    bg: Color,
}

/// Default implementation for ColorPair
/// Sets both foreground and background to Color::Reset
impl Default for ColorPair {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

impl ColorPair {
    /// Takes the colors of `over` where it sets them, keeps ours otherwise.
    pub fn resolve(&self, over: &ColorPair) -> Self {
        Self {
            fg: if over.fg == Color::Reset {
                self.fg
            } else {
                over.fg
            },
            bg: if over.bg == Color::Reset {
                self.bg
            } else {
                over.bg
            },
        }
    }

    /// Converts to a [Style], leaving unset colors untouched so modifiers compose.
    pub fn style(&self) -> Style {
        let mut style = Style::default();
        if self.fg != Color::Reset {
            style = style.fg(self.fg);
        }
        if self.bg != Color::Reset {
            style = style.bg(self.bg);
        }
        style
    }
}

fn deserialize_color_field<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(parse_color(&s))
}

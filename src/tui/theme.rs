use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::ops::NoticeLevel;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    /// Background of the active menu and the text input box
    pub panel_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            panel_bg: Color::Rgb(0x3D, 0x14, 0x38),
        }
    }
}

/// Parse `#RRGGBB` into an RGB color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Theme {
    /// Create a theme from `[ui.colors]`, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            match (theme.slot_mut(key), parse_hex_color(value)) {
                (Some(slot), Some(color)) => *slot = color,
                (None, _) => tracing::warn!(key = %key, "unknown theme color"),
                (Some(_), None) => {
                    tracing::warn!(key = %key, value = %value, "ignoring invalid color")
                }
            }
        }
        theme
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        let slot = match key {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "red" => &mut self.red,
            "yellow" => &mut self.yellow,
            "green" => &mut self.green,
            "cyan" => &mut self.cyan,
            "panel_bg" => &mut self.panel_bg,
            _ => return None,
        };
        Some(slot)
    }

    /// Get the color for a notice
    pub fn notice_color(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.cyan,
            NoticeLevel::Success => self.green,
            NoticeLevel::Warning => self.yellow,
        }
    }
}

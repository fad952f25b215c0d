use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

pub const BG: Color = Color::Rgb(0x0B, 0x0B, 0x0B); // #0b0b0b
pub const PANEL: Color = Color::Rgb(0x18, 0x18, 0x1B); // zinc-900
pub const PANEL_MUTED: Color = Color::Rgb(0x27, 0x27, 0x2A); // zinc-800
pub const BORDER: Color = Color::Rgb(0x3F, 0x3F, 0x46); // zinc-700
pub const OVERLAY: Color = Color::Rgb(0x05, 0x05, 0x05);

pub const TEXT: Color = Color::Rgb(0xE5, 0xE7, 0xEB); // #e5e7eb
pub const TEXT_SECONDARY: Color = Color::Rgb(0xA1, 0xA1, 0xAA); // zinc-400
pub const TEXT_MUTED: Color = Color::Rgb(0x71, 0x71, 0x7A); // zinc-500

pub const VIOLET: Color = Color::Rgb(0xA7, 0x8B, 0xFA); // #a78bfa
pub const TEAL: Color = Color::Rgb(0x2D, 0xD4, 0xBF);
pub const AMBER: Color = Color::Rgb(0xF5, 0x9E, 0x0B);
pub const RED: Color = Color::Rgb(0xF8, 0x71, 0x71);

/// Palette used when the theme context is in dark mode.
#[derive(Debug, Clone)]
pub struct DarkTheme {
    roles: ThemeRoles,
}

impl DarkTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                canvas: BG,
                panel: PANEL,
                panel_raised: PANEL_MUTED,
                outline: BORDER,

                text: TEXT,
                text_secondary: TEXT_SECONDARY,
                text_muted: TEXT_MUTED,

                brand: VIOLET,
                brand_alt: TEAL,

                notice: TEAL,
                caution: AMBER,
                danger: RED,

                highlight: PANEL_MUTED,
                highlight_text: TEXT,
                focus: VIOLET,
                scrim: OVERLAY,
            },
        }
    }
}

impl Default for DarkTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for DarkTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

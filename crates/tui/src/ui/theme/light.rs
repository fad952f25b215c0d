use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

pub const BG: Color = Color::Rgb(0xFF, 0xFF, 0xFF);
pub const PANEL: Color = Color::Rgb(0xF9, 0xFA, 0xFB); // gray-50
pub const PANEL_MUTED: Color = Color::Rgb(0xF3, 0xF4, 0xF6); // gray-100
pub const BORDER: Color = Color::Rgb(0xD1, 0xD5, 0xDB); // gray-300
pub const OVERLAY: Color = Color::Rgb(0xE5, 0xE7, 0xEB);

pub const TEXT: Color = Color::Rgb(0x1A, 0x1A, 0x1A); // #1a1a1a
pub const TEXT_SECONDARY: Color = Color::Rgb(0x4B, 0x55, 0x63); // gray-600
pub const TEXT_MUTED: Color = Color::Rgb(0x6B, 0x72, 0x80); // gray-500

pub const VIOLET: Color = Color::Rgb(0x6D, 0x28, 0xD9); // #6d28d9
pub const TEAL: Color = Color::Rgb(0x0F, 0x76, 0x6E);
pub const AMBER: Color = Color::Rgb(0xB4, 0x53, 0x09);
pub const RED: Color = Color::Rgb(0xDC, 0x26, 0x26);

/// Palette used when the theme context is in light mode.
#[derive(Debug, Clone)]
pub struct LightTheme {
    roles: ThemeRoles,
}

impl LightTheme {
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

                highlight: Color::Rgb(0xED, 0xE9, 0xFE), // violet-100
                highlight_text: TEXT,
                focus: VIOLET,
                scrim: OVERLAY,
            },
        }
    }
}

impl Default for LightTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for LightTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Colors a palette assigns to each part of the StuffsDrop screens.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    /// Full-screen backdrop behind the sidebar and content.
    pub canvas: Color,
    /// Cards, form panels and the sidebar body.
    pub panel: Color,
    /// Sidebar flyout and the brand panel on the auth screens.
    pub panel_raised: Color,
    pub outline: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    /// The violet used for titles, primary buttons and focus.
    pub brand: Color,
    /// Category badges and secondary buttons.
    pub brand_alt: Color,

    pub notice: Color,
    pub caution: Color,
    pub danger: Color,

    pub highlight: Color,
    pub highlight_text: Color,
    pub focus: Color,
    /// Fill behind an open modal.
    pub scrim: Color,
}

/// How loudly a status message should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Background progress and the footer status line.
    Notice,
    /// Hot listings.
    Caution,
    /// Validation errors, failed calls and the logout entry.
    Danger,
}

/// A light or dark palette plus the styles built from it.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::default().fg(if focused { roles.focus } else { roles.outline })
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().highlight_text).bg(self.roles().highlight)
    }

    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().scrim)
    }

    fn tone_style(&self, tone: Tone) -> Style {
        let roles = self.roles();
        let color = match tone {
            Tone::Notice => roles.notice,
            Tone::Caution => roles.caution,
            Tone::Danger => roles.danger,
        };
        Style::default().fg(color)
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().brand)
    }
    fn accent_emphasis_style(&self) -> Style {
        self.accent_primary_style().add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::{DarkTheme, LightTheme};

    #[test]
    fn danger_differs_from_notice_in_both_palettes() {
        for theme in [&LightTheme::new() as &dyn Theme, &DarkTheme::new()] {
            assert_ne!(theme.tone_style(Tone::Danger), theme.tone_style(Tone::Notice));
            assert_eq!(theme.tone_style(Tone::Danger).fg, Some(theme.roles().danger));
        }
    }

    #[test]
    fn focused_borders_use_the_focus_color() {
        let theme = DarkTheme::new();
        assert_eq!(theme.border_style(true).fg, Some(theme.roles().focus));
        assert_eq!(theme.border_style(false).fg, Some(theme.roles().outline));
    }
}

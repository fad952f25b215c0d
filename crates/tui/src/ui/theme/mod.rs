//! Theme styling for the TUI layer.
//!
//! Two palettes mirror the theme context's light and dark modes. Components
//! style themselves through the semantic roles in [`roles::Theme`] and the
//! builders in [`theme_helpers`] rather than hard-coding colors.

use stuffsdrop_types::ThemeMode;

pub mod dark;
pub mod light;
pub mod roles;
pub mod theme_helpers;

pub use dark::DarkTheme;
pub use light::LightTheme;
pub use roles::{Theme, Tone};

/// Builds the palette for a theme mode.
pub fn for_mode(mode: ThemeMode) -> Box<dyn Theme> {
    match mode {
        ThemeMode::Light => Box::new(LightTheme::new()),
        ThemeMode::Dark => Box::new(DarkTheme::new()),
    }
}

//! Process-wide contexts: the theme and the sidebar collapse flag.
//!
//! Each context is owned by [`Providers`] and mutated only through its own
//! toggle/setter. Consumers read them with the `use_*` accessors, which fail
//! with [`ContextError::MissingProvider`] when the context was never
//! installed. Render passes propagate that error and stop.

use std::fmt;

use stuffsdrop_types::{ContextError, ThemeMode};

use crate::ui::theme::{self, Theme};

/// Current theme mode plus the palette built for it.
pub struct ThemeContext {
    mode: ThemeMode,
    palette: Box<dyn Theme>,
}

impl ThemeContext {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            palette: theme::for_mode(mode),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn theme(&self) -> &dyn Theme {
        &*self.palette
    }

    /// Flips light/dark and returns the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        self.palette = theme::for_mode(self.mode);
        tracing::debug!(mode = %self.mode, "theme toggled");
        self.mode
    }
}

impl fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext").field("mode", &self.mode).finish()
    }
}

/// Session-scoped collapse flag shared by the sidebar and the layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SidebarContext {
    collapsed: bool,
}

impl SidebarContext {
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn toggle(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }
}

#[derive(Debug, Default)]
pub struct Providers {
    theme: Option<ThemeContext>,
    sidebar: Option<SidebarContext>,
}

impl Providers {
    /// Installs both contexts.
    pub fn new(theme_mode: ThemeMode) -> Self {
        Self {
            theme: Some(ThemeContext::new(theme_mode)),
            sidebar: Some(SidebarContext::default()),
        }
    }

    pub fn use_theme(&self) -> Result<&ThemeContext, ContextError> {
        self.theme.as_ref().ok_or(ContextError::MissingProvider {
            consumer: "use_theme",
            provider: "ThemeProvider",
        })
    }

    pub fn use_theme_mut(&mut self) -> Result<&mut ThemeContext, ContextError> {
        self.theme.as_mut().ok_or(ContextError::MissingProvider {
            consumer: "use_theme",
            provider: "ThemeProvider",
        })
    }

    pub fn use_sidebar(&self) -> Result<&SidebarContext, ContextError> {
        self.sidebar.as_ref().ok_or(ContextError::MissingProvider {
            consumer: "use_sidebar",
            provider: "SidebarProvider",
        })
    }

    pub fn use_sidebar_mut(&mut self) -> Result<&mut SidebarContext, ContextError> {
        self.sidebar.as_mut().ok_or(ContextError::MissingProvider {
            consumer: "use_sidebar",
            provider: "SidebarProvider",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_toggle_swaps_palette() {
        let mut providers = Providers::new(ThemeMode::Light);
        let light_text = providers.use_theme().unwrap().theme().roles().text;

        let theme = providers.use_theme_mut().unwrap();
        assert_eq!(theme.toggle(), ThemeMode::Dark);
        assert_ne!(theme.theme().roles().text, light_text);
    }

    #[test]
    fn sidebar_flag_defaults_to_expanded() {
        let mut providers = Providers::new(ThemeMode::Dark);
        assert!(!providers.use_sidebar().unwrap().collapsed());
        assert!(providers.use_sidebar_mut().unwrap().toggle());
        providers.use_sidebar_mut().unwrap().set_collapsed(false);
        assert!(!providers.use_sidebar().unwrap().collapsed());
    }

    #[test]
    fn missing_contexts_report_consumer_and_provider() {
        let providers = Providers::default();
        let err = providers.use_sidebar().unwrap_err();
        assert_eq!(err.to_string(), "use_sidebar must be used within a SidebarProvider");
        assert!(matches!(
            providers.use_theme().unwrap_err(),
            ContextError::MissingProvider { provider: "ThemeProvider", .. }
        ));
    }
}

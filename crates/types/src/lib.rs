//! Shared types for the StuffsDrop terminal client.
//!
//! The UI state machines, the effect executor and the backend collaborators all
//! speak in terms of the types defined here, so none of them needs to depend on
//! another's crate.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod identity;
pub mod listing;
pub mod nav;
pub mod registration;

pub use identity::{Identity, LoginRequest};
pub use listing::{Condition, Listing, ListingQuery, ViewMode};
pub use nav::{GroupConfig, NavItem, NavigationProvider, StaticResources};
pub use registration::{Category, FieldErrors, FormField, RegistrationForm, RegistrationPayload, Role, WizardStep};

/// Colour scheme selected by the theme context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid theme mode '{0}'; expected 'light' or 'dark'")]
pub struct ParseThemeModeError(String);

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(ParseThemeModeError(s.to_string())),
        }
    }
}

/// Raised when a consumer reads a process-wide context that was never
/// installed. Rendering stops at the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("{consumer} must be used within a {provider}")]
    MissingProvider {
        consumer: &'static str,
        provider: &'static str,
    },
}

/// Top-level screens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    /// Listings browse, the home screen.
    Feed,
    /// Any other navigation resource, by resource name.
    Resource(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Feed => "/feed".to_string(),
            Route::Resource(name) => format!("/{name}"),
        }
    }

    /// Maps a navigation target back to a screen. Unknown paths are `None`.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_start_matches('/');
        let head = trimmed.split('/').next().unwrap_or_default();
        match head {
            "login" => Some(Route::Login),
            "register" => Some(Route::Register),
            "feed" | "" => Some(Route::Feed),
            name if nav::RESOURCES.iter().any(|r| r.name == name) => Some(Route::Resource(name.to_string())),
            _ => None,
        }
    }

    /// Screens reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// "Are you sure you want to log off?" confirmation.
    Logout,
}

/// Result of a background call, fed back into the update loop.
///
/// Errors are carried as display messages; an empty message means the
/// collaborator gave none.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    LoggedIn(Result<Identity, String>),
    Registered(Result<(), String>),
    LoggedOut(Result<(), String>),
    IdentityLoaded(Option<Identity>),
    ListingsLoaded(Result<Vec<Listing>, String>),
    /// Informational result of a fire-and-forget action.
    Log(String),
}

/// Messages that drive the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (testimonial rotation, throbbers)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
}

/// Side effects requested by components and executed by the command layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Login(LoginRequest),
    Register(Box<RegistrationPayload>),
    Logout,
    LoadIdentity,
    LoadListings,
    /// Open the platform mail client for the address.
    OpenMailClient(String),
    /// Persist (or forget, with `None`) the identifier prefilled on the login screen.
    RememberIdentifier(Option<String>),
    PersistTheme(ThemeMode),
    SwitchTo(Route),
    ShowModal(Modal),
    CloseModal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_mode_parses_and_toggles() {
        assert_eq!("LIGHT".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("sepia".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }

    #[test]
    fn routes_map_to_paths_and_back() {
        assert_eq!(Route::from_path("/login"), Some(Route::Login));
        assert_eq!(Route::from_path("/"), Some(Route::Feed));
        assert_eq!(Route::from_path("/requests/7"), Some(Route::Resource("requests".into())));
        assert_eq!(Route::from_path("/nowhere"), None);
        assert_eq!(Route::Resource("saved".into()).path(), "/saved");
        assert!(Route::Register.is_public());
        assert!(!Route::Feed.is_public());
    }

    #[test]
    fn missing_provider_names_both_sides() {
        let err = ContextError::MissingProvider {
            consumer: "use_theme",
            provider: "ThemeProvider",
        };
        assert_eq!(err.to_string(), "use_theme must be used within a ThemeProvider");
    }
}

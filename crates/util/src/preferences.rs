//! User preference persistence for the StuffsDrop terminal client.
//!
//! A tiny JSON-backed store recording the preferred theme mode and the login
//! identifier remembered by the "remember me" checkbox. The file lives in the
//! standard configuration directory (`~/.config/stuffsdrop/preferences.json`
//! on most platforms) and is safe to share across threads thanks to the
//! internal `Mutex`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use stuffsdrop_types::ThemeMode;
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "STUFFSDROP_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted preference values.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesPayload {
    #[serde(default)]
    pub theme_mode: Option<ThemeMode>,
    /// Email or username prefilled on the login screen.
    #[serde(default)]
    pub remembered_identifier: Option<String>,
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Opens the store at the default location (or the env override).
    pub fn new() -> Result<Self, PreferencesError> {
        Self::at_path(default_preferences_path())
    }

    /// Opens the store rooted at `path`. A missing file yields defaults.
    pub fn at_path(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    /// [`UserPreferences::new`], falling back to [`UserPreferences::ephemeral`] with a warning.
    pub fn open_or_ephemeral() -> Self {
        Self::new().unwrap_or_else(|error| {
            warn!(error = %error, "Preferences unavailable; using in-memory defaults");
            Self::ephemeral()
        })
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn theme_mode(&self) -> Option<ThemeMode> {
        self.lock().theme_mode
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> Result<(), PreferencesError> {
        self.update(|payload| payload.theme_mode = Some(mode))
    }

    pub fn remembered_identifier(&self) -> Option<String> {
        self.lock().remembered_identifier.clone()
    }

    /// Stores the identifier, or clears it with `None`.
    pub fn set_remembered_identifier(&self, identifier: Option<String>) -> Result<(), PreferencesError> {
        let identifier = identifier.filter(|value| !value.trim().is_empty());
        self.update(|payload| payload.remembered_identifier = identifier)
    }

    fn update(&self, apply: impl FnOnce(&mut PreferencesPayload)) -> Result<(), PreferencesError> {
        let mut payload = self.lock();
        apply(&mut payload);
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, PreferencesPayload> {
        // A poisoned lock still holds a complete payload; keep serving it.
        self.payload.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save_locked(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stuffsdrop")
        .join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(PreferencesPayload::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(PreferencesPayload::default()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_a_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(PREFERENCES_FILE_NAME);

        let prefs = UserPreferences::at_path(&path).expect("open preferences");
        assert_eq!(prefs.theme_mode(), None);
        prefs.set_theme_mode(ThemeMode::Light).expect("save theme");
        prefs
            .set_remembered_identifier(Some("a@b.com".into()))
            .expect("save identifier");

        let reopened = UserPreferences::at_path(&path).expect("reopen preferences");
        assert_eq!(reopened.theme_mode(), Some(ThemeMode::Light));
        assert_eq!(reopened.remembered_identifier().as_deref(), Some("a@b.com"));
    }

    #[test]
    fn blank_identifier_clears_the_entry() {
        let prefs = UserPreferences::ephemeral();
        prefs.set_remembered_identifier(Some("abc".into())).expect("save");
        prefs.set_remembered_identifier(Some("  ".into())).expect("clear");
        assert_eq!(prefs.remembered_identifier(), None);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        fs::write(&path, "{ not json").expect("write corrupt file");

        let prefs = UserPreferences::at_path(&path).expect("open preferences");
        assert_eq!(prefs.theme_mode(), None);
    }

    #[test]
    fn env_override_selects_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.json");
        let value = path.to_string_lossy().to_string();

        temp_env::with_var(PREFERENCES_PATH_ENV, Some(value.as_str()), || {
            let prefs = UserPreferences::new().expect("open preferences");
            assert_eq!(prefs.path(), path.as_path());
        });
    }

    #[test]
    fn ephemeral_store_never_touches_disk() {
        let prefs = UserPreferences::ephemeral();
        prefs.set_theme_mode(ThemeMode::Dark).expect("in-memory save");
        assert_eq!(prefs.theme_mode(), Some(ThemeMode::Dark));
        assert!(prefs.path().as_os_str().is_empty());
    }
}

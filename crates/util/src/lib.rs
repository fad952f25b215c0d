pub mod preferences;
pub mod relative_time;
pub mod text;

use std::{env, path::PathBuf};

use dirs_next::{config_dir, home_dir};

pub use preferences::{PreferencesError, UserPreferences};
pub use relative_time::format_relative_age;
pub use text::{redact_json, truncate_to_width};

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if p == "~" {
        return home();
    }
    if let Some(rest) = p.strip_prefix("~/").or_else(|| p.strip_prefix("~\\")) {
        return home().join(rest);
    }
    PathBuf::from(p)
}

/// Environment variable overriding the log file location.
pub const LOG_PATH_ENV: &str = "STUFFSDROP_LOG_PATH";

/// Where the client writes its log: `STUFFSDROP_LOG_PATH` when set, else
/// `stuffsdrop.log` in the configuration directory.
pub fn log_file_path() -> PathBuf {
    if let Ok(path) = env::var(LOG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stuffsdrop")
        .join("stuffsdrop.log")
}

/// Interprets common "on" spellings from environment variables.
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

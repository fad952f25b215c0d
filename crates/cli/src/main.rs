use std::{
    env,
    fs::{self, OpenOptions},
    path::Path,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::Parser;
use stuffsdrop_api::{AuthProvider, DataProvider, DemoBackend, HttpBackend, StuffsDropClient};
use stuffsdrop_tui::SharedCtx;
use stuffsdrop_types::{StaticResources, ThemeMode};
use stuffsdrop_util::{UserPreferences, is_truthy, log_file_path};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Truthy values select the demo backend, like `--demo`.
const DEMO_ENV: &str = "STUFFSDROP_DEMO";

/// Terminal client for the StuffsDrop marketplace.
#[derive(Debug, Parser)]
#[command(name = "stuffsdrop", version, about)]
struct Args {
    /// Base URL of the StuffsDrop API (https, or any scheme on localhost)
    #[arg(long, value_name = "URL", env = "STUFFSDROP_API_BASE")]
    api_base: Option<String>,

    /// Use the in-memory demo backend instead of the API
    #[arg(long)]
    demo: bool,

    /// Start in this theme, ignoring the saved preference
    #[arg(long, value_name = "light|dark")]
    theme: Option<ThemeMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&log_file_path());

    let demo = args.demo || env::var(DEMO_ENV).is_ok_and(|value| is_truthy(&value));
    let (auth, data) = build_backend(&args, demo)?;
    let preferences = Arc::new(UserPreferences::open_or_ephemeral());
    let ctx = SharedCtx::new(Arc::new(StaticResources), auth, data, preferences);

    info!(demo, "starting stuffsdrop");
    stuffsdrop_tui::run(ctx, args.theme).await
}

/// Routes tracing output to the log file. The TUI owns stdout, so when the
/// file cannot be opened logging is left disabled and the reason goes to
/// stderr before the terminal switches to the alternate screen.
fn init_tracing(path: &Path) {
    let file = match open_log_file(path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("stuffsdrop: logging disabled, cannot open {}: {error:#}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

fn build_backend(args: &Args, demo: bool) -> Result<(Arc<dyn AuthProvider>, Arc<dyn DataProvider>)> {
    if demo {
        let backend = Arc::new(DemoBackend::new());
        return Ok((backend.clone(), backend));
    }
    let client = StuffsDropClient::new(args.api_base.clone()).context("configure the StuffsDrop API client")?;
    let backend = Arc::new(HttpBackend::new(client));
    Ok((backend.clone(), backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        temp_env::with_var("STUFFSDROP_API_BASE", None::<&str>, || Args::try_parse_from(argv).expect("parse args"))
    }

    #[test]
    fn defaults_to_http_backend_and_saved_theme() {
        let args = parse(&["stuffsdrop"]);
        assert!(!args.demo);
        assert!(args.api_base.is_none());
        assert!(args.theme.is_none());
    }

    #[test]
    fn parses_theme_and_demo_flags() {
        let args = parse(&["stuffsdrop", "--demo", "--theme", "dark"]);
        assert!(args.demo);
        assert_eq!(args.theme, Some(ThemeMode::Dark));
    }

    #[test]
    fn rejects_unknown_theme() {
        let result = temp_env::with_var("STUFFSDROP_API_BASE", None::<&str>, || Args::try_parse_from(["stuffsdrop", "--theme", "sepia"]));
        assert!(result.is_err());
    }

    #[test]
    fn insecure_remote_base_is_rejected() {
        let args = parse(&["stuffsdrop", "--api-base", "http://api.stuffsdrop.app"]);
        temp_env::with_var("STUFFSDROP_API_TOKEN", None::<&str>, || {
            assert!(build_backend(&args, false).is_err());
        });
    }

    #[test]
    fn log_file_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("stuffsdrop.log");
        assert!(open_log_file(&path).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn log_file_errors_name_the_blocked_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").expect("write blocker");

        let error = open_log_file(&blocker.join("stuffsdrop.log")).expect_err("parent is a file");
        assert!(format!("{error:#}").contains("not-a-dir"));
    }

    #[test]
    fn demo_flag_skips_client_configuration() {
        let args = parse(&["stuffsdrop", "--demo", "--api-base", "http://api.stuffsdrop.app"]);
        assert!(build_backend(&args, args.demo).is_ok());
    }
}

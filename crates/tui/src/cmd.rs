//! # Command Execution Layer
//!
//! Translates the [`Effect`]s emitted by state updates into imperative
//! [`Cmd`]s and executes them. This is the boundary where the pure state
//! machines meet side effects:
//! - calls to the auth and data collaborators,
//! - preference writes,
//! - launching the platform mail client.
//!
//! Quick commands run inline and report through [`CommandBatch::immediate`];
//! network calls are spawned on the tokio runtime and surface later through
//! [`CommandBatch::pending`]. Navigation effects never reach this module; the
//! runtime applies them before dispatching the rest.

use std::{
    process::{Command, Stdio},
    sync::Arc,
};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use stuffsdrop_api::{AuthProvider, DataProvider};
use stuffsdrop_types::{Effect, ExecOutcome, LoginRequest, RegistrationPayload, ThemeMode};
use stuffsdrop_util::UserPreferences;
use tokio::task::{JoinHandle, spawn, spawn_blocking};
use tracing::{debug, warn};

use crate::app::App;

/// Characters escaped in the address part of a `mailto:` URI. Shell
/// metacharacters are included so the target is inert on every launcher.
const MAILTO_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b';')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Side-effectful commands executed outside of pure state updates.
#[derive(Debug)]
pub enum Cmd {
    Login(LoginRequest),
    Register(Box<RegistrationPayload>),
    Logout,
    LoadIdentity,
    LoadListings,
    /// Open `mailto:` for the address.
    OpenMailClient(String),
    RememberIdentifier(Option<String>),
    PersistTheme(ThemeMode),
}

/// Results of one dispatch round.
#[derive(Debug, Default)]
pub struct CommandBatch {
    /// Outcomes available right away.
    pub immediate: Vec<ExecOutcome>,
    /// Spawned work whose outcome arrives later.
    pub pending: Vec<JoinHandle<ExecOutcome>>,
}

/// Convert application [`Effect`]s into [`Cmd`]s.
///
/// Navigation effects (`SwitchTo`, `ShowModal`, `CloseModal`) have no
/// command and are dropped here.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Login(request) => Some(Cmd::Login(request)),
            Effect::Register(payload) => Some(Cmd::Register(payload)),
            Effect::Logout => Some(Cmd::Logout),
            Effect::LoadIdentity => Some(Cmd::LoadIdentity),
            Effect::LoadListings => Some(Cmd::LoadListings),
            Effect::OpenMailClient(address) => Some(Cmd::OpenMailClient(address)),
            Effect::RememberIdentifier(identifier) => Some(Cmd::RememberIdentifier(identifier)),
            Effect::PersistTheme(mode) => Some(Cmd::PersistTheme(mode)),
            Effect::SwitchTo(_) | Effect::ShowModal(_) | Effect::CloseModal => None,
        })
        .collect()
}

/// Execute commands, spawning collaborator calls on the runtime.
pub fn run_cmds(app: &App, commands: Vec<Cmd>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for command in commands {
        debug!(?command, "dispatching command");
        match command {
            Cmd::Login(request) => {
                let auth = Arc::clone(&app.ctx.auth);
                batch.pending.push(spawn(login(auth, request)));
            }
            Cmd::Register(payload) => {
                let auth = Arc::clone(&app.ctx.auth);
                batch.pending.push(spawn(register(auth, *payload)));
            }
            Cmd::Logout => {
                let auth = Arc::clone(&app.ctx.auth);
                batch.pending.push(spawn(logout(auth)));
            }
            Cmd::LoadIdentity => {
                let auth = Arc::clone(&app.ctx.auth);
                batch.pending.push(spawn(load_identity(auth)));
            }
            Cmd::LoadListings => {
                let data = Arc::clone(&app.ctx.data);
                batch.pending.push(spawn(load_listings(data)));
            }
            Cmd::OpenMailClient(address) => {
                batch.pending.push(spawn(open_mail_client(address)));
            }
            Cmd::RememberIdentifier(identifier) => {
                batch.immediate.extend(remember_identifier(&app.ctx.preferences, identifier));
            }
            Cmd::PersistTheme(mode) => {
                batch.immediate.extend(persist_theme(&app.ctx.preferences, mode));
            }
        }
    }
    batch
}

/// Convenience wrapper: translate and execute in one call.
pub async fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> CommandBatch {
    run_cmds(app, from_effects(effects))
}

async fn login(auth: Arc<dyn AuthProvider>, request: LoginRequest) -> ExecOutcome {
    ExecOutcome::LoggedIn(auth.login(request).await.map_err(|error| error.message()))
}

async fn register(auth: Arc<dyn AuthProvider>, payload: RegistrationPayload) -> ExecOutcome {
    ExecOutcome::Registered(auth.register(payload).await.map_err(|error| error.message()))
}

async fn logout(auth: Arc<dyn AuthProvider>) -> ExecOutcome {
    ExecOutcome::LoggedOut(auth.logout().await.map_err(|error| error.message()))
}

async fn load_identity(auth: Arc<dyn AuthProvider>) -> ExecOutcome {
    ExecOutcome::IdentityLoaded(auth.get_identity().await)
}

async fn load_listings(data: Arc<dyn DataProvider>) -> ExecOutcome {
    ExecOutcome::ListingsLoaded(data.list_listings().await.map_err(|error| error.to_string()))
}

async fn open_mail_client(address: String) -> ExecOutcome {
    let target = mailto_target(&address);
    let joined = spawn_blocking(move || mail_command(&target).status()).await;
    match joined {
        Ok(Ok(status)) if status.success() => ExecOutcome::Log(format!("Opened mail client for {address}")),
        Ok(Ok(status)) => ExecOutcome::Log(format!("Mail client exited with {status}")),
        Ok(Err(error)) => {
            warn!(%error, "failed to launch mail client");
            ExecOutcome::Log(format!("Could not open a mail client: {error}"))
        }
        Err(error) => ExecOutcome::Log(format!("Mail client task failed: {error}")),
    }
}

fn mailto_target(address: &str) -> String {
    format!("mailto:{}", utf8_percent_encode(address.trim(), MAILTO_ENCODE_SET))
}

/// The launcher never goes through a shell and never touches the terminal.
fn mail_command(target: &str) -> Command {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("rundll32");
        command.arg("url.dll,FileProtocolHandler");
        command
    } else {
        Command::new("xdg-open")
    };
    command
        .arg(target)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

fn remember_identifier(preferences: &UserPreferences, identifier: Option<String>) -> Option<ExecOutcome> {
    match preferences.set_remembered_identifier(identifier) {
        Ok(()) => None,
        Err(error) => {
            warn!(%error, "failed to persist remembered identifier");
            Some(ExecOutcome::Log(format!("Could not remember the sign-in identifier: {error}")))
        }
    }
}

fn persist_theme(preferences: &UserPreferences, mode: ThemeMode) -> Option<ExecOutcome> {
    match preferences.set_theme_mode(mode) {
        Ok(()) => None,
        Err(error) => {
            warn!(%error, "failed to persist theme mode");
            Some(ExecOutcome::Log(format!("Could not save the theme preference: {error}")))
        }
    }
}

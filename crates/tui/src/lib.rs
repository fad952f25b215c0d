//! # StuffsDrop TUI Library
//!
//! Terminal client for the StuffsDrop marketplace built on Ratatui.
//!
//! ## Key Features
//!
//! - Login and a three-step registration wizard
//! - Listings browse with grid and map views, search and category filter
//! - Grouped, collapsible navigation sidebar with a logout confirmation
//! - Light and dark themes with persisted preference
//!
//! ## Architecture
//!
//! Screen state machines live on [`app::App`] and are driven by messages and
//! input; components render them and return effects, which the command layer
//! executes against the auth and data collaborators.

mod app;
mod cmd;
mod providers;
mod ui;

use anyhow::Result;
pub use app::SharedCtx;
use stuffsdrop_types::ThemeMode;

/// Runs the TUI until the user quits.
///
/// `theme_override` takes precedence over the persisted theme preference.
///
/// # Errors
///
/// Terminal setup failures and render errors (a component reading a context
/// that was never installed) end the session with an error after the
/// terminal has been restored.
pub async fn run(ctx: SharedCtx, theme_override: Option<ThemeMode>) -> Result<()> {
    ui::runtime::run_app(ctx, theme_override).await
}

//! UI rendering module for the TUI application.
//!
//! Holds the component tree, the main view that lays it out, the event loop
//! and the light/dark palettes.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;

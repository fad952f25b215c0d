//! StuffsDrop backend access.
//!
//! The UI depends only on the [`AuthProvider`] and [`DataProvider`] traits.
//! Two implementations ship here:
//!
//! - [`HttpBackend`], talking JSON to the marketplace API through a
//!   [`StuffsDropClient`] with a validated base URL,
//! - [`DemoBackend`], an in-memory stand-in seeded with sample drops.

mod client;
mod demo;
mod http;
mod provider;

pub use client::{API_BASE_ENV, API_TOKEN_ENV, DEFAULT_API_BASE, StuffsDropClient, validate_base_url};
pub use demo::{DEMO_EMAIL, DEMO_PASSWORD, DemoBackend, seed_listings};
pub use http::HttpBackend;
pub use provider::{AuthError, AuthProvider, DataError, DataProvider};

//! HTTP client construction for the StuffsDrop API.
//!
//! The base URL comes from the caller, `STUFFSDROP_API_BASE`, or the public
//! default, in that order. An optional bearer token is read from
//! `STUFFSDROP_API_TOKEN`.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Url, header};
use tracing::debug;

pub const API_BASE_ENV: &str = "STUFFSDROP_API_BASE";
pub const API_TOKEN_ENV: &str = "STUFFSDROP_API_TOKEN";
pub const DEFAULT_API_BASE: &str = "https://api.stuffsdrop.app";

/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for StuffsDrop API access.
pub struct StuffsDropClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl StuffsDropClient {
    /// Builds a client for `base_url`, falling back to the environment and then
    /// to [`DEFAULT_API_BASE`].
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let base_url = base_url
            .or_else(|| env::var(API_BASE_ENV).ok())
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        if let Some(token) = env::var(API_TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()) {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .context("STUFFSDROP_API_TOKEN is not a valid header value")?;
            default_headers.insert(header::AUTHORIZATION, value);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("stuffsdrop-tui/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
pub fn validate_base_url(base: &str) -> Result<()> {
    let parsed = Url::parse(base).map_err(|e| anyhow!("Invalid {API_BASE_ENV} URL '{}': {}", base, e))?;

    let host_name = parsed
        .host_str()
        .ok_or_else(|| anyhow!("{API_BASE_ENV} must include a host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        return Err(anyhow!(
            "{API_BASE_ENV} must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_accepts_any_scheme() {
        assert!(validate_base_url("http://localhost:8080").is_ok());
        assert!(validate_base_url("http://127.0.0.1").is_ok());
    }

    #[test]
    fn remote_hosts_require_https() {
        assert!(validate_base_url("https://api.stuffsdrop.app").is_ok());
        let err = validate_base_url("http://api.stuffsdrop.app").expect_err("plain http rejected");
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn base_url_resolution_order() {
        temp_env::with_vars([(API_BASE_ENV, Some("http://localhost:9000/")), (API_TOKEN_ENV, None)], || {
            let from_env = StuffsDropClient::new(None).expect("client from env");
            assert_eq!(from_env.base_url, "http://localhost:9000");

            let explicit = StuffsDropClient::new(Some("https://staging.stuffsdrop.app".into())).expect("explicit client");
            assert_eq!(explicit.base_url, "https://staging.stuffsdrop.app");
        });
        temp_env::with_var_unset(API_BASE_ENV, || {
            let default = StuffsDropClient::new(None).expect("default client");
            assert_eq!(default.base_url, DEFAULT_API_BASE);
        });
    }
}

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use stuffsdrop_types::{Identity, Listing, LoginRequest, RegistrationPayload};
use stuffsdrop_util::redact_json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::StuffsDropClient;
use crate::provider::{AuthError, AuthProvider, DataError, DataProvider};

/// Session returned by the login endpoint.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    user: Identity,
}

/// JSON-over-HTTP implementation of both collaborators.
#[derive(Debug)]
pub struct HttpBackend {
    client: StuffsDropClient,
    session_token: Mutex<Option<String>>,
}

impl HttpBackend {
    pub fn new(client: StuffsDropClient) -> Self {
        Self {
            client,
            session_token: Mutex::new(None),
        }
    }

    async fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, path);
        match self.session_token.lock().await.as_deref() {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }
}

/// Extracts the backend's `message` (or `error`) field from an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

async fn rejection(response: Response) -> AuthError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED && body.trim().is_empty() {
        return AuthError::Unauthenticated;
    }
    AuthError::Rejected(error_message(&body).unwrap_or_default())
}

#[async_trait]
impl AuthProvider for HttpBackend {
    async fn login(&self, request: LoginRequest) -> Result<Identity, AuthError> {
        let response = self.request(Method::POST, "/auth/login").await.json(&request).send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let session: LoginResponse = response.json().await.map_err(|e| AuthError::Decode(e.to_string()))?;
        *self.session_token.lock().await = session.token;
        info!(email = %session.user.email, "signed in");
        Ok(session.user)
    }

    async fn register(&self, payload: RegistrationPayload) -> Result<(), AuthError> {
        if let Ok(body) = serde_json::to_value(&payload) {
            debug!(payload = %redact_json(&body), "submitting registration");
        }
        let response = self.request(Method::POST, "/auth/register").await.json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        info!(email = %payload.email, role = %payload.role, "registration accepted");
        Ok(())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let response = self.request(Method::POST, "/auth/logout").await.send().await;
        *self.session_token.lock().await = None;
        match response {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => Err(rejection(response).await),
            Err(error) => Err(error.into()),
        }
    }

    async fn get_identity(&self) -> Option<Identity> {
        let response = match self.request(Method::GET, "/auth/me").await.send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "no active session");
                return None;
            }
            Err(error) => {
                warn!(error = %error, "identity lookup failed");
                return None;
            }
        };
        response
            .json::<Identity>()
            .await
            .inspect_err(|error| warn!(error = %error, "identity payload malformed"))
            .ok()
    }
}

#[async_trait]
impl DataProvider for HttpBackend {
    async fn list_listings(&self) -> Result<Vec<Listing>, DataError> {
        let response = self.request(Method::GET, "/listings").await.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Status {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_else(|| status.to_string()),
            });
        }
        response.json().await.map_err(|e| DataError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_then_error() {
        assert_eq!(error_message(r#"{"message":"Email taken"}"#).as_deref(), Some("Email taken"));
        assert_eq!(error_message(r#"{"error":"Bad password"}"#).as_deref(), Some("Bad password"));
        assert_eq!(error_message(r#"{"status":409}"#), None);
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn login_response_tolerates_missing_token() {
        let json = r#"{"user":{"id":"u1","email":"a@b.com"}}"#;
        let session: LoginResponse = serde_json::from_str(json).expect("deserialize session");
        assert!(session.token.is_none());
        assert_eq!(session.user.display_name(), "User");
    }
}

use async_trait::async_trait;
use stuffsdrop_types::{Identity, Listing, LoginRequest, RegistrationPayload};
use thiserror::Error;

/// Failure reported by the auth collaborator.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend refused the request; the message is shown to the user verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("not signed in")]
    Unauthenticated,
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl AuthError {
    /// User-facing message. Empty when the backend rejected without one.
    pub fn message(&self) -> String {
        match self {
            AuthError::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Authentication collaborator.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, request: LoginRequest) -> Result<Identity, AuthError>;
    async fn register(&self, payload: RegistrationPayload) -> Result<(), AuthError>;
    async fn logout(&self) -> Result<(), AuthError>;
    /// Current user, or `None` without a session.
    async fn get_identity(&self) -> Option<Identity>;
}

/// Marketplace data collaborator.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn list_listings(&self) -> Result<Vec<Listing>, DataError>;
}

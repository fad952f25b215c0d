//! In-memory backend used by `--demo` and by tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use indexmap::IndexMap;
use stuffsdrop_types::{Condition, Identity, Listing, LoginRequest, RegistrationPayload};
use tokio::sync::Mutex;
use tracing::info;

use crate::provider::{AuthError, AuthProvider, DataError, DataProvider};

pub const DEMO_EMAIL: &str = "demo@stuffsdrop.app";
pub const DEMO_PASSWORD: &str = "stuffs123";

struct Account {
    username: String,
    password: String,
    identity: Identity,
}

#[derive(Default)]
struct DemoState {
    accounts: IndexMap<String, Account>,
    session: Option<Identity>,
}

/// Accounts and listings held in memory for the lifetime of the process.
pub struct DemoBackend {
    state: Mutex<DemoState>,
    listings: Vec<Listing>,
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoBackend {
    /// Seeds one demo account and the sample listings.
    pub fn new() -> Self {
        let mut accounts = IndexMap::new();
        accounts.insert(
            DEMO_EMAIL.to_string(),
            Account {
                username: "demo".to_string(),
                password: DEMO_PASSWORD.to_string(),
                identity: Identity {
                    id: "user-1".to_string(),
                    name: Some("Demo Dropper".to_string()),
                    email: DEMO_EMAIL.to_string(),
                    image_url: None,
                    roles: vec!["BOTH".to_string()],
                },
            },
        );
        Self {
            state: Mutex::new(DemoState { accounts, session: None }),
            listings: seed_listings(),
        }
    }
}

#[async_trait]
impl AuthProvider for DemoBackend {
    async fn login(&self, request: LoginRequest) -> Result<Identity, AuthError> {
        let mut state = self.state.lock().await;
        let identifier = request.email.trim();
        let account = state
            .accounts
            .values()
            .find(|account| account.identity.email.eq_ignore_ascii_case(identifier) || account.username == identifier)
            .filter(|account| account.password == request.password)
            .ok_or_else(|| AuthError::Rejected("Invalid email or password".to_string()))?;
        let identity = account.identity.clone();
        state.session = Some(identity.clone());
        info!(email = %identity.email, "demo session started");
        Ok(identity)
    }

    async fn register(&self, payload: RegistrationPayload) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        let key = payload.email.to_ascii_lowercase();
        if state.accounts.contains_key(&key) {
            return Err(AuthError::Rejected("Email taken".to_string()));
        }
        if state.accounts.values().any(|account| account.username == payload.username) {
            return Err(AuthError::Rejected("Username taken".to_string()));
        }
        let identity = Identity {
            id: format!("user-{}", state.accounts.len() + 1),
            name: Some(payload.full_name.clone()).filter(|name| !name.is_empty()),
            email: payload.email.clone(),
            image_url: Some(payload.avatar.clone()).filter(|url| !url.is_empty()),
            roles: vec![payload.role.clone()],
        };
        state.accounts.insert(
            key,
            Account {
                username: payload.username,
                password: payload.password,
                identity,
            },
        );
        Ok(())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.state.lock().await.session = None;
        Ok(())
    }

    async fn get_identity(&self) -> Option<Identity> {
        self.state.lock().await.session.clone()
    }
}

#[async_trait]
impl DataProvider for DemoBackend {
    async fn list_listings(&self) -> Result<Vec<Listing>, DataError> {
        Ok(self.listings.clone())
    }
}

/// Sample drops around lower Manhattan.
pub fn seed_listings() -> Vec<Listing> {
    let now = Utc::now();
    let listing = |id: &str, title: &str, category: &str, condition, distance, minutes_ago, tags: &[&str], is_hot, lat, lon| Listing {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        condition,
        distance_miles: distance,
        image_url: None,
        posted_at: now - Duration::minutes(minutes_ago),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        is_hot,
        latitude: lat,
        longitude: lon,
    };
    vec![
        listing(
            "1",
            "Vintage Denim Jacket",
            "Clothing",
            Condition::Good,
            1.2,
            120,
            &["Denim", "Vintage", "Size M"],
            true,
            40.7128,
            -74.0060,
        ),
        listing(
            "2",
            "Unused Blender",
            "Household",
            Condition::New,
            3.5,
            300,
            &["Kitchen", "Electronics"],
            false,
            40.7200,
            -74.0100,
        ),
        listing(
            "3",
            "Leather Boots",
            "Shoes",
            Condition::LikeNew,
            0.5,
            10,
            &["Leather", "Size 10"],
            false,
            40.7300,
            -73.9950,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use stuffsdrop_types::{RegistrationForm, Role};

    use super::*;

    fn payload(email: &str, username: &str) -> RegistrationPayload {
        let form = RegistrationForm {
            email: email.into(),
            username: username.into(),
            password: "secret".into(),
            full_name: "A B".into(),
            ..Default::default()
        };
        RegistrationPayload::from_form(&form, Role::Receiver)
    }

    #[tokio::test]
    async fn demo_account_signs_in_by_email_or_username() {
        let backend = DemoBackend::new();
        assert!(backend.get_identity().await.is_none());

        let identity = backend
            .login(LoginRequest {
                email: "demo".into(),
                password: DEMO_PASSWORD.into(),
                remember: false,
            })
            .await
            .expect("demo login");
        assert_eq!(identity.email, DEMO_EMAIL);
        assert_eq!(backend.get_identity().await, Some(identity));

        backend.logout().await.expect("logout");
        assert!(backend.get_identity().await.is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let backend = DemoBackend::new();
        let err = backend
            .login(LoginRequest {
                email: DEMO_EMAIL.into(),
                password: "nope".into(),
                remember: false,
            })
            .await
            .expect_err("bad password");
        assert_eq!(err.message(), "Invalid email or password");
    }

    #[tokio::test]
    async fn duplicate_email_is_taken() {
        let backend = DemoBackend::new();
        backend.register(payload("a@b.com", "abc")).await.expect("first registration");
        let err = backend.register(payload("A@B.com", "xyz")).await.expect_err("duplicate");
        assert_eq!(err.message(), "Email taken");

        let identity = backend
            .login(LoginRequest {
                email: "abc".into(),
                password: "secret".into(),
                remember: true,
            })
            .await
            .expect("new account signs in");
        assert_eq!(identity.display_name(), "A B");
        assert_eq!(identity.display_role(), "RECEIVER");
    }

    #[tokio::test]
    async fn serves_seeded_listings() {
        let listings = DemoBackend::new().list_listings().await.expect("listings");
        let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["Vintage Denim Jacket", "Unused Blender", "Leather Boots"]);
    }
}

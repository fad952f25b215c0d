use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Identity {
    /// Name shown in the sidebar, "User" when unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|name| !name.is_empty()).unwrap_or("User")
    }

    /// First role, "Member" when none is assigned.
    pub fn display_role(&self) -> &str {
        self.roles
            .first()
            .map(String::as_str)
            .filter(|role| !role.is_empty())
            .unwrap_or("Member")
    }

    pub fn has_avatar(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Credentials submitted by the login form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email or username.
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember", &self.remember)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_apply_to_missing_or_blank_values() {
        let anonymous = Identity::default();
        assert_eq!(anonymous.display_name(), "User");
        assert_eq!(anonymous.display_role(), "Member");
        assert!(!anonymous.has_avatar());

        let named = Identity {
            name: Some("Ada".into()),
            roles: vec!["GIVER".into(), "ADMIN".into()],
            ..Default::default()
        };
        assert_eq!(named.display_name(), "Ada");
        assert_eq!(named.display_role(), "GIVER");
    }

    #[test]
    fn deserializes_wire_identity() {
        let json = r#"{"id":"u1","name":null,"email":"a@b.com","imageUrl":"https://x/y.png","roles":[]}"#;
        let identity: Identity = serde_json::from_str(json).expect("deserialize identity");
        assert_eq!(identity.email, "a@b.com");
        assert!(identity.has_avatar());
        assert_eq!(identity.display_name(), "User");
    }

    #[test]
    fn debug_output_hides_password() {
        let request = LoginRequest {
            email: "a@b.com".into(),
            password: "hunter22".into(),
            remember: true,
        };
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("a@b.com"));
    }
}

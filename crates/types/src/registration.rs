//! Registration model: roles, categories, form state and the submission payload.
//!
//! Everything role-dependent is looked up once through [`role_config`]; callers
//! never branch on the role to decide which profile inputs exist or which
//! capabilities an account receives.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod progress;
pub mod validation;

pub use progress::progress_score;
pub use validation::{is_email_like, validate_step};

/// Account archetype chosen on the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Giver,
    Receiver,
    Both,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Giver, Role::Receiver, Role::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Giver => "giver",
            Role::Receiver => "receiver",
            Role::Both => "both",
        }
    }

    pub fn config(self) -> &'static RoleConfig {
        role_config(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "role",
                value: s.to_string(),
            })
    }
}

/// Category tags a member can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Clothing,
    Accessories,
    Shoes,
    Bags,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Clothing,
        Category::Accessories,
        Category::Shoes,
        Category::Bags,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Accessories => "Accessories",
            Category::Shoes => "Shoes",
            Category::Bags => "Bags",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Optional profile inputs that only some roles fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    PreferredCategories,
    AboutGiving,
    AboutReceiving,
}

/// Static per-role configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleConfig {
    pub role: Role,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    /// Step-two inputs shown for this role.
    pub fields: &'static [ProfileField],
    /// Role identifier stored by the backend.
    pub db_role: &'static str,
    pub can_list_items: bool,
    pub can_request_items: bool,
}

impl RoleConfig {
    pub fn uses(&self, field: ProfileField) -> bool {
        self.fields.contains(&field)
    }
}

static ROLE_CONFIGS: [RoleConfig; 3] = [
    RoleConfig {
        role: Role::Giver,
        title: "The Supplier",
        subtitle: "Giver",
        description: "Clear your closet. Drop heat for the community.",
        fields: &[ProfileField::PreferredCategories, ProfileField::AboutGiving],
        db_role: "GIVER",
        can_list_items: true,
        can_request_items: false,
    },
    RoleConfig {
        role: Role::Receiver,
        title: "The Collector",
        subtitle: "Receiver",
        description: "Hunt for hidden gems and secure the drops.",
        fields: &[ProfileField::PreferredCategories, ProfileField::AboutReceiving],
        db_role: "RECEIVER",
        can_list_items: false,
        can_request_items: true,
    },
    RoleConfig {
        role: Role::Both,
        title: "All Access",
        subtitle: "Both",
        description: "Full ecosystem access. Give back and get back.",
        fields: &[
            ProfileField::PreferredCategories,
            ProfileField::AboutGiving,
            ProfileField::AboutReceiving,
        ],
        db_role: "BOTH",
        can_list_items: true,
        can_request_items: true,
    },
];

pub fn role_config(role: Role) -> &'static RoleConfig {
    match role {
        Role::Giver => &ROLE_CONFIGS[0],
        Role::Receiver => &ROLE_CONFIGS[1],
        Role::Both => &ROLE_CONFIGS[2],
    }
}

/// Ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    Identity,
    Profile,
    Connections,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Identity, WizardStep::Profile, WizardStep::Connections];

    /// One-based position of the step.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Identity => 1,
            WizardStep::Profile => 2,
            WizardStep::Connections => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Identity => "Identity & Access",
            WizardStep::Profile => "Profile Details",
            WizardStep::Connections => "Connections",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            WizardStep::Identity => "Choose your path",
            WizardStep::Profile => "Tell us about you",
            WizardStep::Connections => "Link your socials",
        }
    }

    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Identity => Some(WizardStep::Profile),
            WizardStep::Profile => Some(WizardStep::Connections),
            WizardStep::Connections => None,
        }
    }

    pub fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::Identity => None,
            WizardStep::Profile => Some(WizardStep::Identity),
            WizardStep::Connections => Some(WizardStep::Profile),
        }
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

/// Form inputs addressable by the wizard. The key doubles as the error key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Role,
    Email,
    Username,
    Password,
    ConfirmPassword,
    FullName,
    Location,
    Bio,
    Avatar,
    PreferredCategories,
    AboutGiving,
    AboutReceiving,
    Instagram,
    Twitter,
    Submit,
}

impl FormField {
    pub fn key(self) -> &'static str {
        match self {
            FormField::Role => "role",
            FormField::Email => "email",
            FormField::Username => "username",
            FormField::Password => "password",
            FormField::ConfirmPassword => "confirmPassword",
            FormField::FullName => "fullName",
            FormField::Location => "location",
            FormField::Bio => "bio",
            FormField::Avatar => "avatar",
            FormField::PreferredCategories => "preferredCategories",
            FormField::AboutGiving => "aboutGiving",
            FormField::AboutReceiving => "aboutReceiving",
            FormField::Instagram => "instagram",
            FormField::Twitter => "twitter",
            FormField::Submit => "submit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialPlatform {
    Instagram,
    Twitter,
}

impl SocialPlatform {
    pub fn field(self) -> FormField {
        match self {
            Self::Instagram => FormField::Instagram,
            Self::Twitter => FormField::Twitter,
        }
    }

    pub fn from_field(field: FormField) -> Option<Self> {
        match field {
            FormField::Instagram => Some(Self::Instagram),
            FormField::Twitter => Some(Self::Twitter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub instagram: String,
    pub twitter: String,
}

/// Everything the wizard collects before submission.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub role: Option<Role>,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub location: String,
    pub bio: String,
    pub avatar: String,
    pub preferred_categories: Vec<Category>,
    pub about_giving: String,
    pub about_receiving: String,
    pub social_links: SocialLinks,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("role", &self.role)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("location", &self.location)
            .field("preferred_categories", &self.preferred_categories)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Mutable access to a free-text input. Returns `None` for non-text fields.
    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        let value = match field {
            FormField::Email => &mut self.email,
            FormField::Username => &mut self.username,
            FormField::Password => &mut self.password,
            FormField::ConfirmPassword => &mut self.confirm_password,
            FormField::FullName => &mut self.full_name,
            FormField::Location => &mut self.location,
            FormField::Bio => &mut self.bio,
            FormField::Avatar => &mut self.avatar,
            FormField::AboutGiving => &mut self.about_giving,
            FormField::AboutReceiving => &mut self.about_receiving,
            FormField::Instagram => &mut self.social_links.instagram,
            FormField::Twitter => &mut self.social_links.twitter,
            FormField::Role | FormField::PreferredCategories | FormField::Submit => return None,
        };
        Some(value)
    }

    pub fn text(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::Email => &self.email,
            FormField::Username => &self.username,
            FormField::Password => &self.password,
            FormField::ConfirmPassword => &self.confirm_password,
            FormField::FullName => &self.full_name,
            FormField::Location => &self.location,
            FormField::Bio => &self.bio,
            FormField::Avatar => &self.avatar,
            FormField::AboutGiving => &self.about_giving,
            FormField::AboutReceiving => &self.about_receiving,
            FormField::Instagram => &self.social_links.instagram,
            FormField::Twitter => &self.social_links.twitter,
            FormField::Role | FormField::PreferredCategories | FormField::Submit => return None,
        };
        Some(value.as_str())
    }

    /// Adds the tag when absent, removes it when present. Remaining tags keep
    /// their order.
    pub fn toggle_category(&mut self, category: Category) {
        if let Some(position) = self.preferred_categories.iter().position(|c| *c == category) {
            self.preferred_categories.remove(position);
        } else {
            self.preferred_categories.push(category);
        }
    }

    pub fn set_social_link(&mut self, platform: SocialPlatform, value: impl Into<String>) {
        let slot = match platform {
            SocialPlatform::Instagram => &mut self.social_links.instagram,
            SocialPlatform::Twitter => &mut self.social_links.twitter,
        };
        *slot = value.into();
    }

    /// Step-two inputs for the selected role; empty when no role is chosen.
    pub fn profile_fields(&self) -> &'static [ProfileField] {
        self.role.map(|role| role_config(role).fields).unwrap_or(&[])
    }

    pub fn uses_profile_field(&self, field: ProfileField) -> bool {
        self.profile_fields().contains(&field)
    }
}

/// Field-keyed validation messages, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(IndexMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field.key(), message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(field.key()).map(String::as_str)
    }

    pub fn get_key(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Removes a single field's message.
    pub fn clear_field(&mut self, field: FormField) {
        self.0.shift_remove(field.key());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Plus,
}

/// Body sent to the registration collaborator.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub email: String,
    pub password: String,
    pub username: String,
    pub role: String,
    pub subscription_tier: SubscriptionTier,
    pub full_name: String,
    pub location: String,
    pub bio: String,
    pub avatar: String,
    pub preferred_categories: Vec<Category>,
    pub about_giving: String,
    pub about_receiving: String,
    pub social_links: SocialLinks,
    pub can_list_items: bool,
    pub can_request_items: bool,
}

impl fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationPayload")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("subscription_tier", &self.subscription_tier)
            .field("full_name", &self.full_name)
            .field("location", &self.location)
            .field("preferred_categories", &self.preferred_categories)
            .field("can_list_items", &self.can_list_items)
            .field("can_request_items", &self.can_request_items)
            .finish_non_exhaustive()
    }
}

impl RegistrationPayload {
    /// Merges the form with the role's static capabilities and the default tier.
    pub fn from_form(form: &RegistrationForm, role: Role) -> Self {
        let config = role_config(role);
        Self {
            email: form.email.clone(),
            password: form.password.clone(),
            username: form.username.clone(),
            role: config.db_role.to_string(),
            subscription_tier: SubscriptionTier::default(),
            full_name: form.full_name.clone(),
            location: form.location.clone(),
            bio: form.bio.clone(),
            avatar: form.avatar.clone(),
            preferred_categories: form.preferred_categories.clone(),
            about_giving: form.about_giving.clone(),
            about_receiving: form.about_receiving.clone(),
            social_links: form.social_links.clone(),
            can_list_items: config.can_list_items,
            can_request_items: config.can_request_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_passwords() {
        let mut form = RegistrationForm {
            email: "drop@example.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
            ..Default::default()
        };
        form.role = Some(Role::Giver);

        let form_debug = format!("{form:?}");
        assert!(!form_debug.contains("hunter22"));
        assert!(form_debug.contains("drop@example.com"));

        let payload_debug = format!("{:?}", RegistrationPayload::from_form(&form, Role::Giver));
        assert!(!payload_debug.contains("hunter22"));
        assert!(payload_debug.contains("<redacted>"));
    }

    #[test]
    fn role_fields_come_from_the_table() {
        let mut form = RegistrationForm::default();
        assert!(form.profile_fields().is_empty());

        form.role = Some(Role::Giver);
        assert!(form.uses_profile_field(ProfileField::AboutGiving));
        assert!(!form.uses_profile_field(ProfileField::AboutReceiving));

        form.about_giving = "vintage tees".into();
        form.role = Some(Role::Receiver);
        assert!(form.uses_profile_field(ProfileField::AboutReceiving));
        assert!(!form.uses_profile_field(ProfileField::AboutGiving));

        form.role = Some(Role::Both);
        assert_eq!(form.profile_fields().len(), 3);
    }

    #[test]
    fn category_toggle_is_an_involution() {
        let mut form = RegistrationForm::default();
        form.toggle_category(Category::Shoes);
        form.toggle_category(Category::Bags);
        let before = form.preferred_categories.clone();

        form.toggle_category(Category::Clothing);
        form.toggle_category(Category::Clothing);
        assert_eq!(form.preferred_categories, before);

        form.toggle_category(Category::Shoes);
        assert_eq!(form.preferred_categories, vec![Category::Bags]);
    }

    #[test]
    fn payload_capabilities_ignore_unrelated_input() {
        let mut form = RegistrationForm {
            about_giving: "I can list everything".into(),
            bio: "canListItems: true".into(),
            ..Default::default()
        };
        for role in Role::ALL {
            form.role = Some(role);
            let payload = RegistrationPayload::from_form(&form, role);
            let config = role_config(role);
            assert_eq!(payload.can_list_items, config.can_list_items);
            assert_eq!(payload.can_request_items, config.can_request_items);
            assert_eq!(payload.role, config.db_role);
            assert_eq!(payload.subscription_tier, SubscriptionTier::Free);
        }
    }

    #[test]
    fn payload_serializes_with_wire_names() {
        let form = RegistrationForm {
            email: "a@b.com".into(),
            preferred_categories: vec![Category::Shoes],
            ..Default::default()
        };
        let value = serde_json::to_value(RegistrationPayload::from_form(&form, Role::Receiver)).expect("serialize payload");
        assert_eq!(value["subscriptionTier"], "FREE");
        assert_eq!(value["role"], "RECEIVER");
        assert_eq!(value["canRequestItems"], true);
        assert_eq!(value["preferredCategories"][0], "Shoes");
        assert_eq!(value["socialLinks"]["instagram"], "");
    }

    #[test]
    fn clearing_one_error_keeps_the_rest_in_order() {
        let mut errors = FieldErrors::new();
        errors.insert(FormField::Email, "Invalid email");
        errors.insert(FormField::Username, "Min 3 chars");
        errors.insert(FormField::Password, "Min 6 chars");

        errors.clear_field(FormField::Username);
        let keys: Vec<&str> = errors.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["email", "password"]);
    }

    #[test]
    fn parses_roles_and_categories_case_insensitively() {
        assert_eq!("Receiver".parse::<Role>(), Ok(Role::Receiver));
        assert_eq!("shoes".parse::<Category>(), Ok(Category::Shoes));
        assert!("admin".parse::<Role>().is_err());
    }
}

//! Per-step validation for the registration wizard.
//!
//! Each call recomputes the complete error map for one step from the current
//! form. An empty map means the step may be left.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldErrors, FormField, ProfileField, RegistrationForm, WizardStep};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

/// Returns `true` for strings with a basic `local@domain.tld` shape.
pub fn is_email_like(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn validate_step(step: WizardStep, form: &RegistrationForm) -> FieldErrors {
    match step {
        WizardStep::Identity => validate_identity(form),
        WizardStep::Profile => validate_profile(form),
        WizardStep::Connections => FieldErrors::new(),
    }
}

fn validate_identity(form: &RegistrationForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.role.is_none() {
        errors.insert(FormField::Role, "Select a specialized role");
    }

    if form.email.is_empty() {
        errors.insert(FormField::Email, "Email required");
    } else if !is_email_like(&form.email) {
        errors.insert(FormField::Email, "Invalid email");
    }

    if form.username.is_empty() {
        errors.insert(FormField::Username, "Username required");
    } else if form.username.chars().count() < 3 {
        errors.insert(FormField::Username, "Min 3 chars");
    }

    if form.password.is_empty() {
        errors.insert(FormField::Password, "Password required");
    } else if form.password.chars().count() < 6 {
        errors.insert(FormField::Password, "Min 6 chars");
    }

    if form.password != form.confirm_password {
        errors.insert(FormField::ConfirmPassword, "No match");
    }

    errors
}

fn validate_profile(form: &RegistrationForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.full_name.is_empty() {
        errors.insert(FormField::FullName, "Name required");
    }
    if form.location.is_empty() {
        errors.insert(FormField::Location, "Location required");
    }
    if form.uses_profile_field(ProfileField::PreferredCategories) && form.preferred_categories.is_empty() {
        errors.insert(FormField::PreferredCategories, "Select at least one tag");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{Category, Role};

    fn valid_identity() -> RegistrationForm {
        RegistrationForm {
            role: Some(Role::Receiver),
            email: "a@b.com".into(),
            username: "abc".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn identity_step_accepts_minimum_lengths() {
        assert!(validate_step(WizardStep::Identity, &valid_identity()).is_empty());
    }

    #[test]
    fn identity_step_reports_each_violation() {
        let form = RegistrationForm {
            email: "bad".into(),
            username: "ab".into(),
            password: "12345".into(),
            confirm_password: "54321".into(),
            ..Default::default()
        };
        let errors = validate_step(WizardStep::Identity, &form);
        assert_eq!(errors.get(FormField::Role), Some("Select a specialized role"));
        assert_eq!(errors.get(FormField::Email), Some("Invalid email"));
        assert_eq!(errors.get(FormField::Username), Some("Min 3 chars"));
        assert_eq!(errors.get(FormField::Password), Some("Min 6 chars"));
        assert_eq!(errors.get(FormField::ConfirmPassword), Some("No match"));
    }

    #[test]
    fn identity_step_prefers_required_messages_for_empty_input() {
        let errors = validate_step(WizardStep::Identity, &RegistrationForm::default());
        assert_eq!(errors.get(FormField::Email), Some("Email required"));
        assert_eq!(errors.get(FormField::Username), Some("Username required"));
        assert_eq!(errors.get(FormField::Password), Some("Password required"));
        assert_eq!(errors.get(FormField::ConfirmPassword), None);
    }

    #[test]
    fn email_shape_check() {
        assert!(is_email_like("a@b.com"));
        assert!(is_email_like("first.last@mail.example.org"));
        assert!(!is_email_like("bad"));
        assert!(!is_email_like("a@b"));
    }

    #[test]
    fn profile_step_requires_tags_only_when_role_uses_them() {
        let mut form = valid_identity();
        form.full_name = "A B".into();
        form.location = "NYC".into();
        let errors = validate_step(WizardStep::Profile, &form);
        assert_eq!(errors.get(FormField::PreferredCategories), Some("Select at least one tag"));

        form.toggle_category(Category::Shoes);
        assert!(validate_step(WizardStep::Profile, &form).is_empty());
    }

    #[test]
    fn profile_step_requires_name_and_location() {
        let mut form = valid_identity();
        form.preferred_categories.push(Category::Bags);
        let errors = validate_step(WizardStep::Profile, &form);
        assert_eq!(errors.get(FormField::FullName), Some("Name required"));
        assert_eq!(errors.get(FormField::Location), Some("Location required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn connections_step_always_passes() {
        assert!(validate_step(WizardStep::Connections, &RegistrationForm::default()).is_empty());
    }
}

//! Cosmetic completion score for the wizard's step indicator.
//!
//! The score only drives presentation. Nothing in here is consulted by
//! [`super::validation`].

use super::{ProfileField, RegistrationForm, WizardStep, is_email_like};

/// Fraction of satisfied quality signals for `step`, in `[0.0, 1.0]`.
pub fn progress_score(step: WizardStep, form: &RegistrationForm) -> f32 {
    let signals = quality_signals(step, form);
    if signals.is_empty() {
        return 0.0;
    }
    let satisfied = signals.iter().filter(|signal| **signal).count();
    (satisfied as f32 / signals.len() as f32).clamp(0.0, 1.0)
}

fn quality_signals(step: WizardStep, form: &RegistrationForm) -> Vec<bool> {
    match step {
        WizardStep::Identity => vec![
            form.role.is_some(),
            form.username.chars().count() > 2,
            is_email_like(&form.email),
            form.password.chars().count() > 5,
            !form.confirm_password.is_empty() && form.confirm_password == form.password,
        ],
        WizardStep::Profile => {
            let mut signals = vec![!form.full_name.is_empty(), !form.location.is_empty()];
            if form.uses_profile_field(ProfileField::PreferredCategories) {
                signals.push(!form.preferred_categories.is_empty());
            }
            signals.push(!form.bio.is_empty());
            signals
        }
        WizardStep::Connections => vec![
            !form.social_links.instagram.is_empty(),
            !form.social_links.twitter.is_empty(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{Category, Role};

    #[test]
    fn empty_form_scores_zero() {
        for step in WizardStep::ALL {
            assert_eq!(progress_score(step, &RegistrationForm::default()), 0.0);
        }
    }

    #[test]
    fn identity_score_counts_each_signal() {
        let mut form = RegistrationForm {
            role: Some(Role::Giver),
            username: "abc".into(),
            ..Default::default()
        };
        assert!((progress_score(WizardStep::Identity, &form) - 0.4).abs() < f32::EPSILON);

        form.email = "a@b.com".into();
        form.password = "secret".into();
        form.confirm_password = "secret".into();
        assert_eq!(progress_score(WizardStep::Identity, &form), 1.0);
    }

    #[test]
    fn profile_score_only_counts_categories_for_roles_that_use_them() {
        let mut form = RegistrationForm {
            full_name: "A B".into(),
            location: "NYC".into(),
            ..Default::default()
        };
        assert!((progress_score(WizardStep::Profile, &form) - 2.0 / 3.0).abs() < 1e-6);

        form.role = Some(Role::Both);
        form.preferred_categories.push(Category::Other);
        assert!((progress_score(WizardStep::Profile, &form) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn score_is_independent_of_validation() {
        // A password of five characters fails validation but a matching
        // confirmation still lights its signal.
        let form = RegistrationForm {
            password: "abcde".into(),
            confirm_password: "abcde".into(),
            ..Default::default()
        };
        assert!((progress_score(WizardStep::Identity, &form) - 0.2).abs() < 1e-6);
    }
}

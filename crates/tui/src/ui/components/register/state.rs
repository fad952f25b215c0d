//! Registration wizard state machine.
//!
//! Three steps, validated one at a time. Leaving the last step produces the
//! submission payload; the result of the registration call is applied with
//! [`RegisterState::complete_submission`] and either shows the verification
//! view or a single `submit` error.

use std::collections::HashMap;

use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use stuffsdrop_types::{
    Category, FieldErrors, FormField, RegistrationForm, RegistrationPayload, Role, WizardStep,
    registration::{ProfileField, SocialPlatform, progress_score, role_config, validate_step},
};

use crate::ui::components::common::TextInputState;

/// Message shown when the registration collaborator fails without one.
pub const REGISTRATION_FAILED: &str = "Registration failed.";

/// Outcome of [`RegisterState::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Validation failed, a submission is in flight, or nothing to do.
    Stayed,
    Moved(WizardStep),
    /// The last step passed; send this payload exactly once.
    Submit(Box<RegistrationPayload>),
}

/// Anything on the wizard that can hold focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterControl {
    Role(Role),
    Field(FormField),
    Category(Category),
    Back,
    Continue,
    SignIn,
    OpenEmail,
    SkipVerification,
}

const TEXT_FIELDS: [FormField; 12] = [
    FormField::Email,
    FormField::Username,
    FormField::Password,
    FormField::ConfirmPassword,
    FormField::FullName,
    FormField::Location,
    FormField::Bio,
    FormField::Avatar,
    FormField::AboutGiving,
    FormField::AboutReceiving,
    FormField::Instagram,
    FormField::Twitter,
];

#[derive(Debug, Clone)]
pub struct RegisterState {
    form: RegistrationForm,
    step: WizardStep,
    errors: FieldErrors,
    submitting: bool,
    show_verification: bool,

    /// Cursor-bearing editors mirroring the form's text fields.
    inputs: HashMap<FormField, TextInputState>,
    container_focus: FocusFlag,
    control_focus: Vec<(RegisterControl, FocusFlag)>,
    pub last_area: Rect,
}

impl Default for RegisterState {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterState {
    pub fn new() -> Self {
        let mut controls: Vec<RegisterControl> = Role::ALL.iter().map(|r| RegisterControl::Role(*r)).collect();
        controls.extend(TEXT_FIELDS.iter().map(|f| RegisterControl::Field(*f)));
        controls.extend(Category::ALL.iter().map(|c| RegisterControl::Category(*c)));
        controls.extend([
            RegisterControl::Back,
            RegisterControl::Continue,
            RegisterControl::SignIn,
            RegisterControl::OpenEmail,
            RegisterControl::SkipVerification,
        ]);
        Self {
            form: RegistrationForm::default(),
            step: WizardStep::default(),
            errors: FieldErrors::new(),
            submitting: false,
            show_verification: false,
            inputs: TEXT_FIELDS.iter().map(|f| (*f, TextInputState::new())).collect(),
            container_focus: FocusFlag::named("register"),
            control_focus: controls
                .into_iter()
                .map(|control| (control, FocusFlag::named(&format!("register.{control:?}"))))
                .collect(),
            last_area: Rect::default(),
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn show_verification(&self) -> bool {
        self.show_verification
    }

    /// Cosmetic completion of the current step.
    pub fn progress(&self) -> f32 {
        progress_score(self.step, &self.form)
    }

    pub fn input(&self, field: FormField) -> Option<&TextInputState> {
        self.inputs.get(&field)
    }

    /// Sets a text field and clears its error. The editor only resyncs when
    /// it holds a different value, so in-place edits keep their cursor.
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        if let Some(platform) = SocialPlatform::from_field(field) {
            self.update_social_link(platform, value);
            return;
        }
        self.sync_input(field, &value);
        if let Some(slot) = self.form.text_mut(field) {
            *slot = value;
        }
        self.errors.clear_field(field);
    }

    /// Applies a cursor-aware edit to a text field.
    pub fn edit_field(&mut self, field: FormField, edit: impl FnOnce(&mut TextInputState)) {
        let Some(input) = self.inputs.get_mut(&field) else {
            return;
        };
        let before = input.input().to_string();
        edit(input);
        if input.input() == before {
            return;
        }
        let value = input.input().to_string();
        self.update_field(field, value);
    }

    pub fn select_role(&mut self, role: Role) {
        self.form.role = Some(role);
        self.errors.clear_field(FormField::Role);
    }

    pub fn toggle_category(&mut self, category: Category) {
        self.form.toggle_category(category);
        self.errors.clear_field(FormField::PreferredCategories);
    }

    pub fn update_social_link(&mut self, platform: SocialPlatform, value: impl Into<String>) {
        let value = value.into();
        let field = platform.field();
        self.sync_input(field, &value);
        self.form.set_social_link(platform, value);
        self.errors.clear_field(field);
    }

    fn sync_input(&mut self, field: FormField, value: &str) {
        if let Some(input) = self.inputs.get_mut(&field)
            && input.input() != value
        {
            input.set_input(value);
            input.move_end();
        }
    }

    /// Validates the current step, then moves forward or hands back the
    /// payload on the last step.
    pub fn advance(&mut self) -> Advance {
        if self.submitting || self.show_verification {
            return Advance::Stayed;
        }
        self.errors = validate_step(self.step, &self.form);
        if !self.errors.is_empty() {
            return Advance::Stayed;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Advance::Moved(next)
            }
            None => {
                let Some(role) = self.form.role else {
                    self.errors.insert(FormField::Role, "Select a specialized role");
                    return Advance::Stayed;
                };
                self.submitting = true;
                Advance::Submit(Box::new(RegistrationPayload::from_form(&self.form, role)))
            }
        }
    }

    /// Steps back once and clears all errors.
    pub fn back(&mut self) {
        if self.submitting {
            return;
        }
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.errors = FieldErrors::new();
    }

    /// Applies the registration result. The step never changes here.
    pub fn complete_submission(&mut self, result: Result<(), String>) {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.errors = FieldErrors::new();
                self.show_verification = true;
            }
            Err(message) => {
                let message = if message.trim().is_empty() { REGISTRATION_FAILED.to_string() } else { message };
                let mut errors = FieldErrors::new();
                errors.insert(FormField::Submit, message);
                self.errors = errors;
            }
        }
    }

    /// Address the verification link was sent to.
    pub fn verification_email(&self) -> &str {
        &self.form.email
    }

    pub fn verification_role_title(&self) -> &'static str {
        self.form.role.map(|role| role_config(role).title).unwrap_or("Member")
    }

    /// Step-two inputs for the chosen role, in table order.
    pub fn role_inputs(&self) -> Vec<FormField> {
        self.form
            .profile_fields()
            .iter()
            .map(|field| match field {
                ProfileField::PreferredCategories => FormField::PreferredCategories,
                ProfileField::AboutGiving => FormField::AboutGiving,
                ProfileField::AboutReceiving => FormField::AboutReceiving,
            })
            .collect()
    }

    /// Focusable controls of the current view, in display order.
    pub fn visible_controls(&self) -> Vec<RegisterControl> {
        if self.show_verification {
            return vec![RegisterControl::OpenEmail, RegisterControl::SkipVerification];
        }
        let mut controls = Vec::new();
        match self.step {
            WizardStep::Identity => {
                controls.extend(Role::ALL.iter().map(|r| RegisterControl::Role(*r)));
                controls.extend(
                    [FormField::Email, FormField::Username, FormField::Password, FormField::ConfirmPassword]
                        .map(RegisterControl::Field),
                );
            }
            WizardStep::Profile => {
                controls.extend(
                    [FormField::FullName, FormField::Location, FormField::Bio, FormField::Avatar].map(RegisterControl::Field),
                );
                for field in self.role_inputs() {
                    match field {
                        FormField::PreferredCategories => {
                            controls.extend(Category::ALL.iter().map(|c| RegisterControl::Category(*c)));
                        }
                        other => controls.push(RegisterControl::Field(other)),
                    }
                }
            }
            WizardStep::Connections => {
                controls.extend([FormField::Instagram, FormField::Twitter].map(RegisterControl::Field));
            }
        }
        if self.step.prev().is_some() {
            controls.push(RegisterControl::Back);
        }
        controls.push(RegisterControl::Continue);
        if self.step == WizardStep::Identity {
            controls.push(RegisterControl::SignIn);
        }
        controls
    }

    pub fn flag(&self, control: RegisterControl) -> Option<&FocusFlag> {
        self.control_focus.iter().find(|(c, _)| *c == control).map(|(_, flag)| flag)
    }

    /// Moves focus to the first control of the current view.
    pub fn focus_first_control(&self) {
        for (_, flag) in &self.control_focus {
            flag.set(false);
        }
        if let Some(flag) = self.visible_controls().first().and_then(|control| self.flag(*control)) {
            flag.set(true);
        }
    }

    pub fn focused_control(&self) -> Option<RegisterControl> {
        let visible = self.visible_controls();
        self.control_focus
            .iter()
            .find(|(control, flag)| flag.get() && visible.contains(control))
            .map(|(control, _)| *control)
    }
}

impl HasFocus for RegisterState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for control in self.visible_controls() {
            if let Some(flag) = self.flag(control) {
                builder.leaf_widget(flag);
            }
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use stuffsdrop_api::{AuthError, AuthProvider};
    use stuffsdrop_types::{Identity, LoginRequest};

    use super::*;

    /// Auth collaborator that records registrations and answers with a fixed result.
    struct MockAuth {
        reject_with: Option<String>,
        calls: Mutex<Vec<RegistrationPayload>>,
    }

    impl MockAuth {
        fn accepting() -> Self {
            Self {
                reject_with: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn rejecting(message: &str) -> Self {
            Self {
                reject_with: Some(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AuthProvider for MockAuth {
        async fn login(&self, _request: LoginRequest) -> Result<Identity, AuthError> {
            Err(AuthError::Unauthenticated)
        }

        async fn register(&self, payload: RegistrationPayload) -> Result<(), AuthError> {
            self.calls.lock().unwrap().push(payload);
            match &self.reject_with {
                Some(message) => Err(AuthError::Rejected(message.clone())),
                None => Ok(()),
            }
        }

        async fn logout(&self) -> Result<(), AuthError> {
            Ok(())
        }

        async fn get_identity(&self) -> Option<Identity> {
            None
        }
    }

    fn fill_identity(state: &mut RegisterState) {
        state.select_role(Role::Receiver);
        state.update_field(FormField::Email, "a@b.com");
        state.update_field(FormField::Username, "abc");
        state.update_field(FormField::Password, "secret");
        state.update_field(FormField::ConfirmPassword, "secret");
    }

    fn fill_profile(state: &mut RegisterState) {
        state.update_field(FormField::FullName, "A B");
        state.update_field(FormField::Location, "NYC");
        state.toggle_category(Category::Shoes);
    }

    async fn submit_to(auth: &dyn AuthProvider, state: &mut RegisterState) {
        let Advance::Submit(payload) = state.advance() else {
            panic!("expected a submission");
        };
        assert!(state.is_submitting());
        let result = auth.register(*payload).await.map_err(|error| error.message());
        state.complete_submission(result);
    }

    #[tokio::test]
    async fn wizard_end_to_end_success() {
        let auth = MockAuth::accepting();
        let mut state = RegisterState::new();

        fill_identity(&mut state);
        assert_eq!(state.advance(), Advance::Moved(WizardStep::Profile));
        fill_profile(&mut state);
        assert_eq!(state.advance(), Advance::Moved(WizardStep::Connections));

        submit_to(&auth, &mut state).await;

        assert!(state.show_verification());
        assert_eq!(state.verification_email(), "a@b.com");
        assert_eq!(state.verification_role_title(), "The Collector");
        let calls = auth.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].role, "RECEIVER");
        assert!(!calls[0].can_list_items);
        assert!(calls[0].can_request_items);
    }

    #[tokio::test]
    async fn wizard_end_to_end_failure_keeps_step() {
        let auth = MockAuth::rejecting("Email taken");
        let mut state = RegisterState::new();
        fill_identity(&mut state);
        state.advance();
        fill_profile(&mut state);
        state.advance();

        submit_to(&auth, &mut state).await;

        assert_eq!(state.errors().get(FormField::Submit), Some("Email taken"));
        assert!(!state.show_verification());
        assert_eq!(state.step(), WizardStep::Connections);
        assert!(!state.is_submitting());
    }

    #[test]
    fn empty_rejection_uses_fallback_message() {
        let mut state = RegisterState::new();
        state.complete_submission(Err(String::new()));
        assert_eq!(state.errors().get(FormField::Submit), Some(REGISTRATION_FAILED));
    }

    #[test]
    fn submission_is_blocked_while_in_flight() {
        let mut state = RegisterState::new();
        fill_identity(&mut state);
        state.advance();
        fill_profile(&mut state);
        state.advance();
        assert!(matches!(state.advance(), Advance::Submit(_)));
        assert_eq!(state.advance(), Advance::Stayed);
        state.back();
        assert_eq!(state.step(), WizardStep::Connections);
    }

    #[test]
    fn invalid_step_stays_and_reports() {
        let mut state = RegisterState::new();
        assert_eq!(state.advance(), Advance::Stayed);
        assert_eq!(state.errors().get(FormField::Role), Some("Select a specialized role"));
        assert_eq!(state.step(), WizardStep::Identity);

        state.update_field(FormField::Email, "x");
        assert_eq!(state.errors().get(FormField::Email), None);
        assert_eq!(state.errors().get(FormField::Username), Some("Username required"));
    }

    #[test]
    fn back_clears_errors() {
        let mut state = RegisterState::new();
        fill_identity(&mut state);
        state.advance();
        state.advance();
        assert!(!state.errors().is_empty());
        state.back();
        assert_eq!(state.step(), WizardStep::Identity);
        assert!(state.errors().is_empty());
        state.back();
        assert_eq!(state.step(), WizardStep::Identity);
    }

    #[test]
    fn role_inputs_follow_the_selected_role() {
        let mut state = RegisterState::new();
        assert!(state.role_inputs().is_empty());
        state.select_role(Role::Giver);
        assert_eq!(state.role_inputs(), [FormField::PreferredCategories, FormField::AboutGiving]);
        state.select_role(Role::Receiver);
        assert_eq!(state.role_inputs(), [FormField::PreferredCategories, FormField::AboutReceiving]);
        state.select_role(Role::Both);
        assert_eq!(state.role_inputs().len(), 3);
    }

    #[test]
    fn profile_controls_hide_unrelated_role_inputs() {
        let mut state = RegisterState::new();
        fill_identity(&mut state);
        state.advance();
        let controls = state.visible_controls();
        assert!(controls.contains(&RegisterControl::Field(FormField::AboutReceiving)));
        assert!(!controls.contains(&RegisterControl::Field(FormField::AboutGiving)));
        assert!(controls.contains(&RegisterControl::Category(Category::Bags)));
        assert!(controls.contains(&RegisterControl::Back));
    }

    #[test]
    fn edits_keep_form_and_editor_in_sync() {
        let mut state = RegisterState::new();
        state.edit_field(FormField::Username, |input| {
            input.insert_char('a');
            input.insert_char('b');
        });
        state.edit_field(FormField::Username, TextInputState::backspace);
        assert_eq!(state.form().username, "a");
        assert_eq!(state.input(FormField::Username).map(TextInputState::input), Some("a"));

        state.update_social_link(SocialPlatform::Twitter, "@drop");
        assert_eq!(state.form().social_links.twitter, "@drop");
        assert_eq!(state.input(FormField::Twitter).map(TextInputState::input), Some("@drop"));
    }

    #[test]
    fn typed_social_handles_reach_the_form() {
        let mut state = RegisterState::new();
        state.edit_field(FormField::Instagram, |input| {
            input.insert_char('@');
            input.insert_char('s');
        });
        state.edit_field(FormField::Instagram, |input| {
            input.move_left();
            input.insert_char('x');
        });
        assert_eq!(state.form().social_links.instagram, "@xs");
        assert_eq!(state.input(FormField::Instagram).map(TextInputState::cursor_column), Some(2));
    }
}

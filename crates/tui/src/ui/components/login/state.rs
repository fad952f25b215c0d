use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use stuffsdrop_types::{Effect, FieldErrors, FormField, Identity, LoginRequest};

use crate::ui::components::common::TextInputState;

/// Message shown when the auth collaborator rejects without one.
pub const LOGIN_FAILED: &str = "Login failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Identifier,
    Password,
    ShowPassword,
    Remember,
    Submit,
    CreateAccount,
}

impl LoginField {
    pub const ALL: [LoginField; 6] = [
        LoginField::Identifier,
        LoginField::Password,
        LoginField::ShowPassword,
        LoginField::Remember,
        LoginField::Submit,
        LoginField::CreateAccount,
    ];

    pub fn is_text(self) -> bool {
        matches!(self, LoginField::Identifier | LoginField::Password)
    }
}

/// Sign-in form state.
#[derive(Debug, Clone)]
pub struct LoginState {
    pub identifier: TextInputState,
    pub password: TextInputState,
    pub remember: bool,
    pub show_password: bool,
    errors: FieldErrors,
    submitting: bool,

    container_focus: FocusFlag,
    field_focus: Vec<(LoginField, FocusFlag)>,
    pub last_area: Rect,
}

impl Default for LoginState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LoginState {
    /// Form prefilled with a remembered identifier, if any.
    pub fn new(remembered_identifier: Option<String>) -> Self {
        let remember = remembered_identifier.is_some();
        Self {
            identifier: remembered_identifier.map(TextInputState::with_value).unwrap_or_default(),
            password: TextInputState::new(),
            remember,
            show_password: false,
            errors: FieldErrors::new(),
            submitting: false,
            container_focus: FocusFlag::named("login"),
            field_focus: LoginField::ALL
                .iter()
                .map(|field| (*field, FocusFlag::named(&format!("login.{field:?}"))))
                .collect(),
            last_area: Rect::default(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn flag(&self, field: LoginField) -> Option<&FocusFlag> {
        self.field_focus.iter().find(|(f, _)| *f == field).map(|(_, flag)| flag)
    }

    pub fn focused_field(&self) -> Option<LoginField> {
        self.field_focus.iter().find(|(_, flag)| flag.get()).map(|(field, _)| *field)
    }

    /// Text input behind a field, if it is one.
    pub fn input_mut(&mut self, field: LoginField) -> Option<&mut TextInputState> {
        match field {
            LoginField::Identifier => Some(&mut self.identifier),
            LoginField::Password => Some(&mut self.password),
            _ => None,
        }
    }

    /// Applies `edit` to a text field. The field's error clears only when
    /// the text changed; cursor moves leave it in place.
    pub fn edit(&mut self, field: LoginField, edit: impl FnOnce(&mut TextInputState)) {
        let Some(input) = self.input_mut(field) else {
            return;
        };
        let before = input.input().to_string();
        edit(input);
        if input.input() != before {
            self.errors.clear_field(error_key(field));
        }
    }

    pub fn toggle_remember(&mut self) {
        self.remember = !self.remember;
    }

    pub fn toggle_show_password(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Validates and, when valid, starts one login call.
    pub fn submit(&mut self) -> Vec<Effect> {
        if self.submitting {
            return Vec::new();
        }
        let mut errors = FieldErrors::new();
        if self.identifier.input().is_empty() {
            errors.insert(FormField::Username, "Email is required");
        }
        if self.password.input().is_empty() {
            errors.insert(FormField::Password, "Password is required");
        }
        self.errors = errors;
        if !self.errors.is_empty() {
            return Vec::new();
        }

        self.submitting = true;
        vec![Effect::Login(LoginRequest {
            email: self.identifier.input().to_string(),
            password: self.password.input().to_string(),
            remember: self.remember,
        })]
    }

    /// Applies the login result. Success clears the password and persists
    /// (or forgets) the identifier.
    pub fn complete(&mut self, result: &Result<Identity, String>) -> Vec<Effect> {
        self.submitting = false;
        match result {
            Ok(_) => {
                self.password = TextInputState::new();
                self.errors = FieldErrors::new();
                let remembered = self.remember.then(|| self.identifier.input().to_string());
                vec![Effect::RememberIdentifier(remembered)]
            }
            Err(message) => {
                let message = if message.is_empty() { LOGIN_FAILED } else { message.as_str() };
                self.errors.insert(FormField::Submit, message);
                Vec::new()
            }
        }
    }
}

fn error_key(field: LoginField) -> FormField {
    match field {
        LoginField::Password => FormField::Password,
        _ => FormField::Username,
    }
}

impl HasFocus for LoginState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for (_, flag) in &self.field_focus {
            builder.leaf_widget(flag);
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
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: "u1".into(),
            name: None,
            email: "a@b.com".into(),
            image_url: None,
            roles: Vec::new(),
        }
    }

    #[test]
    fn empty_submit_reports_both_fields() {
        let mut state = LoginState::default();
        assert!(state.submit().is_empty());
        assert_eq!(state.errors().get(FormField::Username), Some("Email is required"));
        assert_eq!(state.errors().get(FormField::Password), Some("Password is required"));
        assert!(!state.is_submitting());
    }

    #[test]
    fn editing_clears_only_that_fields_error() {
        let mut state = LoginState::default();
        state.submit();
        state.edit(LoginField::Password, |input| input.insert_char('x'));
        assert_eq!(state.errors().get(FormField::Password), None);
        assert_eq!(state.errors().get(FormField::Username), Some("Email is required"));
    }

    #[test]
    fn cursor_moves_keep_the_error_visible() {
        let mut state = LoginState::default();
        state.submit();
        state.edit(LoginField::Identifier, TextInputState::move_left);
        state.edit(LoginField::Identifier, TextInputState::move_end);
        state.edit(LoginField::Identifier, TextInputState::backspace);
        assert_eq!(state.errors().get(FormField::Username), Some("Email is required"));

        state.edit(LoginField::Identifier, |input| input.insert_char('a'));
        assert_eq!(state.errors().get(FormField::Username), None);
    }

    #[test]
    fn valid_submit_sends_one_request() {
        let mut state = LoginState::new(Some("a@b.com".into()));
        assert!(state.remember);
        state.edit(LoginField::Password, |input| input.set_input("secret"));

        let effects = state.submit();
        assert_eq!(
            effects,
            vec![Effect::Login(LoginRequest {
                email: "a@b.com".into(),
                password: "secret".into(),
                remember: true,
            })]
        );
        assert!(state.is_submitting());
        assert!(state.submit().is_empty());
    }

    #[test]
    fn success_remembers_identifier_only_when_requested() {
        let mut state = LoginState::new(Some("a@b.com".into()));
        state.password.set_input("secret");
        state.submit();
        assert_eq!(
            state.complete(&Ok(identity())),
            vec![Effect::RememberIdentifier(Some("a@b.com".into()))]
        );
        assert!(state.password.input().is_empty());

        state.toggle_remember();
        state.password.set_input("secret");
        state.submit();
        assert_eq!(state.complete(&Ok(identity())), vec![Effect::RememberIdentifier(None)]);
    }

    #[test]
    fn failure_surfaces_submit_message() {
        let mut state = LoginState::default();
        state.identifier.set_input("a@b.com");
        state.password.set_input("nope");
        state.submit();
        state.complete(&Err("Invalid credentials".into()));
        assert_eq!(state.errors().get(FormField::Submit), Some("Invalid credentials"));
        assert!(!state.is_submitting());

        state.submit();
        state.complete(&Err(String::new()));
        assert_eq!(state.errors().get(FormField::Submit), Some(LOGIN_FAILED));
    }
}

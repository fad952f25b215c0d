use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use crate::ui::theme::theme_helpers::ButtonType;

/// What a confirmation button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Cancel,
    Confirm,
}

#[derive(Debug, Clone)]
pub struct ConfirmationButton {
    pub label: String,
    pub action: ConfirmAction,
    pub button_type: ButtonType,
    pub focus: FocusFlag,
}

impl ConfirmationButton {
    pub fn new(label: &str, action: ConfirmAction, button_type: ButtonType) -> Self {
        Self {
            label: label.to_string(),
            action,
            button_type,
            focus: FocusFlag::named(label),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfirmationModalOpts {
    pub title: Option<String>,
    pub message: Option<String>,
    pub buttons: Vec<ConfirmationButton>,
}

#[derive(Debug, Clone)]
pub struct ConfirmationModalState {
    title: Option<String>,
    message: Option<String>,
    buttons: Vec<ConfirmationButton>,

    container_focus: FocusFlag,
}

impl Default for ConfirmationModalState {
    fn default() -> Self {
        Self {
            title: None,
            message: None,
            buttons: Vec::new(),
            container_focus: FocusFlag::named("confirmation.modal"),
        }
    }
}

impl ConfirmationModalState {
    pub fn update_opts(&mut self, opts: ConfirmationModalOpts) {
        self.title = opts.title;
        self.message = opts.message;
        self.buttons = opts.buttons;
    }

    /// Options for the sign-out dialog.
    pub fn logout_opts() -> ConfirmationModalOpts {
        ConfirmationModalOpts {
            title: Some("Sign Out".to_string()),
            message: Some("Are you sure you want to log off StuffsDrop?".to_string()),
            buttons: vec![
                ConfirmationButton::new("Cancel", ConfirmAction::Cancel, ButtonType::Secondary),
                ConfirmationButton::new("Confirm", ConfirmAction::Confirm, ButtonType::Destructive),
            ],
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn buttons(&self) -> &[ConfirmationButton] {
        &self.buttons
    }

    pub fn is_button_focused(&self, idx: usize) -> bool {
        self.buttons.get(idx).is_some_and(|button| button.focus.get())
    }

    pub fn focused_action(&self) -> Option<ConfirmAction> {
        self.buttons.iter().find(|button| button.focus.get()).map(|button| button.action)
    }
}

impl HasFocus for ConfirmationModalState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        self.buttons.iter().for_each(|button| {
            builder.leaf_widget(&button.focus);
        });
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

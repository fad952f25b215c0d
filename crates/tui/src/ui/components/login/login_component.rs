use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Borders, Paragraph},
};
use stuffsdrop_types::{Effect, FormField, Route};

use super::state::{LoginField, LoginState};
use crate::{
    app::App,
    ui::{
        components::{
            Component,
            common::{
                TextInputState,
                form_field::{error_line, field_line, position_cursor},
            },
        },
        theme::{
            Theme, Tone,
            theme_helpers::{ButtonRenderOptions, ButtonType, build_hint_spans, render_button},
        },
    },
};

/// Sign-in screen content (the form column of the auth layout).
#[derive(Debug, Default)]
pub struct LoginComponent {
    field_areas: Vec<(Rect, LoginField)>,
}

impl LoginComponent {
    fn focus_field(app: &mut App, field: LoginField) {
        if let Some(flag) = app.login.flag(field) {
            app.focus.focus(flag);
        }
    }

    fn activate(app: &mut App, field: LoginField) -> Vec<Effect> {
        match field {
            LoginField::Identifier | LoginField::Password | LoginField::Submit => app.login.submit(),
            LoginField::ShowPassword => {
                app.login.toggle_show_password();
                Vec::new()
            }
            LoginField::Remember => {
                app.login.toggle_remember();
                Vec::new()
            }
            LoginField::CreateAccount => vec![Effect::SwitchTo(Route::Register)],
        }
    }

    fn checkbox_line(theme: &dyn Theme, label: &str, checked: bool, focused: bool) -> Line<'static> {
        let mark = if checked { "[x] " } else { "[ ] " };
        let style = if focused {
            theme.accent_emphasis_style()
        } else {
            theme.text_secondary_style()
        };
        Line::from(vec![Span::raw("  "), Span::styled(format!("{mark}{label}"), style)])
    }

    fn render_text_field(
        &mut self,
        frame: &mut Frame,
        rows: [Rect; 2],
        theme: &dyn Theme,
        state: &LoginState,
        field: LoginField,
    ) {
        let (label, input, placeholder, masked, error_field): (&str, &TextInputState, &str, bool, FormField) = match field {
            LoginField::Identifier => ("Email Address", &state.identifier, "name@example.com", false, FormField::Username),
            _ => ("Password", &state.password, "••••••••", !state.show_password, FormField::Password),
        };
        let focused = state.focused_field() == Some(field);
        frame.render_widget(Paragraph::new(field_line(theme, label, input, placeholder, masked, focused)), rows[0]);
        if let Some(line) = error_line(theme, state.errors().get(error_field)) {
            frame.render_widget(Paragraph::new(line), rows[1]);
        }
        if focused {
            position_cursor(frame, rows[0], label, input);
        }
        self.field_areas.push((rows[0], field));
    }
}

impl Component for LoginComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(field) = app.login.focused_field() else {
            app.focus.focus(&app.login);
            return Vec::new();
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Enter => Self::activate(app, field),
            KeyCode::Char(' ') if !field.is_text() => Self::activate(app, field),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.login.edit(field, |input| input.insert_char(c));
                Vec::new()
            }
            KeyCode::Backspace => {
                app.login.edit(field, TextInputState::backspace);
                Vec::new()
            }
            KeyCode::Delete => {
                app.login.edit(field, TextInputState::delete);
                Vec::new()
            }
            KeyCode::Left => {
                if let Some(input) = app.login.input_mut(field) {
                    input.move_left();
                }
                Vec::new()
            }
            KeyCode::Right => {
                if let Some(input) = app.login.input_mut(field) {
                    input.move_right();
                }
                Vec::new()
            }
            KeyCode::Home => {
                if let Some(input) = app.login.input_mut(field) {
                    input.move_home();
                }
                Vec::new()
            }
            KeyCode::End => {
                if let Some(input) = app.login.input_mut(field) {
                    input.move_end();
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        let Some(field) = self.field_areas.iter().find(|(area, _)| area.contains(position)).map(|(_, f)| *f) else {
            return Vec::new();
        };
        Self::focus_field(app, field);
        match field {
            LoginField::Identifier | LoginField::Password => Vec::new(),
            other => Self::activate(app, other),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Result<()> {
        app.login.last_area = rect;
        self.field_areas.clear();
        let theme = app.providers.use_theme()?.theme();
        let state = &app.login;

        let rows = Layout::vertical([
            Constraint::Length(1), // heading
            Constraint::Length(1), // subheading
            Constraint::Length(1),
            Constraint::Length(1), // identifier
            Constraint::Length(1), // identifier error
            Constraint::Length(1), // password
            Constraint::Length(1), // password error
            Constraint::Length(1), // show password
            Constraint::Length(1), // remember me
            Constraint::Length(1),
            Constraint::Length(3), // sign in
            Constraint::Length(1), // submit error
            Constraint::Length(1),
            Constraint::Length(1), // register link
            Constraint::Min(0),
        ])
        .split(rect);

        frame.render_widget(
            Paragraph::new(Line::styled("Welcome back", theme.text_primary_style().add_modifier(Modifier::BOLD))),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Line::styled("Enter your credentials to access the drop", theme.text_muted_style())),
            rows[1],
        );

        self.render_text_field(frame, [rows[3], rows[4]], theme, state, LoginField::Identifier);
        self.render_text_field(frame, [rows[5], rows[6]], theme, state, LoginField::Password);

        for (row, field, label, checked) in [
            (rows[7], LoginField::ShowPassword, "Show password", state.show_password),
            (rows[8], LoginField::Remember, "Remember me", state.remember),
        ] {
            let focused = state.focused_field() == Some(field);
            frame.render_widget(Paragraph::new(Self::checkbox_line(theme, label, checked, focused)), row);
            self.field_areas.push((row, field));
        }

        let button_area = Rect { width: rows[10].width.min(24), ..rows[10] };
        let label = if state.is_submitting() { "Signing in…" } else { "Sign In" };
        render_button(
            frame,
            button_area,
            label,
            theme,
            ButtonRenderOptions::new(
                !state.is_submitting(),
                state.focused_field() == Some(LoginField::Submit),
                false,
                Borders::ALL,
                ButtonType::Primary,
            ),
        );
        self.field_areas.push((button_area, LoginField::Submit));

        if let Some(message) = state.errors().get(FormField::Submit) {
            frame.render_widget(Paragraph::new(Line::styled(message.to_string(), theme.tone_style(Tone::Danger))), rows[11]);
        }

        let link_focused = state.focused_field() == Some(LoginField::CreateAccount);
        let link_style = if link_focused {
            theme.accent_emphasis_style().add_modifier(Modifier::UNDERLINED)
        } else {
            theme.accent_primary_style()
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("New to StuffsDrop? ", theme.text_muted_style()),
                Span::styled("Create an account", link_style),
            ])),
            rows[13],
        );
        self.field_areas.push((rows[13], LoginField::CreateAccount));
        Ok(())
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        match app.providers.use_theme() {
            Ok(theme) => build_hint_spans(
                theme.theme(),
                &[("Tab", " Next field  "), ("Enter", " Sign in  "), ("Space", " Toggle  "), ("Ctrl+C", " Quit")],
            ),
            Err(_) => Vec::new(),
        }
    }

    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        let first = if app.login.identifier.input().is_empty() {
            LoginField::Identifier
        } else {
            LoginField::Password
        };
        Self::focus_field(app, first);
        Vec::new()
    }
}

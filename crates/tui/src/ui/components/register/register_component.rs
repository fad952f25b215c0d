use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Borders, LineGauge, Paragraph, Wrap},
};
use stuffsdrop_types::{
    Category, Effect, FormField, Role, Route, WizardStep,
    registration::role_config,
};

use super::state::{Advance, RegisterControl, RegisterState};
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
            theme_helpers::{ButtonRenderOptions, ButtonType, block, build_hint_spans, render_button},
        },
        utils::cells,
    },
};

fn field_label(field: FormField) -> (&'static str, &'static str) {
    match field {
        FormField::Email => ("Email", "name@example.com"),
        FormField::Username => ("Username", "dropkid"),
        FormField::Password => ("Password", "min. 6 characters"),
        FormField::ConfirmPassword => ("Confirm", "repeat password"),
        FormField::FullName => ("Full name", "Jane Doe"),
        FormField::Location => ("Location", "Brooklyn, NY"),
        FormField::Bio => ("Bio", "A line about your style"),
        FormField::Avatar => ("Avatar URL", "https://"),
        FormField::AboutGiving => ("What you give", "Mostly streetwear, size M"),
        FormField::AboutReceiving => ("What you hunt", "Vintage denim, sneakers"),
        FormField::Instagram => ("Instagram", "@handle"),
        FormField::Twitter => ("X / Twitter", "@handle"),
        FormField::Role | FormField::PreferredCategories | FormField::Submit => ("", ""),
    }
}

fn is_masked(field: FormField) -> bool {
    matches!(field, FormField::Password | FormField::ConfirmPassword)
}

/// Three-step sign-up wizard plus the verification view.
#[derive(Debug, Default)]
pub struct RegisterComponent {
    control_areas: Vec<(Rect, RegisterControl)>,
}

impl RegisterComponent {
    fn focus_control(app: &mut App, control: RegisterControl) {
        if let Some(flag) = app.register.flag(control) {
            app.focus.focus(flag);
        }
    }

    fn advance(app: &mut App) -> Vec<Effect> {
        match app.register.advance() {
            Advance::Submit(payload) => vec![Effect::Register(payload)],
            Advance::Moved(step) => {
                tracing::debug!(step = step.number(), "registration step advanced");
                app.register.focus_first_control();
                Vec::new()
            }
            Advance::Stayed => Vec::new(),
        }
    }

    fn activate(app: &mut App, control: RegisterControl) -> Vec<Effect> {
        match control {
            RegisterControl::Role(role) => {
                app.register.select_role(role);
                Vec::new()
            }
            RegisterControl::Category(category) => {
                app.register.toggle_category(category);
                Vec::new()
            }
            RegisterControl::Back => {
                app.register.back();
                app.register.focus_first_control();
                Vec::new()
            }
            RegisterControl::Field(_) | RegisterControl::Continue => Self::advance(app),
            RegisterControl::SignIn | RegisterControl::SkipVerification => vec![Effect::SwitchTo(Route::Login)],
            RegisterControl::OpenEmail => vec![Effect::OpenMailClient(app.register.verification_email().to_string())],
        }
    }

    fn edit(app: &mut App, control: RegisterControl, edit: impl FnOnce(&mut TextInputState)) {
        if let RegisterControl::Field(field) = control {
            app.register.edit_field(field, edit);
        }
    }

    fn is_focused(state: &RegisterState, control: RegisterControl) -> bool {
        state.focused_control() == Some(control)
    }

    fn render_header(frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &RegisterState) {
        let step = state.step();
        let [title, subtitle, gauge] = Layout::vertical([Constraint::Length(1); 3]).areas(area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("Step {} of {}  ", step.number(), WizardStep::ALL.len()), theme.text_muted_style()),
                Span::styled(step.title(), theme.text_primary_style().add_modifier(Modifier::BOLD)),
            ])),
            title,
        );
        frame.render_widget(Paragraph::new(Line::styled(step.subtitle(), theme.text_secondary_style())), subtitle);
        frame.render_widget(
            LineGauge::default()
                .filled_style(theme.accent_primary_style())
                .unfilled_style(theme.text_muted_style())
                .ratio(f64::from(state.progress()))
                .label(Span::styled("Profile strength ", theme.text_muted_style())),
            gauge,
        );
    }

    fn render_role_cards(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &RegisterState) {
        let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
        for (role, column) in Role::ALL.iter().zip(columns.iter()) {
            let config = role_config(*role);
            let control = RegisterControl::Role(*role);
            let selected = state.form().role == Some(*role);
            let focused = Self::is_focused(state, control);
            let mut card = block(theme, Some(config.title), focused || selected);
            if selected {
                card = card.style(theme.selection_style());
            }
            let mark = if selected { "● " } else { "○ " };
            let body = Paragraph::new(vec![
                Line::styled(format!("{mark}{}", config.subtitle), theme.accent_primary_style()),
                Line::styled(config.description, theme.text_secondary_style()),
            ])
            .wrap(Wrap { trim: true })
            .block(card);
            frame.render_widget(body, *column);
            self.control_areas.push((*column, control));
        }
    }

    /// Draws a text field and its error line; returns rows used.
    fn render_text_field(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &RegisterState, field: FormField) -> u16 {
        let Some(input) = state.input(field) else {
            return 0;
        };
        let (label, placeholder) = field_label(field);
        let control = RegisterControl::Field(field);
        let focused = Self::is_focused(state, control);
        let row = Rect { height: 1, ..area };
        frame.render_widget(
            Paragraph::new(field_line(theme, label, input, placeholder, is_masked(field), focused)),
            row,
        );
        if focused {
            position_cursor(frame, row, label, input);
        }
        self.control_areas.push((row, control));
        match error_line(theme, state.errors().get(field)) {
            Some(line) if area.height > 1 => {
                frame.render_widget(Paragraph::new(line), Rect { y: row.y + 1, height: 1, ..area });
                2
            }
            _ => 1,
        }
    }

    fn render_categories(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &RegisterState) -> u16 {
        let label_row = Rect { height: 1, ..area };
        frame.render_widget(
            Paragraph::new(Line::styled("  Preferred categories:", theme.text_secondary_style())),
            label_row,
        );
        let mut x = area.x + 4;
        let y = area.y + 1;
        for category in Category::ALL {
            let control = RegisterControl::Category(category);
            let selected = state.form().preferred_categories.contains(&category);
            let text = format!("[{}] {}", if selected { "x" } else { " " }, category.as_str());
            let width = cells(text.chars().count());
            let chip = Rect::new(x, y, width, 1).intersection(area);
            let style = match (Self::is_focused(state, control), selected) {
                (true, _) => theme.accent_emphasis_style(),
                (false, true) => theme.accent_primary_style(),
                (false, false) => theme.text_secondary_style(),
            };
            frame.render_widget(Paragraph::new(Span::styled(text, style)), chip);
            self.control_areas.push((chip, control));
            x += width + 2;
        }
        let mut used = 2;
        if let Some(line) = error_line(theme, state.errors().get(FormField::PreferredCategories))
            && area.height > 2
        {
            frame.render_widget(Paragraph::new(line), Rect { y: area.y + 2, height: 1, ..area });
            used += 1;
        }
        used
    }

    fn render_step_body(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &RegisterState) {
        let mut y = area.y;
        let remaining = |y: u16| Rect::new(area.x, y, area.width, area.bottom().saturating_sub(y));

        if state.step() == WizardStep::Identity {
            let cards = Rect { height: 5.min(area.height), ..area };
            self.render_role_cards(frame, cards, theme, state);
            y += cards.height;
            if let Some(line) = error_line(theme, state.errors().get(FormField::Role)) {
                frame.render_widget(Paragraph::new(line), Rect::new(area.x, y, area.width, 1).intersection(area));
                y += 1;
            }
            y += 1;
        }

        for control in state.visible_controls() {
            if y >= area.bottom() {
                break;
            }
            match control {
                RegisterControl::Field(field) => {
                    y += self.render_text_field(frame, remaining(y), theme, state, field);
                }
                // The chip row renders once, at its first category.
                RegisterControl::Category(Category::Clothing) => {
                    y += self.render_categories(frame, remaining(y), theme, state);
                }
                _ => {}
            }
        }
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &RegisterState) {
        let [buttons, submit_error, link] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1), Constraint::Length(1)]).areas(area);
        let [back_area, _, continue_area, _] = Layout::horizontal([
            Constraint::Length(12),
            Constraint::Length(2),
            Constraint::Length(18),
            Constraint::Min(0),
        ])
        .areas(buttons);

        if state.step().prev().is_some() {
            render_button(
                frame,
                back_area,
                "Back",
                theme,
                ButtonRenderOptions::new(
                    !state.is_submitting(),
                    Self::is_focused(state, RegisterControl::Back),
                    false,
                    Borders::ALL,
                    ButtonType::Secondary,
                ),
            );
            self.control_areas.push((back_area, RegisterControl::Back));
        }

        let label = match (state.is_submitting(), state.step().is_last()) {
            (true, _) => "Minting…",
            (false, true) => "Mint Profile",
            (false, false) => "Continue",
        };
        render_button(
            frame,
            continue_area,
            label,
            theme,
            ButtonRenderOptions::new(
                !state.is_submitting(),
                Self::is_focused(state, RegisterControl::Continue),
                false,
                Borders::ALL,
                ButtonType::Primary,
            ),
        );
        self.control_areas.push((continue_area, RegisterControl::Continue));

        if let Some(message) = state.errors().get(FormField::Submit) {
            frame.render_widget(Paragraph::new(Line::styled(message.to_string(), theme.tone_style(Tone::Danger))), submit_error);
        }

        if state.step() == WizardStep::Identity {
            let link_style = if Self::is_focused(state, RegisterControl::SignIn) {
                theme.accent_emphasis_style().add_modifier(Modifier::UNDERLINED)
            } else {
                theme.accent_primary_style()
            };
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("Already have an account? ", theme.text_muted_style()),
                    Span::styled("Sign In", link_style),
                ])),
                link,
            );
            self.control_areas.push((link, RegisterControl::SignIn));
        }
    }

    fn render_verification(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &RegisterState) {
        let [heading, _, sent, hint, _, buttons] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .areas(area);
        frame.render_widget(
            Paragraph::new(Line::styled("✉ Check your inbox", theme.accent_emphasis_style())),
            heading,
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("We've sent a magic link to ", theme.text_secondary_style()),
                Span::styled(state.verification_email().to_string(), theme.text_primary_style().add_modifier(Modifier::BOLD)),
            ])),
            sent,
        );
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!(
                    "Click the link in the email to activate your {} account.",
                    state.verification_role_title()
                ),
                theme.text_muted_style(),
            ))
            .wrap(Wrap { trim: true }),
            hint,
        );

        let [open_area, _, skip_area, _] = Layout::horizontal([
            Constraint::Length(18),
            Constraint::Length(2),
            Constraint::Length(16),
            Constraint::Min(0),
        ])
        .areas(buttons);
        for (rect, control, label, button_type) in [
            (open_area, RegisterControl::OpenEmail, "Open Email App", ButtonType::Primary),
            (skip_area, RegisterControl::SkipVerification, "Skip for now", ButtonType::Secondary),
        ] {
            render_button(
                frame,
                rect,
                label,
                theme,
                ButtonRenderOptions::new(true, Self::is_focused(state, control), false, Borders::ALL, button_type),
            );
            self.control_areas.push((rect, control));
        }
    }
}

impl Component for RegisterComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(control) = app.register.focused_control() else {
            app.register.focus_first_control();
            return Vec::new();
        };
        let is_text = matches!(control, RegisterControl::Field(_));
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Right if !is_text => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::Left if !is_text => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Esc if !app.register.show_verification() => {
                app.register.back();
                app.register.focus_first_control();
                Vec::new()
            }
            KeyCode::Enter => Self::activate(app, control),
            KeyCode::Char(' ') if !is_text => Self::activate(app, control),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Self::edit(app, control, |input| input.insert_char(c));
                Vec::new()
            }
            KeyCode::Backspace => {
                Self::edit(app, control, TextInputState::backspace);
                Vec::new()
            }
            KeyCode::Delete => {
                Self::edit(app, control, TextInputState::delete);
                Vec::new()
            }
            KeyCode::Left => {
                Self::edit(app, control, TextInputState::move_left);
                Vec::new()
            }
            KeyCode::Right => {
                Self::edit(app, control, TextInputState::move_right);
                Vec::new()
            }
            KeyCode::Home => {
                Self::edit(app, control, TextInputState::move_home);
                Vec::new()
            }
            KeyCode::End => {
                Self::edit(app, control, TextInputState::move_end);
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
        let Some(control) = self.control_areas.iter().find(|(area, _)| area.contains(position)).map(|(_, c)| *c) else {
            return Vec::new();
        };
        Self::focus_control(app, control);
        match control {
            RegisterControl::Field(_) => Vec::new(),
            other => Self::activate(app, other),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Result<()> {
        app.register.last_area = rect;
        self.control_areas.clear();
        let theme = app.providers.use_theme()?.theme();
        let state = &app.register;

        if state.show_verification() {
            self.render_verification(frame, rect, theme, state);
            return Ok(());
        }

        let [header, _, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(5),
        ])
        .areas(rect);
        Self::render_header(frame, header, theme, state);
        self.render_step_body(frame, body, theme, state);
        self.render_footer(frame, footer, theme, state);
        Ok(())
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        match app.providers.use_theme() {
            Ok(theme) => build_hint_spans(
                theme.theme(),
                &[("Tab", " Next  "), ("Space", " Select  "), ("Enter", " Continue  "), ("Esc", " Back")],
            ),
            Err(_) => Vec::new(),
        }
    }

    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        app.register.focus_first_control();
        Vec::new()
    }
}

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Borders, Paragraph, Wrap},
};
use stuffsdrop_types::Effect;

use super::state::ConfirmAction;
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button};

/// Modal dialog with a message and a row of buttons.
///
/// The pressed button's [`ConfirmAction`] is forwarded to
/// [`App::resolve_confirmation`], which decides what the dialog means.
#[derive(Default, Debug, Clone)]
pub struct ConfirmationModal {
    button_areas: Vec<Rect>,
}

impl Component for ConfirmationModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab | KeyCode::Right => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Left => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char(' ') => match app.confirmation.focused_action() {
                Some(action) => app.resolve_confirmation(action),
                None => Vec::new(),
            },
            KeyCode::Esc => app.resolve_confirmation(ConfirmAction::Cancel),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(column, row);
        let action = self
            .button_areas
            .iter()
            .position(|area| area.contains(position))
            .and_then(|index| app.confirmation.buttons().get(index))
            .map(|button| button.action);
        match action {
            Some(action) => app.resolve_confirmation(action),
            None => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Result<()> {
        let theme = app.providers.use_theme()?.theme();
        let state = &app.confirmation;
        let block = block(theme, state.title(), true).style(theme.modal_background_style());
        let inner = block.inner(rect);
        frame.render_widget(&block, rect);

        let [message_rect, _, button_rect, ..] = self.get_preferred_layout(app, inner)[..] else {
            return Ok(());
        };

        if let Some(message) = state.message() {
            let lines: Vec<Line> = message.lines().map(|line| Line::from(line.to_string())).collect();
            let paragraph = Paragraph::new(lines)
                .style(theme.text_primary_style())
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, message_rect);
        }

        let width: u16 = 12;
        let spacer: u16 = 2;
        let buttons = state.buttons();
        let total = buttons.len() as u16 * (width + spacer);
        let start_x = button_rect.x + button_rect.width.saturating_sub(total);
        self.button_areas.clear();
        for (i, button) in buttons.iter().enumerate() {
            let offset = i as u16 * (width + spacer);
            let area = Rect::new(start_x + offset, button_rect.y, width, button_rect.height).intersection(button_rect);
            render_button(
                frame,
                area,
                &button.label,
                theme,
                ButtonRenderOptions::new(true, state.is_button_focused(i), false, Borders::ALL, button.button_type),
            );
            self.button_areas.push(area);
        }
        Ok(())
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        match app.providers.use_theme() {
            Ok(theme) => build_hint_spans(
                theme.theme(),
                &[("Tab/Shift+Tab", " Focus  "), ("Enter", " Choose  "), ("Esc", " Cancel")],
            ),
            Err(_) => Vec::new(),
        }
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let has_message = app.confirmation.message().is_some();
        Layout::vertical([
            Constraint::Min(if has_message { 1 } else { 0 }), // Message
            Constraint::Length(1),                            // Spacer
            Constraint::Length(3),                            // Buttons
        ])
        .split(area)
        .to_vec()
    }
}

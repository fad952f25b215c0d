use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Clear, Padding, Paragraph, Wrap},
};
use stuffsdrop_types::{Effect, Modal, Msg, Route};

use super::{
    components::{
        Component, ListingsComponent, LoginComponent, RegisterComponent, ResourceComponent, SidebarComponent,
        common::ConfirmationModal,
        sidebar::{COLLAPSED_WIDTH, EXPANDED_WIDTH},
    },
    theme::{Tone, theme_helpers as th},
    utils::centered_fixed,
};
use crate::app::{App, shows_listings};

/// Brand panel is dropped below this width.
const AUTH_SPLIT_MIN_WIDTH: u16 = 90;

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

#[derive(Default)]
pub struct MainView {
    /// Current route's component
    pub content_view: Option<Box<dyn Component>>,
    /// Sidebar shown beside every signed-in route
    pub sidebar_view: SidebarComponent,
    /// Currently open modal component
    pub modal_view: Option<ModalView>,

    /// the widget_id of the focus just before a modal is opened
    transient_focus_id: Option<usize>,
}

impl std::fmt::Debug for MainView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainView")
            .field("has_content", &self.content_view.is_some())
            .field("modal_view", &self.modal_view.as_ref().map(|(_, layout)| layout))
            .field("transient_focus_id", &self.transient_focus_id)
            .finish()
    }
}

impl MainView {
    /// Swaps in the component for `route`. Screens that need a session
    /// resolve to the login form while signed out.
    ///
    /// Not meant to be called directly; emit `Effect::SwitchTo` instead so
    /// the route enter/exit hooks run.
    pub fn set_current_route(&mut self, app: &mut App, route: Route) {
        let route = app.enter_route(route);
        let view: Box<dyn Component> = match &route {
            Route::Login => Box::new(LoginComponent::default()),
            Route::Register => Box::new(RegisterComponent::default()),
            route if shows_listings(route) => Box::new(ListingsComponent::default()),
            Route::Feed | Route::Resource(_) => Box::new(ResourceComponent),
        };
        self.content_view = Some(view);
        app.rebuild_focus();
    }

    /// Switches routes and runs the exit/enter hooks of the old and new views.
    pub fn set_current_route_with_hooks(&mut self, app: &mut App, route: Route) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(mut view) = self.content_view.take() {
            effects.extend(view.on_route_exit(app));
        }
        self.set_current_route(app, route);
        if let Some(view) = self.content_view.as_mut() {
            effects.extend(view.on_route_enter(app));
        }
        effects
    }

    /// Update the open modal kind (use None to clear).
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        match modal.as_ref() {
            Some(Modal::Logout) => {
                self.modal_view = Some((
                    Box::new(ConfirmationModal::default()),
                    ModalLayout(Box::new(|rect| centered_fixed(56, 10, rect))),
                ));
                // save the current focus to restore when the modal is closed
                self.transient_focus_id = app.focus.focused().map(|focus| focus.widget_id());
            }
            None => self.modal_view = None,
        }
        app.open_modal = modal;
        app.rebuild_focus();
        if app.open_modal.is_some() {
            app.focus.first();
        } else {
            self.restore_focus(app);
        }
    }

    pub fn restore_focus(&mut self, app: &mut App) {
        if let Some(id) = self.transient_focus_id
            && app.open_modal.is_none()
        {
            app.focus.by_widget_id(id);
            self.transient_focus_id = None;
        } else {
            app.focus.first();
        }
    }

    fn sidebar_visible(app: &App) -> bool {
        !app.current_route.is_public()
    }

    fn render_auth(&mut self, frame: &mut Frame, area: Rect, app: &mut App) -> Result<()> {
        let form_area = if area.width >= AUTH_SPLIT_MIN_WIDTH {
            let [brand_area, form_area] = Layout::horizontal([Constraint::Percentage(42), Constraint::Fill(1)]).areas(area);
            render_brand_panel(frame, brand_area, app)?;
            form_area
        } else {
            area
        };

        let form_area = match app.current_route {
            Route::Register => centered_fixed(78, form_area.height.saturating_sub(2), form_area),
            _ => centered_fixed(56, 18, form_area),
        };
        if let Some(content) = self.content_view.as_mut() {
            content.render(frame, form_area, app)?;
        }
        Ok(())
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = app.update(&msg);

        // Messages are consumed by the topmost view only.
        match self.modal_view.as_mut() {
            Some((modal, _)) => effects.extend(modal.handle_message(app, msg)),
            None => {
                if let Some(content) = self.content_view.as_mut() {
                    effects.extend(content.handle_message(app, msg));
                }
            }
        }

        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if let Some(target) = self.modal_view.as_mut() {
            return target.0.handle_key_events(app, key);
        }

        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        if control && key.code == KeyCode::Char('t') {
            return match app.toggle_theme() {
                Ok(effects) => effects,
                Err(error) => {
                    tracing::warn!(%error, "theme toggle ignored");
                    Vec::new()
                }
            };
        }

        if Self::sidebar_visible(app) {
            if control && key.code == KeyCode::Char('b') {
                if let Err(error) = app.toggle_sidebar() {
                    tracing::warn!(%error, "collapse toggle ignored");
                }
                return Vec::new();
            }

            if app.sidebar.container_focus.get() {
                match key.code {
                    KeyCode::Tab => {
                        app.focus.next();
                        return Vec::new();
                    }
                    KeyCode::BackTab => {
                        app.focus.prev();
                        return Vec::new();
                    }
                    _ => return self.sidebar_view.handle_key_events(app, key),
                }
            }
        }

        if let Some(content) = self.content_view.as_mut() {
            return content.handle_key_events(app, key);
        }

        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some(target) = self.modal_view.as_mut() {
            return target.0.handle_mouse_events(app, mouse);
        }

        let mut effects = Vec::new();
        if Self::sidebar_visible(app) {
            effects.extend(self.sidebar_view.handle_mouse_events(app, mouse));
        }
        if let Some(content) = self.content_view.as_mut() {
            effects.extend(content.handle_mouse_events(app, mouse));
        }
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) -> Result<()> {
        let background = app.providers.use_theme()?.theme().roles().canvas;
        frame.render_widget(Block::default().style(Style::default().bg(background)), area);

        let layout = self.get_preferred_layout(app, area);
        if Self::sidebar_visible(app) {
            self.sidebar_view.render(frame, layout[0], app)?;
            if let Some(content) = self.content_view.as_mut() {
                content.render(frame, layout[2], app)?;
            }
        } else {
            self.render_auth(frame, layout[2], app)?;
        }

        let hints = Paragraph::new(Line::from(self.get_hint_spans(app)));
        frame.render_widget(hints, layout[1]);

        if let Some((modal, position)) = self.modal_view.as_mut() {
            let theme = app.providers.use_theme()?.theme();
            frame.render_widget(Block::default().style(theme.modal_background_style()).dim(), area);
            let modal_area = position.0(area);
            frame.render_widget(Clear, modal_area);

            let modal_hints = modal.get_hint_spans(app);
            if modal_hints.is_empty() {
                modal.render(frame, modal_area, app)?;
            } else {
                let [body, hints_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(modal_area);
                let hints = Paragraph::new(Line::from(modal_hints)).style(Style::default().bg(background));
                frame.render_widget(hints, hints_area);
                modal.render(frame, body, app)?;
            }
        }
        Ok(())
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let Ok(theme) = app.providers.use_theme().map(|context| context.theme()) else {
            return Vec::new();
        };
        let mut hint_spans = vec![Span::styled(" Hints: ", theme.text_muted_style())];

        if Self::sidebar_visible(app) && app.sidebar.container_focus.get() {
            hint_spans.extend(self.sidebar_view.get_hint_spans(app));
        } else if let Some(content) = self.content_view.as_ref() {
            hint_spans.extend(content.get_hint_spans(app));
        }

        hint_spans.extend(th::build_hint_spans(theme, &[("  Ctrl+T", " Theme  "), ("Ctrl+C", " Quit")]));

        if let Some(status) = app.status.as_deref() {
            hint_spans.push(Span::styled(format!("  • {status}"), theme.tone_style(Tone::Notice)));
        }
        hint_spans
    }

    /// `[sidebar, hints, content]`; the sidebar slot is empty on auth screens.
    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let [body, hints] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        if !Self::sidebar_visible(app) {
            return vec![Rect::default(), hints, body];
        }

        let sidebar_width = if app.sidebar_collapsed() { COLLAPSED_WIDTH } else { EXPANDED_WIDTH };
        let [sidebar, content] = Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Fill(1)]).areas(body);
        vec![sidebar, hints, content]
    }
}

/// Marketing column of the auth screens with the rotating testimonial.
fn render_brand_panel(frame: &mut Frame, area: Rect, app: &App) -> Result<()> {
    let theme = app.providers.use_theme()?.theme();
    let panel = Block::default()
        .style(Style::default().bg(theme.roles().panel_raised))
        .padding(Padding::uniform(2));
    let inner = panel.inner(area);
    frame.render_widget(panel, area);

    let testimonial = app.testimonials.current();
    let [headline, quote_area] = Layout::vertical([Constraint::Length(7), Constraint::Fill(1)]).areas(inner);
    frame.render_widget(
        Paragraph::new(vec![
            Line::styled("◆ StuffsDrop", theme.accent_emphasis_style()),
            Line::default(),
            Line::styled("The drop is live", theme.text_primary_style().add_modifier(Modifier::BOLD)),
            Line::styled("Give what you don't need. Claim what you love.", theme.text_secondary_style()),
        ])
        .wrap(Wrap { trim: true }),
        headline,
    );

    let quote = Paragraph::new(vec![
        Line::styled(format!("“{}”", testimonial.quote), theme.text_primary_style().add_modifier(Modifier::ITALIC)),
        Line::default(),
        Line::from(vec![
            Span::styled(testimonial.author, theme.accent_primary_style()),
            Span::styled(format!("  {}", testimonial.role), theme.text_muted_style()),
        ]),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(quote, quote_area);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{Terminal, backend::TestBackend};
    use stuffsdrop_api::DemoBackend;
    use stuffsdrop_types::{Identity, StaticResources};
    use stuffsdrop_util::UserPreferences;

    use super::*;
    use crate::{app::SharedCtx, providers::Providers};

    fn app() -> App {
        let backend = Arc::new(DemoBackend::new());
        let ctx = SharedCtx::new(
            Arc::new(StaticResources),
            backend.clone(),
            backend,
            Arc::new(UserPreferences::ephemeral()),
        );
        App::new(ctx, None)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn draw(app: &mut App, view: &mut MainView) -> (Terminal<TestBackend>, Result<()>) {
        let mut terminal = Terminal::new(TestBackend::new(120, 36)).expect("test terminal");
        let mut outcome = Ok(());
        terminal
            .draw(|frame| outcome = view.render(frame, frame.area(), app))
            .expect("draw");
        (terminal, outcome)
    }

    #[test]
    fn signed_out_routes_render_the_login_form_with_brand_panel() {
        let mut app = app();
        let mut view = MainView::default();
        view.set_current_route(&mut app, Route::Feed);
        assert_eq!(app.current_route, Route::Login);

        let (terminal, outcome) = draw(&mut app, &mut view);
        assert!(outcome.is_ok());
        let text = screen(&terminal);
        assert!(text.contains("Welcome back"));
        assert!(text.contains("The drop is live"));
        assert!(text.contains("Alex Chen"));
    }

    #[test]
    fn signed_in_routes_show_the_sidebar() {
        let mut app = app();
        app.identity = Some(Identity {
            id: "u1".into(),
            name: Some("Ada".into()),
            ..Default::default()
        });
        let mut view = MainView::default();
        view.set_current_route(&mut app, Route::Resource("saved".into()));

        let (terminal, outcome) = draw(&mut app, &mut view);
        assert!(outcome.is_ok());
        let text = screen(&terminal);
        assert!(text.contains("StuffsDrop"));
        assert!(text.contains("Watchlist"));
        assert!(text.contains("Ada"));
    }

    #[test]
    fn missing_provider_aborts_the_frame() {
        let mut app = app();
        let mut view = MainView::default();
        view.set_current_route(&mut app, Route::Login);
        app.providers = Providers::default();

        let (_, outcome) = draw(&mut app, &mut view);
        let error = outcome.expect_err("render must fail without a theme");
        assert_eq!(error.to_string(), "use_theme must be used within a ThemeProvider");
    }

    #[test]
    fn logout_modal_captures_and_restores_focus() {
        let mut app = app();
        app.identity = Some(Identity::default());
        let mut view = MainView::default();
        view.set_current_route(&mut app, Route::Resource("saved".into()));
        app.focus.first();
        let before = app.sidebar.focused_target();
        assert!(before.is_some());

        let effects = app.request_logout();
        assert_eq!(effects, vec![Effect::ShowModal(Modal::Logout)]);
        view.set_open_modal_kind(&mut app, Some(Modal::Logout));
        assert!(view.modal_view.is_some());
        assert!(app.confirmation.focused_action().is_some());

        view.set_open_modal_kind(&mut app, None);
        assert!(view.modal_view.is_none());
        assert_eq!(app.sidebar.focused_target(), before);
    }
}

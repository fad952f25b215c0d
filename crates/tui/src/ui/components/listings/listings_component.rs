use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use stuffsdrop_types::{Effect, Listing, Route, ViewMode, listing::ALL_CATEGORIES};
use stuffsdrop_util::{format_relative_age, truncate_to_width};

use super::state::ListingsState;
use crate::{
    app::App,
    ui::{
        components::{
            Component,
            common::TextInputState,
        },
        theme::{
            Theme, Tone,
            theme_helpers::{badge_style, block, build_hint_spans},
        },
        utils::cells,
    },
};

const CARD_HEIGHT: u16 = 7;
const GRID_COLUMNS: u16 = 3;
const THROBBER: [&str; 4] = ["◐", "◓", "◑", "◒"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingsTarget {
    Search,
    Category,
    View,
    Result(usize),
}

/// Live drops: search, category filter and grid/map views.
#[derive(Debug, Default)]
pub struct ListingsComponent {
    hit_areas: Vec<(Rect, ListingsTarget)>,
}

impl ListingsComponent {
    fn focus_target(app: &mut App, target: ListingsTarget) {
        let state = &app.listings;
        let flag = match target {
            ListingsTarget::Search => &state.search_focus,
            ListingsTarget::Category => &state.category_focus,
            ListingsTarget::View => &state.view_focus,
            ListingsTarget::Result(_) => &state.results_focus,
        };
        app.focus.focus(flag);
    }

    fn card(theme: &dyn Theme, listing: &Listing, selected: bool, width: u16) -> Paragraph<'static> {
        let inner_width = usize::from(width.saturating_sub(2));
        let mut badges = vec![Span::styled(format!(" {} ", listing.condition), badge_style(theme))];
        if listing.is_hot {
            badges.push(Span::raw(" "));
            badges.push(Span::styled(" HOT ", theme.tone_style(Tone::Caution).add_modifier(Modifier::REVERSED | Modifier::BOLD)));
        }
        let meta = format!(
            "⌖ {:.1} mi · {}",
            listing.distance_miles,
            format_relative_age(listing.posted_at, Utc::now())
        );
        let tags = listing.tags.iter().map(|tag| format!("#{tag}")).collect::<Vec<_>>().join(" ");
        let lines = vec![
            Line::styled(
                truncate_to_width(&listing.title, inner_width),
                theme.text_primary_style().add_modifier(Modifier::BOLD),
            ),
            Line::from(badges),
            Line::styled(meta, theme.text_secondary_style()),
            Line::styled(truncate_to_width(&listing.category, inner_width), theme.text_muted_style()),
            Line::styled(truncate_to_width(&tags, inner_width), theme.accent_primary_style()),
        ];
        let mut card = block(theme, None, selected);
        if selected {
            card = card.style(theme.selection_style());
        }
        Paragraph::new(lines).block(card)
    }

    fn render_toolbar(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &ListingsState) {
        let [search_area, category_area, view_area] =
            Layout::horizontal([Constraint::Min(20), Constraint::Length(22), Constraint::Length(16)]).areas(area);

        let search_focused = state.search_focus.get();
        let search_block = block(theme, Some("Search"), search_focused);
        let search_inner = search_block.inner(search_area);
        let search_text = if state.search.input().is_empty() {
            Span::styled("  title, category or tag", theme.text_muted_style().add_modifier(Modifier::DIM))
        } else {
            Span::styled(format!("  {}", state.search.input()), theme.text_primary_style())
        };
        frame.render_widget(Paragraph::new(search_text).block(search_block), search_area);
        if search_focused {
            let x = search_inner.x.saturating_add(cells(2 + state.search.cursor_column()));
            if x < search_inner.right() {
                frame.set_cursor_position((x, search_inner.y));
            }
        }
        self.hit_areas.push((search_area, ListingsTarget::Search));

        let category = if state.query().category.eq_ignore_ascii_case(ALL_CATEGORIES) {
            "All"
        } else {
            state.query().category.as_str()
        };
        frame.render_widget(
            Paragraph::new(Line::styled(format!("◂ {category} ▸"), theme.text_primary_style()))
                .centered()
                .block(block(theme, Some("Category"), state.category_focus.get())),
            category_area,
        );
        self.hit_areas.push((category_area, ListingsTarget::Category));

        let (grid_style, map_style) = match state.view_mode() {
            ViewMode::Grid => (theme.accent_emphasis_style(), theme.text_muted_style()),
            ViewMode::Map => (theme.text_muted_style(), theme.accent_emphasis_style()),
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("▦ Grid", grid_style),
                Span::raw("  "),
                Span::styled("⌖ Map", map_style),
            ]))
            .centered()
            .block(block(theme, Some("View"), state.view_focus.get())),
            view_area,
        );
        self.hit_areas.push((view_area, ListingsTarget::View));
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &ListingsState) {
        let visible = state.visible();
        let columns = GRID_COLUMNS.min(area.width / 24).max(1);
        let card_width = area.width / columns;
        let rows_fit = (area.height / CARD_HEIGHT).max(1);
        let selected_row = cells(state.selected()) / columns;
        let first_row = selected_row.saturating_sub(rows_fit - 1);

        for (index, listing) in visible.iter().enumerate() {
            let row = cells(index) / columns;
            if row < first_row {
                continue;
            }
            let y = area.y + (row - first_row) * CARD_HEIGHT;
            if y + CARD_HEIGHT > area.bottom() {
                break;
            }
            let x = area.x + (cells(index) % columns) * card_width;
            let rect = Rect::new(x, y, card_width, CARD_HEIGHT);
            let selected = index == state.selected() && state.results_focus.get();
            frame.render_widget(Self::card(theme, listing, selected, card_width), rect);
            self.hit_areas.push((rect, ListingsTarget::Result(index)));
        }
    }

    fn render_map(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &ListingsState) {
        let entries = state.map_entries();
        let panel = block(theme, Some("Nearby"), state.results_focus.get());
        let inner = panel.inner(area);
        frame.render_widget(panel, area);

        for (index, listing) in entries.iter().enumerate().take(usize::from(inner.height)) {
            let row = Rect::new(inner.x, inner.y.saturating_add(cells(index)), inner.width, 1);
            let selected = index == state.selected() && state.results_focus.get();
            let style = if selected { theme.selection_style() } else { theme.text_primary_style() };
            let line = Line::from(vec![
                Span::styled(format!("{:>5.1} mi  ", listing.distance_miles), theme.accent_primary_style()),
                Span::styled(truncate_to_width(&listing.title, 28), style.add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  ({:.4}, {:.4})", listing.latitude, listing.longitude),
                    theme.text_muted_style(),
                ),
            ]);
            frame.render_widget(Paragraph::new(line).style(style), row);
            self.hit_areas.push((row, ListingsTarget::Result(index)));
        }
    }
}

impl Component for ListingsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let state = &mut app.listings;
        if key.code == KeyCode::Esc && state.error().is_some() {
            state.dismiss_error();
            return Vec::new();
        }
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        if state.search_focus.get() {
            match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => state.edit_search(|input| input.insert_char(c)),
                KeyCode::Backspace => state.edit_search(TextInputState::backspace),
                KeyCode::Delete => state.edit_search(TextInputState::delete),
                KeyCode::Left => state.edit_search(TextInputState::move_left),
                KeyCode::Right => state.edit_search(TextInputState::move_right),
                KeyCode::Down | KeyCode::Enter => {
                    app.focus.focus(&app.listings.results_focus);
                }
                _ => {}
            }
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('r') => return state.request_load(),
            KeyCode::Char('/') => {
                app.focus.focus(&app.listings.search_focus);
                return Vec::new();
            }
            _ => {}
        }

        if state.category_focus.get() {
            match key.code {
                KeyCode::Left => state.cycle_category(false),
                KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => state.cycle_category(true),
                _ => {}
            }
        } else if state.view_focus.get() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                state.toggle_view();
            }
        } else if state.results_focus.get() {
            let step = match state.view_mode() {
                ViewMode::Grid => GRID_COLUMNS as usize,
                ViewMode::Map => 1,
            };
            match key.code {
                KeyCode::Right => state.select_next(),
                KeyCode::Left => state.select_prev(),
                KeyCode::Down => (0..step).for_each(|_| state.select_next()),
                KeyCode::Up => (0..step).for_each(|_| state.select_prev()),
                _ => {}
            }
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position::new(mouse.column, mouse.row);
        let target = self.hit_areas.iter().find(|(area, _)| area.contains(position)).map(|(_, t)| *t);
        match (mouse.kind, target) {
            (MouseEventKind::Down(MouseButton::Left), Some(target)) => {
                Self::focus_target(app, target);
                match target {
                    ListingsTarget::Category => app.listings.cycle_category(true),
                    ListingsTarget::View => {
                        app.listings.toggle_view();
                    }
                    ListingsTarget::Result(index) => app.listings.select(index),
                    ListingsTarget::Search => {}
                }
            }
            (MouseEventKind::ScrollDown, _) => app.listings.select_next(),
            (MouseEventKind::ScrollUp, _) => app.listings.select_prev(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Result<()> {
        app.listings.last_area = rect;
        self.hit_areas.clear();
        let theme = app.providers.use_theme()?.theme();
        let state = &app.listings;

        let banner_height = if state.error().is_some() { 1 } else { 0 };
        let [title_area, toolbar_area, banner_area, body_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(0),
        ])
        .areas(rect);

        let mut title = vec![
            Span::styled("Live Drops", theme.text_primary_style().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {} items", state.visible().len()), theme.text_muted_style()),
        ];
        if state.is_loading() {
            title.push(Span::styled(
                format!("  {} loading", THROBBER[app.throbber_idx % THROBBER.len()]),
                theme.tone_style(Tone::Notice),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(title)), title_area);

        self.render_toolbar(frame, toolbar_area, theme, state);

        if let Some(message) = state.error() {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    format!(" ⚠ Could not load drops: {message}  (r to retry, Esc to dismiss)"),
                    theme.tone_style(Tone::Danger).add_modifier(Modifier::BOLD),
                )),
                banner_area,
            );
        }

        if state.visible().is_empty() {
            let message = if state.is_loading() {
                "Fetching the latest drops…"
            } else if state.all().is_empty() {
                "No drops yet. Check back soon."
            } else {
                "Nothing matches your search."
            };
            frame.render_widget(
                Paragraph::new(Line::styled(message, theme.text_muted_style()))
                    .centered()
                    .wrap(Wrap { trim: true }),
                body_area,
            );
            return Ok(());
        }

        match state.view_mode() {
            ViewMode::Grid => self.render_grid(frame, body_area, theme, state),
            ViewMode::Map => self.render_map(frame, body_area, theme, state),
        }
        Ok(())
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        match app.providers.use_theme() {
            Ok(theme) => build_hint_spans(
                theme.theme(),
                &[("Tab", " Focus  "), ("/", " Search  "), ("←/→", " Change  "), ("r", " Reload  "), ("Ctrl+B", " Sidebar")],
            ),
            Err(_) => Vec::new(),
        }
    }

    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        if app.current_route == Route::Resource("map".to_string()) {
            app.listings.set_view_mode(ViewMode::Map);
        }
        app.focus.focus(&app.listings.results_focus);
        if app.listings.all().is_empty() {
            app.listings.request_load()
        } else {
            Vec::new()
        }
    }
}

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use stuffsdrop_types::{
    Effect, Route, ThemeMode,
    nav::{group_config, group_for_item},
};

use super::{
    menu::{group_header_line, menu_item_line},
    state::{SidebarState, SidebarTarget},
    user_section::{USER_SECTION_HEIGHT, render_user_section},
};
use crate::{
    app::App,
    ui::{
        components::Component,
        theme::{Theme, theme_helpers as th},
    },
};

/// Sidebar width when expanded and collapsed.
pub const EXPANDED_WIDTH: u16 = 28;
pub const COLLAPSED_WIDTH: u16 = 7;
const FLYOUT_WIDTH: u16 = 24;

/// Grouped navigation with brand header, collapse toggle and user section.
#[derive(Debug, Default)]
pub struct SidebarComponent;

impl SidebarComponent {
    /// Runs the action bound to a sidebar target.
    fn activate(app: &mut App, target: SidebarTarget) -> Vec<Effect> {
        match target {
            SidebarTarget::ThemeToggle => match app.toggle_theme() {
                Ok(effects) => effects,
                Err(error) => {
                    tracing::warn!(%error, "theme toggle ignored");
                    Vec::new()
                }
            },
            SidebarTarget::CollapseToggle => {
                if let Err(error) = app.toggle_sidebar() {
                    tracing::warn!(%error, "collapse toggle ignored");
                }
                Vec::new()
            }
            SidebarTarget::Group(id) => {
                let collapsed = app.providers.use_sidebar().map(|ctx| ctx.collapsed()).unwrap_or(false);
                app.sidebar.toggle_group(id, collapsed);
                Vec::new()
            }
            SidebarTarget::Item(index) => {
                let route = app
                    .sidebar
                    .items()
                    .get(index)
                    .and_then(|item| item.route.as_deref())
                    .and_then(Route::from_path);
                match route {
                    Some(route) => {
                        app.sidebar.hovered_group = None;
                        vec![Effect::SwitchTo(route)]
                    }
                    None => Vec::new(),
                }
            }
            SidebarTarget::Settings => {
                tracing::debug!("settings entry selected");
                Vec::new()
            }
            SidebarTarget::Logout => app.request_logout(),
        }
    }

    fn focus_target(app: &mut App, target: SidebarTarget) {
        if let Some(flag) = app.sidebar.flag_for(target) {
            app.focus.focus(flag);
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &mut SidebarState, collapsed: bool, mode: ThemeMode) {
        let theme_glyph = match mode {
            ThemeMode::Light => "☾",
            ThemeMode::Dark => "☀",
        };
        let collapse_glyph = if collapsed { "»" } else { "«" };
        let toggle_style = |focused: bool| {
            if focused {
                theme.accent_emphasis_style()
            } else {
                theme.text_secondary_style()
            }
        };

        let toggles_width = 5;
        let toggles_x = area.right().saturating_sub(toggles_width);
        let theme_area = Rect::new(toggles_x, area.y, 2, 1).intersection(area);
        let collapse_area = Rect::new(toggles_x + 3, area.y, 2, 1).intersection(area);

        if !collapsed && area.height >= 2 {
            let brand = Paragraph::new(vec![
                Line::from(Span::styled("◆ StuffsDrop", theme.accent_emphasis_style())),
                Line::from(Span::styled("  Marketplace", theme.text_muted_style())),
            ]);
            frame.render_widget(brand, Rect { width: area.width.saturating_sub(toggles_width), ..area });
        }

        frame.render_widget(
            Paragraph::new(Span::styled(theme_glyph, toggle_style(state.theme_toggle_focus.get()))),
            theme_area,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(collapse_glyph, toggle_style(state.collapse_toggle_focus.get()))),
            collapse_area,
        );
        state.hit_areas.push((theme_area, SidebarTarget::ThemeToggle));
        state.hit_areas.push((collapse_area, SidebarTarget::CollapseToggle));
    }

    /// Draws headers and inline items; returns the header row of each group.
    fn render_groups(frame: &mut Frame, area: Rect, theme: &dyn Theme, state: &mut SidebarState, collapsed: bool) -> Vec<(&'static str, Rect)> {
        let mut y = area.y;
        let mut header_rows = Vec::new();
        for (group, members) in state.groups() {
            if y >= area.bottom() {
                break;
            }
            let header_area = Rect::new(area.x, y, area.width, 1);
            let expanded = state.is_expanded(group.id);
            let focused = state.group_flag(group.id).is_some_and(|flag| flag.get());
            frame.render_widget(
                Paragraph::new(group_header_line(theme, group, expanded, collapsed, focused)),
                header_area,
            );
            state.hit_areas.push((header_area, SidebarTarget::Group(group.id)));
            header_rows.push((group.id, header_area));
            y += 1;

            if expanded && !collapsed {
                for item in &members {
                    if y >= area.bottom() {
                        break;
                    }
                    let Some(index) = state.item_index(&item.key) else { continue };
                    let row = Rect::new(area.x, y, area.width, 1);
                    let focused = state.item_focus.get(index).is_some_and(|flag| flag.get());
                    frame.render_widget(Paragraph::new(menu_item_line(theme, item, item.checked, false, focused)), row);
                    state.hit_areas.push((row, SidebarTarget::Item(index)));
                    y += 1;
                }
            }
            y += 1;
        }
        header_rows
    }

    /// Panel beside a collapsed sidebar listing the items of one group.
    fn render_flyout(frame: &mut Frame, anchor: Rect, theme: &dyn Theme, state: &mut SidebarState, group_id: &'static str) {
        let members: Vec<_> = state
            .items()
            .iter()
            .filter(|item| group_for_item(&item.name) == group_id)
            .cloned()
            .collect();
        if members.is_empty() {
            return;
        }
        let label = group_config(group_id).map(|g| g.label).unwrap_or(group_id);
        let screen = frame.area();
        let height = members.len() as u16 + 2;
        let flyout = Rect::new(anchor.right(), anchor.y, FLYOUT_WIDTH, height).intersection(screen);
        if flyout.is_empty() {
            return;
        }
        let block = th::block(theme, Some(label), true);
        let inner = block.inner(flyout);
        frame.render_widget(Clear, flyout);
        frame.render_widget(block, flyout);

        for (offset, item) in members.iter().enumerate() {
            let row = Rect::new(inner.x, inner.y + offset as u16, inner.width, 1).intersection(inner);
            if row.is_empty() {
                break;
            }
            let Some(index) = state.item_index(&item.key) else { continue };
            let focused = state.item_focus.get(index).is_some_and(|flag| flag.get());
            let line = menu_item_line(theme, item, item.checked, false, focused);
            frame.render_widget(Paragraph::new(line), row);
            state.hit_areas.push((row, SidebarTarget::Item(index)));
        }
        // Keeps the hover alive while the pointer is over the panel border.
        state.hit_areas.push((flyout, SidebarTarget::Group(group_id)));
    }
}

impl Component for SidebarComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let collapsed = app.providers.use_sidebar().map(|ctx| ctx.collapsed()).unwrap_or(false);
        match key.code {
            KeyCode::Down | KeyCode::Up => {
                if let Some(target) = app.sidebar.cycle_target(collapsed, key.code == KeyCode::Down) {
                    Self::focus_target(app, target);
                }
                Vec::new()
            }
            KeyCode::Right | KeyCode::Left => {
                if let Some(SidebarTarget::Group(id)) = app.sidebar.focused_target() {
                    let wants_open = key.code == KeyCode::Right;
                    if app.sidebar.is_expanded(id) != wants_open {
                        app.sidebar.toggle_group(id, collapsed);
                    }
                }
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char(' ') => match app.sidebar.focused_target() {
                Some(target) => Self::activate(app, target),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position::new(mouse.column, mouse.row);
        let target = app.sidebar.target_at(position);
        match mouse.kind {
            MouseEventKind::Moved => {
                let collapsed = app.providers.use_sidebar().map(|ctx| ctx.collapsed()).unwrap_or(false);
                if collapsed {
                    app.sidebar.hovered_group = match target {
                        Some(SidebarTarget::Group(id)) => Some(id),
                        Some(SidebarTarget::Item(_)) => app.sidebar.hovered_group,
                        _ => None,
                    };
                }
                Vec::new()
            }
            MouseEventKind::Down(MouseButton::Left) => match target {
                Some(target) => {
                    Self::focus_target(app, target);
                    Self::activate(app, target)
                }
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Result<()> {
        let collapsed = app.providers.use_sidebar()?.collapsed();
        let theme_context = app.providers.use_theme()?;
        let theme = theme_context.theme();
        let mode = theme_context.mode();

        let state = &mut app.sidebar;
        state.last_area = rect;
        state.hit_areas.clear();

        let has_focus = state.focused_target().is_some();
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(theme.border_style(has_focus))
            .style(th::panel_style(theme));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let header_height = if collapsed { 1 } else { 2 };
        let header = Rect { height: header_height.min(inner.height), ..inner };
        Self::render_header(frame, header, theme, state, collapsed, mode);

        let body_top = inner.y + header_height + 1;
        let body_bottom = inner.bottom().saturating_sub(USER_SECTION_HEIGHT);
        let body = Rect::new(inner.x, body_top.min(body_bottom), inner.width, body_bottom.saturating_sub(body_top));
        let header_rows = Self::render_groups(frame, body, theme, state, collapsed);

        let user_area = Rect::new(inner.x, body_bottom, inner.width, USER_SECTION_HEIGHT.min(inner.height)).intersection(inner);
        render_user_section(frame, user_area, theme, state, app.identity.as_ref(), collapsed);

        if collapsed
            && let Some(group_id) = state.flyout_group()
            && let Some((_, anchor)) = header_rows.iter().find(|(id, _)| *id == group_id)
        {
            Self::render_flyout(frame, Rect { width: rect.width, ..*anchor }, theme, state, group_id);
        }
        Ok(())
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        let Ok(theme) = app.providers.use_theme() else {
            return Vec::new();
        };
        th::build_hint_spans(
            theme.theme(),
            &[("↑/↓", " Move  "), ("Enter", " Open  "), ("←/→", " Fold group  "), ("Ctrl+B", " Collapse")],
        )
    }
}

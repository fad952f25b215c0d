use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Borders, Paragraph},
};
use stuffsdrop_types::Identity;
use stuffsdrop_util::text::truncate_to_width;

use super::state::{SidebarState, SidebarTarget};
use crate::ui::theme::{Theme, Tone};

/// Rows used by the user section.
pub const USER_SECTION_HEIGHT: u16 = 4;

/// Signed-in identity plus the settings and logout entries.
///
/// Registers hit areas for both entries on `state`.
pub fn render_user_section(
    frame: &mut Frame,
    area: Rect,
    theme: &dyn Theme,
    state: &mut SidebarState,
    identity: Option<&Identity>,
    collapsed: bool,
) {
    let [divider, who, settings, logout] = Layout::vertical([Constraint::Length(1); 4]).areas(area);
    frame.render_widget(
        ratatui::widgets::Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style(false)),
        divider,
    );

    let name = identity.map(Identity::display_name).unwrap_or("User");
    let role = identity.map(Identity::display_role).unwrap_or("Member");
    let avatar = if identity.is_some_and(Identity::has_avatar) { "◉" } else { "◎" };
    let who_line = if collapsed {
        Line::from(Span::styled(format!(" {avatar}"), theme.accent_primary_style()))
    } else {
        let width = usize::from(who.width.saturating_sub(3));
        Line::from(vec![
            Span::styled(format!("{avatar} "), theme.accent_primary_style()),
            Span::styled(
                truncate_to_width(name, width / 2 + width / 4),
                theme.text_primary_style().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {role}"), theme.text_muted_style()),
        ])
    };
    frame.render_widget(Paragraph::new(who_line), who);

    for (row, target, icon, label) in [
        (settings, SidebarTarget::Settings, "⚙", "Settings"),
        (logout, SidebarTarget::Logout, "⏻", "Logout"),
    ] {
        let focused = state.flag_for(target).is_some_and(|flag| flag.get());
        let style = match (target, focused) {
            (_, true) => theme.accent_emphasis_style(),
            (SidebarTarget::Logout, false) => theme.tone_style(Tone::Danger),
            _ => theme.text_secondary_style(),
        };
        let text = if collapsed { format!(" {icon}") } else { format!("{icon} {label}") };
        frame.render_widget(Paragraph::new(Line::styled(text, style)), row);
        state.hit_areas.push((row, target));
    }
}

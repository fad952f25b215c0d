//! Line builders for sidebar entries.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use stuffsdrop_types::{
    NavItem,
    nav::{GroupConfig, menu_icon},
};

use crate::ui::theme::Theme;

/// One navigation entry: check mark, icon and, unless collapsed, the label.
pub fn menu_item_line(theme: &dyn Theme, item: &NavItem, selected: bool, collapsed: bool, focused: bool) -> Line<'static> {
    let check = if item.checked { "● " } else { "○ " };
    let mut style = if selected {
        theme.selection_style().add_modifier(Modifier::BOLD)
    } else {
        theme.text_secondary_style()
    };
    if focused {
        style = style.fg(theme.roles().focus);
    }

    let mut spans = Vec::with_capacity(4);
    if !collapsed {
        spans.push(Span::styled("  ", style));
        spans.push(Span::styled(check, style));
    }
    spans.push(Span::styled(format!("{} ", menu_icon(&item.name)), style));
    if !collapsed {
        spans.push(Span::styled(item.label.clone(), style));
    }
    Line::from(spans).style(style)
}

/// Group header: icon, plus label and chevron when not collapsed.
pub fn group_header_line(theme: &dyn Theme, group: &GroupConfig, expanded: bool, collapsed: bool, focused: bool) -> Line<'static> {
    let style = if focused {
        theme.accent_emphasis_style()
    } else {
        theme.text_muted_style().add_modifier(Modifier::BOLD)
    };
    if collapsed {
        return Line::from(Span::styled(format!(" {} ", group.icon), style));
    }
    let chevron = if expanded { "▾" } else { "▸" };
    Line::from(vec![
        Span::styled(format!("{} ", group.icon), style),
        Span::styled(group.label.to_uppercase(), style),
        Span::styled(format!(" {chevron}"), Style::default().fg(theme.roles().text_muted)),
    ])
}

#[cfg(test)]
mod tests {
    use stuffsdrop_types::nav::MENU_GROUPS;

    use super::*;
    use crate::ui::theme::LightTheme;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn collapsed_items_show_only_the_icon() {
        let theme = LightTheme::new();
        let mut item = NavItem::new("saved", "saved", Some("/saved"));
        item.label = "Watchlist".into();
        item.checked = true;

        assert_eq!(text(&menu_item_line(&theme, &item, true, false, false)), "  ● ♥ Watchlist");
        assert_eq!(text(&menu_item_line(&theme, &item, true, true, false)), "♥ ");
    }

    #[test]
    fn headers_show_chevron_by_expansion() {
        let theme = LightTheme::new();
        let group = &MENU_GROUPS[0];
        assert!(text(&group_header_line(&theme, group, true, false, false)).ends_with('▾'));
        assert!(text(&group_header_line(&theme, group, false, false, false)).ends_with('▸'));
        assert!(!text(&group_header_line(&theme, group, true, true, false)).contains("DISCOVER"));
    }
}

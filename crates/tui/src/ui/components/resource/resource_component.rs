use anyhow::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use stuffsdrop_types::{
    Route,
    nav::{display_label, menu_icon},
};

use crate::{
    app::App,
    ui::{components::Component, theme::theme_helpers::block},
};

/// Empty-state copy per resource.
fn empty_state(name: &str) -> &'static str {
    match name {
        "saved" => "Items you watch show up here. Tap ♥ on a drop to keep an eye on it.",
        "requests" => "You haven't requested anything yet. Browse Live Drops to find something you love.",
        "messages" => "No conversations yet. Chats with givers and collectors will appear here.",
        "impact" => "Your impact grows with every item you give or rescue.",
        "listings" => "Nothing listed yet. Give away what you don't need.",
        "map" => "Nearby drops will be pinned here.",
        _ => "Nothing here yet.",
    }
}

/// Placeholder panel for navigation destinations without a dedicated screen.
#[derive(Debug, Default)]
pub struct ResourceComponent;

impl Component for ResourceComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Result<()> {
        let theme = app.providers.use_theme()?.theme();
        let name = match &app.current_route {
            Route::Resource(name) => name.as_str(),
            _ => "",
        };
        let label = display_label(name).unwrap_or(name);
        let title = format!(" {} {} ", menu_icon(name), label);
        let panel = block(theme, Some(&title), false);
        let inner = panel.inner(rect);
        frame.render_widget(panel, rect);

        let [route_area, _, message_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)]).areas(inner);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Route ", theme.text_muted_style()),
                Span::styled(app.current_route.path(), theme.accent_primary_style().add_modifier(Modifier::ITALIC)),
            ])),
            route_area,
        );
        frame.render_widget(
            Paragraph::new(Line::styled(empty_state(name), theme.text_secondary_style()))
                .centered()
                .wrap(Wrap { trim: true }),
            message_area,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stuffsdrop_types::nav::RESOURCES;

    use super::*;

    #[test]
    fn every_resource_has_copy() {
        for resource in RESOURCES.iter().filter(|r| r.name != "feed") {
            assert_ne!(empty_state(resource.name), empty_state("unknown"), "{}", resource.name);
        }
    }
}

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect, text::Span};
use stuffsdrop_types::{Effect, Msg};

use crate::app::App;

/// A UI component that reacts to messages and input and draws itself.
///
/// Components own only view-local data (hit-test areas, scroll offsets).
/// Screen state lives on [`App`] so that it survives route switches and can
/// be exercised without a terminal.
pub(crate) trait Component {
    /// Handle application messages (ticks, completed executions).
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw into `rect`. A missing context aborts the frame with an error.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) -> Result<()>;

    /// Key hints shown in the footer while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }

    /// Called after the component becomes the active route view.
    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }

    /// Called before the component stops being the active route view.
    fn on_route_exit(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }
}

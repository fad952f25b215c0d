//! Line builders shared by the login and registration forms.

use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use super::TextInputState;
use crate::ui::{
    theme::{Theme, Tone},
    utils::cells,
};

const FOCUS_MARKER: &str = "› ";
const BLANK_MARKER: &str = "  ";

/// `› Label: value` line with a placeholder when empty.
pub fn field_line(
    theme: &dyn Theme,
    label: &str,
    input: &TextInputState,
    placeholder: &str,
    masked: bool,
    focused: bool,
) -> Line<'static> {
    let prefix = if focused { FOCUS_MARKER } else { BLANK_MARKER };
    let label_style = if focused {
        theme.accent_emphasis_style()
    } else {
        theme.text_secondary_style()
    };
    let mut spans = vec![
        Span::styled(prefix, label_style),
        Span::styled(format!("{label}: "), label_style),
    ];
    if input.input().is_empty() {
        spans.push(Span::styled(
            placeholder.to_string(),
            theme.text_muted_style().add_modifier(Modifier::DIM),
        ));
    } else {
        spans.push(Span::styled(input.display(masked), theme.text_primary_style()));
    }
    Line::from(spans)
}

/// Indented error message under a field, or nothing.
pub fn error_line(theme: &dyn Theme, message: Option<&str>) -> Option<Line<'static>> {
    message.map(|message| {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(message.to_string(), theme.tone_style(Tone::Danger)),
        ])
    })
}

/// Places the terminal cursor inside a line built by [`field_line`].
pub fn position_cursor(frame: &mut Frame, line_area: Rect, label: &str, input: &TextInputState) {
    if let Some(x) = cursor_x(line_area, label, input) {
        frame.set_cursor_position((x, line_area.y));
    }
}

/// Cursor column for [`position_cursor`]; `None` once it leaves the line.
fn cursor_x(line_area: Rect, label: &str, input: &TextInputState) -> Option<u16> {
    let label_width = FOCUS_MARKER.width() + label.width() + 2;
    let x = line_area.x.saturating_add(cells(label_width + input.cursor_column()));
    (x < line_area.right()).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_follows_the_label_and_text() {
        let line = Rect::new(4, 2, 40, 1);
        let input = TextInputState::with_value("abc");
        assert_eq!(cursor_x(line, "Email", &input), Some(4 + 2 + 5 + 2 + 3));
    }

    #[test]
    fn overlong_input_hides_the_cursor_instead_of_wrapping() {
        let line = Rect::new(10, 0, 40, 1);
        let input = TextInputState::with_value("x".repeat(70_000));
        assert_eq!(cursor_x(line, "Bio", &input), None);

        let edge = Rect::new(u16::MAX - 5, 0, 5, 1);
        assert_eq!(cursor_x(edge, "Bio", &TextInputState::new()), None);
    }
}

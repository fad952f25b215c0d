//! Layout helpers shared by the views.

use ratatui::prelude::*;

/// Centers a box of at most `width` x `height` cells, shrinking to fit `r`.
///
/// Used for modal dialogs and the auth forms.
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(r.x + (r.width - width) / 2, r.y + (r.height - height) / 2, width, height)
}

/// Converts a char or item count into terminal cells, pinning at `u16::MAX`.
pub fn cells(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_counts_saturate() {
        assert_eq!(cells(12), 12);
        assert_eq!(cells(70_000), u16::MAX);
    }

    #[test]
    fn fixed_box_shrinks_on_small_screens() {
        assert_eq!(centered_fixed(50, 9, Rect::new(0, 0, 100, 30)), Rect::new(25, 10, 50, 9));
        assert_eq!(centered_fixed(50, 9, Rect::new(2, 1, 40, 5)), Rect::new(2, 1, 40, 5));
    }
}

//! Reusable UTF-8 safe text input state with cursor management.
//!
//! The login and registration forms keep one of these per text field so the
//! cursor survives focus changes.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input prefilled with `value`, cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let input = value.into();
        let cursor = input.len();
        Self { input, cursor }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len().min(self.cursor);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().last() {
            self.cursor -= prev.len_utf8();
        }
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().last() {
            let start = self.cursor - prev.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            let end = self.cursor + next.len_utf8();
            self.input.drain(self.cursor..end);
        }
    }

    /// Display form of the buffer; masked inputs show one bullet per char.
    pub fn display(&self, masked: bool) -> String {
        if masked {
            "•".repeat(self.input.chars().count())
        } else {
            self.input.clone()
        }
    }

    /// Column of the cursor within [`Self::display`], in chars.
    pub fn cursor_column(&self) -> usize {
        self.input[..self.cursor].chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = TextInputState::new();
        st.set_input("h🙂llo");
        st.move_right();
        st.insert_char('e');
        assert_eq!(st.input(), "he🙂llo");
        st.move_right();
        st.backspace();
        assert_eq!(st.input(), "hello");
        st.move_left();
        st.backspace();
        assert_eq!(st.input(), "ello");
    }

    #[test]
    fn masked_display_counts_chars() {
        let mut st = TextInputState::with_value("pä55");
        assert_eq!(st.display(true), "••••");
        assert_eq!(st.cursor_column(), 4);
        st.move_home();
        st.delete();
        assert_eq!(st.input(), "ä55");
        assert_eq!(st.cursor_column(), 0);
    }
}

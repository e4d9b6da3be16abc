//! Single-line text input state.

/// State for a text input field. The cursor counts characters, not bytes.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    content: String,
    cursor: usize,
}

impl TextInput {
    /// Creates a new empty text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte offset of the character at `cursor`.
    fn byte_index(&self, cursor: usize) -> usize {
        self.content
            .char_indices()
            .nth(cursor)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Deletes the character at the cursor position (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Takes the content and resets the input.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Discards the content.
    pub fn clear(&mut self) {
        self.take();
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new();
        text.chars().for_each(|c| input.insert(c));
        input
    }

    #[test]
    fn edits_at_the_cursor() {
        let mut input = typed("1250");
        input.move_left();
        input.move_left();
        input.insert('.');
        assert_eq!(input.as_str(), "12.50");

        input.backspace();
        input.delete();
        assert_eq!(input.as_str(), "120");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn multibyte_characters_do_not_split() {
        let mut input = typed("1€2");
        input.move_left();
        input.backspace();
        assert_eq!(input.as_str(), "12");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = typed("42");
        input.move_right();
        input.delete();
        assert_eq!(input.cursor(), 2);
        input.move_home();
        input.backspace();
        assert_eq!(input.as_str(), "42");
        input.move_end();
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn take_resets() {
        let mut input = typed("7");
        assert_eq!(input.take(), "7");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }
}

//! The typed-text buffer shown beneath the keyboard.

use crate::layout::KeyAction;

/// How many trailing characters the text panel shows.
pub const DEFAULT_TAIL: usize = 50;

/// Accumulated text.  All lengths and edits count `char`s, not bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, c: char) { self.text.push(c); }

    pub fn push_str(&mut self, s: &str) { self.text.push_str(s); }

    /// Remove exactly one trailing character.  No-op on an empty buffer.
    pub fn backspace(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) { self.text.clear(); }

    /// The last `n` characters (the whole text if shorter).
    pub fn tail(&self, n: usize) -> &str {
        let count = self.len();
        if count <= n {
            return &self.text;
        }
        let skip = count - n;
        match self.text.char_indices().nth(skip) {
            Some((idx, _)) => &self.text[idx..],
            None => "",
        }
    }

    /// Apply a key action to the buffer.
    ///
    /// Returns the action that should be forwarded to the OS, if any;
    /// `Clear` only affects the on-screen text.
    pub fn apply(&mut self, action: &KeyAction) -> Option<KeyAction> {
        match *action {
            KeyAction::Char(c) => {
                self.push(c);
                Some(*action)
            }
            KeyAction::Space => {
                self.push(' ');
                Some(*action)
            }
            KeyAction::Backspace => {
                self.backspace();
                Some(*action)
            }
            KeyAction::Clear => {
                self.clear();
                None
            }
        }
    }

    pub fn as_str(&self)   -> &str  { &self.text }
    pub fn len(&self)      -> usize { self.text.chars().count() }
    pub fn is_empty(&self) -> bool  { self.text.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(s: &str) -> TextBuffer {
        let mut b = TextBuffer::new();
        b.push_str(s);
        b
    }

    #[test]
    fn backspace_removes_one_char() {
        let mut b = buffer("HELLO");
        assert_eq!(b.backspace(), Some('O'));
        assert_eq!(b.as_str(), "HELL");
    }

    #[test]
    fn backspace_on_multibyte_char() {
        let mut b = buffer("AÉ");
        b.backspace();
        assert_eq!(b.as_str(), "A");
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut b = TextBuffer::new();
        assert_eq!(b.backspace(), None);
        assert!(b.is_empty());
    }

    #[test]
    fn clear_empties() {
        let mut b = buffer("SOME TEXT");
        assert_eq!(b.apply(&KeyAction::Clear), None);
        assert!(b.is_empty());
    }

    #[test]
    fn apply_forwards_typing_actions() {
        let mut b = TextBuffer::new();
        assert_eq!(b.apply(&KeyAction::Char('H')), Some(KeyAction::Char('H')));
        assert_eq!(b.apply(&KeyAction::Space), Some(KeyAction::Space));
        assert_eq!(b.apply(&KeyAction::Char('I')), Some(KeyAction::Char('I')));
        assert_eq!(b.as_str(), "H I");
        assert_eq!(b.apply(&KeyAction::Backspace), Some(KeyAction::Backspace));
        assert_eq!(b.as_str(), "H ");
    }

    #[test]
    fn backspace_forwarded_even_when_empty() {
        let mut b = TextBuffer::new();
        assert_eq!(b.apply(&KeyAction::Backspace), Some(KeyAction::Backspace));
    }

    #[test]
    fn tail_keeps_last_n_chars() {
        let b = buffer(&"X".repeat(60));
        assert_eq!(b.tail(DEFAULT_TAIL).chars().count(), 50);
        let b = buffer("ABCDEF");
        assert_eq!(b.tail(3), "DEF");
        assert_eq!(b.tail(10), "ABCDEF");
        assert_eq!(b.tail(0), "");
    }

    #[test]
    fn len_counts_chars() {
        assert_eq!(buffer("ÉÉ").len(), 2);
    }
}

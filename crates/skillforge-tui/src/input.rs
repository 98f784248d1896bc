//! Single-line text input state.
//!
//! Holds the value, a cursor position, and optional secret masking.  The
//! wizard owns one field per variable plus two for the deploy target;
//! rendering is done by the `ui` module from the accessors here.

use crossterm::event::{KeyCode, KeyEvent};

/// A single-line text input field.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    /// Display label shown above the field.
    label: String,

    /// Current text.
    value: String,

    /// Cursor position in characters.
    cursor: usize,

    /// Placeholder shown while the field is empty.
    placeholder: String,

    /// Mask the value on screen.
    secret: bool,
}

impl TextField {
    /// Create a field with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Enable secret masking.
    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Set the initial value, placing the cursor at the end.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.value.chars().count();
        self
    }

    /// The field label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The raw value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Whether the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether this field masks its value.
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// What the field shows on screen: the value, or one mask character
    /// per typed character for secret fields.
    pub fn display(&self) -> String {
        if self.secret {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Handle an editing key.  Keys that are not editing keys are ignored.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                let idx = self.byte_index(self.cursor);
                self.value.insert(idx, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.chars().count() {
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor < self.value.chars().count() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
            }
            _ => {}
        }
    }

    /// Byte offset of the given character position.
    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn typing_appends() {
        let mut f = TextField::new("Name");
        f.handle_key(key(KeyCode::Char('h')));
        f.handle_key(key(KeyCode::Char('i')));
        assert_eq!(f.value(), "hi");
        assert_eq!(f.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete() {
        let mut f = TextField::new("Name").with_value("ab");
        f.handle_key(key(KeyCode::Backspace));
        assert_eq!(f.value(), "a");
        f.handle_key(key(KeyCode::Home));
        f.handle_key(key(KeyCode::Delete));
        assert_eq!(f.value(), "");
    }

    #[test]
    fn cursor_movement_bounds() {
        let mut f = TextField::new("Name").with_value("xy");
        f.handle_key(key(KeyCode::Right));
        assert_eq!(f.cursor(), 2);
        f.handle_key(key(KeyCode::Home));
        f.handle_key(key(KeyCode::Left));
        assert_eq!(f.cursor(), 0);
        f.handle_key(key(KeyCode::End));
        assert_eq!(f.cursor(), 2);
    }

    #[test]
    fn insertion_mid_string() {
        let mut f = TextField::new("Name").with_value("ac");
        f.handle_key(key(KeyCode::Left));
        f.handle_key(key(KeyCode::Char('b')));
        assert_eq!(f.value(), "abc");
    }

    #[test]
    fn secret_fields_mask_display() {
        let mut f = TextField::new("Key").with_secret(true);
        for c in "token".chars() {
            f.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(f.value(), "token");
        assert_eq!(f.display(), "•••••");
    }

    #[test]
    fn multibyte_editing() {
        let mut f = TextField::new("Name").with_value("héllo");
        f.handle_key(key(KeyCode::Backspace));
        assert_eq!(f.value(), "héll");
        f.handle_key(key(KeyCode::Home));
        f.handle_key(key(KeyCode::Delete));
        assert_eq!(f.value(), "éll");
    }
}

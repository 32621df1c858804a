//! Input state for text input modes (rename, search).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use namesake_core::{GroupKey, validate_base_name};

/// State for text input operations.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// The current input buffer.
    buffer: String,
    /// Cursor position within the buffer.
    cursor: usize,
    /// Validation error message.
    error: Option<String>,
    /// Group the input applies to (rename only).
    pub context_key: Option<GroupKey>,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input state with an initial value.
    pub fn with_initial(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.chars().count(),
            error: None,
            context_key: None,
        }
    }

    /// Get the current buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Get the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the current error message (if any).
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set an error message.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Clear the error message.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Byte offset of the character at `index`.
    fn byte_index(&self, index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(index)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        self.clear_error();

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => InputResult::Submit(self.buffer.clone()),

            (KeyCode::Esc, _) => InputResult::Cancel,

            // Delete character before cursor
            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
                InputResult::Continue
            }

            // Delete character at cursor
            (KeyCode::Delete, _) => {
                if self.cursor < self.char_count() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
                InputResult::Continue
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                InputResult::Continue
            }

            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                InputResult::Continue
            }

            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                InputResult::Continue
            }

            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.char_count();
                InputResult::Continue
            }

            // Ctrl-U - clear line
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.buffer.clear();
                self.cursor = 0;
                InputResult::Continue
            }

            // Ctrl-K - delete from cursor to end
            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                let at = self.byte_index(self.cursor);
                self.buffer.truncate(at);
                InputResult::Continue
            }

            // Ctrl-W - delete word before cursor
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor > 0 {
                    let end = self.byte_index(self.cursor);
                    let word_start = self.buffer[..end]
                        .trim_end()
                        .rfind(|c: char| c.is_whitespace() || c == '_' || c == '-')
                        .map(|i| i + 1)
                        .unwrap_or(0);
                    self.buffer.replace_range(word_start..end, "");
                    self.cursor = self.buffer[..word_start].chars().count();
                }
                InputResult::Continue
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_index(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                InputResult::Continue
            }

            _ => InputResult::Continue,
        }
    }

    /// Validate the buffer as a base name for renamed assets.
    pub fn validate_base_name(&self) -> Result<(), String> {
        validate_base_name(&self.buffer)
    }
}

/// Result of handling input.
#[derive(Debug, Clone)]
pub enum InputResult {
    /// Continue accepting input.
    Continue,
    /// User cancelled the input.
    Cancel,
    /// User submitted the input with this value.
    Submit(String),
}

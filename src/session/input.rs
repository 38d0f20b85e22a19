//! Input buffer and the submit-on-Enter contract.
//!
//! `Enter` without Shift submits; `Shift+Enter` inserts a newline.  The
//! rendering layer decides how keys are painted, but which key submits is
//! decided here.

/// Keys the input buffer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
}

/// A key press with its Shift state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// Editable text the user is composing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// The send control is shown only while something has been typed.
    pub fn shows_send_control(&self) -> bool {
        !self.text.is_empty()
    }

    /// Apply a key press.  Returns `true` when the event is a submit request
    /// (`Enter` without Shift); the buffer is left untouched in that case.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        match event.key {
            Key::Enter if !event.shift => return true,
            Key::Enter => self.text.push('\n'),
            Key::Char(c) => self.text.push(c),
            Key::Backspace => {
                self.text.pop();
            }
        }
        false
    }
}

//! Terminal input translation.
//!
//! Turns crossterm events into [`InputEvent`]s with key names the key map
//! understands, and handles line editing while a prompt is open.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

/// One input event, as the main loop consumes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(String),
    /// Left click at a screen cell.
    Click { x: usize, y: usize },
    Resize { width: usize, height: usize },
    Ignored,
}

/// Name of a key press, e.g. `"q"`, `"LEFT"`, `"S-LEFT"`, `"C-x"`, `"M-x"`.
pub fn key_name(key: &KeyEvent) -> Option<String> {
    let base = match key.code {
        KeyCode::Char(c) => {
            // Shift is already reflected in the character.
            let mut name = String::new();
            if key.modifiers.contains(KeyModifiers::ALT) {
                name.push_str("M-");
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                name.push_str("C-");
            }
            name.push(c);
            return Some(name);
        }
        KeyCode::Left => "LEFT".to_string(),
        KeyCode::Right => "RIGHT".to_string(),
        KeyCode::Up => "UP".to_string(),
        KeyCode::Down => "DOWN".to_string(),
        KeyCode::PageUp => "PAGEUP".to_string(),
        KeyCode::PageDown => "PAGEDOWN".to_string(),
        KeyCode::Home => "HOME".to_string(),
        KeyCode::End => "END".to_string(),
        KeyCode::Enter => "RET".to_string(),
        KeyCode::Esc => "ESC".to_string(),
        KeyCode::Tab => "TAB".to_string(),
        KeyCode::BackTab => "S-TAB".to_string(),
        KeyCode::Backspace => "BACKSPACE".to_string(),
        KeyCode::Delete => "DELETE".to_string(),
        KeyCode::Insert => "INSERT".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => return None,
    };

    let mut name = String::new();
    if key.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("M-");
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("C-");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        name.push_str("S-");
    }
    name.push_str(&base);
    Some(name)
}

/// Translates a terminal event.
pub fn translate_event(event: &Event) -> InputEvent {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => match key_name(key) {
            Some(name) => InputEvent::Key(name),
            None => InputEvent::Ignored,
        },
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            InputEvent::Click {
                x: mouse.column as usize,
                y: mouse.row as usize,
            }
        }
        Event::Resize(width, height) => InputEvent::Resize {
            width: *width as usize,
            height: *height as usize,
        },
        _ => InputEvent::Ignored,
    }
}

/// What a key did to an open prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptAction {
    Continue,
    Submit(String),
    Abort,
}

/// A one-line text prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prompt {
    pub label: String,
    pub buffer: String,
}

impl Prompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            buffer: String::new(),
        }
    }

    /// Handle key events while the prompt is open. Esc, C-g and C-c abort.
    pub fn handle_key(&mut self, key: &KeyEvent) -> PromptAction {
        if key.kind == KeyEventKind::Release {
            return PromptAction::Continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => PromptAction::Abort,
            KeyCode::Char('g') | KeyCode::Char('c') if ctrl => PromptAction::Abort,

            KeyCode::Enter => PromptAction::Submit(std::mem::take(&mut self.buffer)),

            // Text input
            KeyCode::Char(c) if !ctrl => {
                self.buffer.push(c);
                PromptAction::Continue
            }

            KeyCode::Backspace => {
                self.buffer.pop();
                PromptAction::Continue
            }

            _ => PromptAction::Continue,
        }
    }

    /// The prompt line as shown: label then input.
    pub fn line(&self) -> String {
        format!("{}{}", self.label, self.buffer)
    }
}

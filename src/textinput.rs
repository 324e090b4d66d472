//! A single-line text input, used by the note panel.
//!
//! Supports a prompt, placeholder text, an optional character limit, and an
//! optional display width. Editing keys are declared as [`key::Binding`]s so
//! the note panel can surface them in help. Deliberately single-purpose:
//! no suggestions, echo modes, or clipboard — the note field needs none of
//! them.

use crate::cursor::Model as Cursor;
use crate::key::{self, Binding};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;
use unicode_width::UnicodeWidthStr;

/// Key bindings for editing within the input.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Move the cursor one character right.
    pub character_forward: Binding,
    /// Move the cursor one character left.
    pub character_backward: Binding,
    /// Move to the start of the line.
    pub line_start: Binding,
    /// Move to the end of the line.
    pub line_end: Binding,
    /// Delete the character before the cursor.
    pub delete_character_backward: Binding,
    /// Delete the character under the cursor.
    pub delete_character_forward: Binding,
    /// Delete from the start of the line to the cursor.
    pub delete_before_cursor: Binding,
    /// Delete from the cursor to the end of the line.
    pub delete_after_cursor: Binding,
}

/// The default editing key bindings.
pub fn default_key_map() -> KeyMap {
    KeyMap {
        character_forward: key::new_binding(vec![key::with_keys_str(&["right", "ctrl+f"])]),
        character_backward: key::new_binding(vec![key::with_keys_str(&["left", "ctrl+b"])]),
        line_start: key::new_binding(vec![key::with_keys_str(&["home", "ctrl+a"])]),
        line_end: key::new_binding(vec![key::with_keys_str(&["end", "ctrl+e"])]),
        delete_character_backward: key::new_binding(vec![key::with_keys_str(&[
            "backspace", "ctrl+h",
        ])]),
        delete_character_forward: key::new_binding(vec![key::with_keys_str(&["delete", "ctrl+d"])]),
        delete_before_cursor: key::new_binding(vec![key::with_keys_str(&["ctrl+u"])]),
        delete_after_cursor: key::new_binding(vec![key::with_keys_str(&["ctrl+k"])]),
    }
}

/// The text input model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Prompt rendered before the text, e.g. `"> "`.
    pub prompt: String,
    /// Style for the prompt.
    pub prompt_style: Style,
    /// Style for typed text.
    pub text_style: Style,
    /// Placeholder shown while the input is empty.
    pub placeholder: String,
    /// Style for the placeholder.
    pub placeholder_style: Style,
    /// The caret.
    pub cursor: Cursor,
    /// Display width in cells; 0 means unconstrained.
    pub width: usize,
    /// Maximum number of characters accepted; 0 means no limit.
    pub char_limit: usize,
    /// Editing key bindings.
    pub key_map: KeyMap,

    value: Vec<char>,
    pos: usize,
    focus: bool,
}

/// Creates a text input with default settings.
pub fn new() -> Model {
    Model {
        prompt: "> ".to_string(),
        prompt_style: Style::new(),
        text_style: Style::new(),
        placeholder: String::new(),
        placeholder_style: Style::new().foreground(Color::from("240")),
        cursor: Cursor::new(),
        width: 0,
        char_limit: 0,
        key_map: default_key_map(),
        value: Vec::new(),
        pos: 0,
        focus: false,
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// Builder: sets the placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Builder: sets the display width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Builder: sets the character limit.
    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    /// Returns the current text.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// Replaces the current text, clamping to the character limit and
    /// moving the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into().chars().collect();
        if self.char_limit > 0 && self.value.len() > self.char_limit {
            self.value.truncate(self.char_limit);
        }
        self.pos = self.value.len();
    }

    /// Clears the text.
    pub fn reset(&mut self) {
        self.value.clear();
        self.pos = 0;
    }

    /// Handles key and blink messages.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if !self.focus {
                return None;
            }

            if self.key_map.character_backward.matches(key_msg) {
                self.pos = self.pos.saturating_sub(1);
            } else if self.key_map.character_forward.matches(key_msg) {
                self.pos = (self.pos + 1).min(self.value.len());
            } else if self.key_map.line_start.matches(key_msg) {
                self.pos = 0;
            } else if self.key_map.line_end.matches(key_msg) {
                self.pos = self.value.len();
            } else if self.key_map.delete_character_backward.matches(key_msg) {
                if self.pos > 0 {
                    self.value.remove(self.pos - 1);
                    self.pos -= 1;
                }
            } else if self.key_map.delete_character_forward.matches(key_msg) {
                if self.pos < self.value.len() {
                    self.value.remove(self.pos);
                }
            } else if self.key_map.delete_before_cursor.matches(key_msg) {
                self.value.drain(..self.pos);
                self.pos = 0;
            } else if self.key_map.delete_after_cursor.matches(key_msg) {
                self.value.truncate(self.pos);
            } else if let KeyCode::Char(c) = key_msg.key {
                let mods = key_msg.modifiers & !KeyModifiers::SHIFT;
                if mods.is_empty() {
                    self.insert_char(c);
                }
            }

            return None;
        }

        self.cursor.update(msg)
    }

    fn insert_char(&mut self, c: char) {
        if self.char_limit > 0 && self.value.len() >= self.char_limit {
            return;
        }
        self.value.insert(self.pos, c);
        self.pos += 1;
    }

    /// Renders the input.
    pub fn view(&self) -> String {
        if self.value.is_empty() {
            return self.placeholder_view();
        }

        let pos = self.pos.min(self.value.len());
        let before: String = self.value[..pos].iter().collect();
        let mut v = self.text_style.render(&before);

        if self.focus {
            let mut cur = self.cursor.clone();
            if pos < self.value.len() {
                cur.set_char(&self.value[pos].to_string());
                v.push_str(&cur.view());
                let after: String = self.value[pos + 1..].iter().collect();
                v.push_str(&self.text_style.render(&after));
            } else {
                cur.set_char(" ");
                v.push_str(&cur.view());
            }
        } else if pos < self.value.len() {
            let after: String = self.value[pos..].iter().collect();
            v.push_str(&self.text_style.render(&after));
        }

        let value: String = self.value.iter().collect();
        let mut shown = value.width();
        if self.focus && pos == self.value.len() {
            shown += 1; // end-of-line caret cell
        }
        if self.width > shown {
            v.push_str(&" ".repeat(self.width - shown));
        }

        format!("{}{}", self.prompt_style.render(&self.prompt), v)
    }

    fn placeholder_view(&self) -> String {
        let chars: Vec<char> = self.placeholder.chars().collect();
        let mut v = String::new();

        if self.focus {
            let mut cur = self.cursor.clone();
            cur.set_char(&chars.first().map_or(" ".to_string(), |c| c.to_string()));
            v.push_str(&cur.view());
            if chars.len() > 1 {
                let rest: String = chars[1..].iter().collect();
                v.push_str(&self.placeholder_style.render(&rest));
            }
        } else {
            v.push_str(&self.placeholder_style.render(&self.placeholder));
        }

        let shown = self.placeholder.width().max(usize::from(self.focus));
        if self.width > shown {
            v.push_str(&" ".repeat(self.width - shown));
        }

        format!("{}{}", self.prompt_style.render(&self.prompt), v)
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        self.cursor.focus()
    }

    fn blur(&mut self) {
        self.focus = false;
        self.cursor.blur();
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut Model, code: KeyCode) {
        let msg: Msg = Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        });
        let _ = input.update(&msg);
    }

    fn press_ctrl(input: &mut Model, c: char) {
        let msg: Msg = Box::new(KeyMsg {
            key: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        });
        let _ = input.update(&msg);
    }

    fn type_str(input: &mut Model, s: &str) {
        for c in s.chars() {
            press(input, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let mut input = new();
        let _ = input.focus();
        type_str(&mut input, "dentist");
        assert_eq!(input.value(), "dentist");

        press(&mut input, KeyCode::Home);
        type_str(&mut input, "the ");
        assert_eq!(input.value(), "the dentist");
    }

    #[test]
    fn test_blurred_input_ignores_keys() {
        let mut input = new();
        type_str(&mut input, "ignored");
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = new();
        let _ = input.focus();
        type_str(&mut input, "note");
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "not");

        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Delete);
        assert_eq!(input.value(), "ot");
    }

    #[test]
    fn test_kill_line_bindings() {
        let mut input = new();
        let _ = input.focus();
        type_str(&mut input, "hello world");
        press(&mut input, KeyCode::Home);
        for _ in 0..5 {
            press(&mut input, KeyCode::Right);
        }

        press_ctrl(&mut input, 'k');
        assert_eq!(input.value(), "hello");

        press_ctrl(&mut input, 'u');
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_char_limit() {
        let mut input = new().with_char_limit(3);
        let _ = input.focus();
        type_str(&mut input, "abcdef");
        assert_eq!(input.value(), "abc");

        input.set_value("overflow");
        assert_eq!(input.value(), "ove");
    }

    #[test]
    fn test_control_characters_are_not_inserted() {
        let mut input = new();
        let _ = input.focus();
        press_ctrl(&mut input, 'x');
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_placeholder_renders_when_empty() {
        let mut input = new().with_placeholder("what's the occasion?");
        let view = input.view();
        assert!(view.contains("what's the occasion?"));

        let _ = input.focus();
        type_str(&mut input, "x");
        assert!(!input.view().contains("what's the occasion?"));
    }

    #[test]
    fn test_reset_clears_value() {
        let mut input = new();
        input.set_value("leftover");
        input.reset();
        assert_eq!(input.value(), "");
        assert_eq!(input.pos, 0);
    }
}

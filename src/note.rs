//! The note panel: a free-text label for the countdown, behind a
//! show/hide toggle.
//!
//! The panel wraps a [`textinput`](crate::textinput) field. Opening it
//! focuses the field; Enter commits the field's text as the note label and
//! closes the panel; Esc closes without committing. The field keeps its
//! text across open/close, so re-opening resumes the previous draft.
//!
//! The note is pure decoration: it never touches countdown state.

use crate::key::{self, Binding, KeyMap as KeyMapTrait};
use crate::textinput;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Key bindings active while the panel is open.
#[derive(Debug, Clone)]
pub struct NoteKeyMap {
    /// Commit the field as the note label and close the panel.
    pub confirm: Binding,
    /// Close the panel without committing.
    pub cancel: Binding,
}

impl Default for NoteKeyMap {
    fn default() -> Self {
        Self {
            confirm: key::new_binding(vec![
                key::with_keys_str(&["enter"]),
                key::with_help("enter", "save note"),
            ]),
            cancel: key::new_binding(vec![
                key::with_keys_str(&["esc"]),
                key::with_help("esc", "close"),
            ]),
        }
    }
}

impl KeyMapTrait for NoteKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.confirm, &self.cancel]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![vec![&self.confirm, &self.cancel]]
    }
}

/// Styles for the panel and the committed label.
#[derive(Debug, Clone)]
pub struct Styles {
    /// The open panel, accented with a left border.
    pub panel: Style,
    /// The panel title.
    pub title: Style,
    /// The hint line under the input.
    pub hint: Style,
    /// The committed note label.
    pub label: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        Self {
            panel: Style::new()
                .border_style(lipgloss::normal_border())
                .border_left(true)
                .border_left_foreground(Color::from("#AD58B4"))
                .padding(0, 0, 0, 1),
            title: Style::new().bold(true),
            hint: Style::new().foreground(AdaptiveColor {
                Light: "#B2B2B2",
                Dark: "#4A4A4A",
            }),
            label: Style::new().foreground(Color::from("#AD58B4")),
        }
    }
}

/// The note panel model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Key bindings.
    pub keymap: NoteKeyMap,
    /// Styles.
    pub styles: Styles,

    input: textinput::Model,
    note: String,
    open: bool,
}

/// Creates a closed, empty note panel.
pub fn new() -> Model {
    Model {
        keymap: NoteKeyMap::default(),
        styles: Styles::default(),
        input: textinput::new()
            .with_placeholder("what's the occasion?")
            .with_width(32)
            .with_char_limit(64),
        note: String::new(),
        open: false,
    }
}

impl Default for Model {
    fn default() -> Self {
        new()
    }
}

impl Model {
    /// Returns whether the panel is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the committed note label.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Sets the committed note label directly (used by the CLI prefill).
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Shows the panel and focuses the field; the returned command starts
    /// the cursor blinking.
    pub fn open(&mut self) -> Option<Cmd> {
        self.open = true;
        self.input.focus()
    }

    /// Hides the panel without committing.
    pub fn close(&mut self) {
        self.open = false;
        self.input.blur();
    }

    /// Empties the edit field. The committed label is left alone; reset
    /// only touches the draft.
    pub fn clear_input(&mut self) {
        self.input.reset();
    }

    /// Handles panel keys while open, then forwards to the field.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if self.open {
            if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
                if self.keymap.confirm.matches(key_msg) {
                    self.note = self.input.value();
                    self.close();
                    return None;
                }
                if self.keymap.cancel.matches(key_msg) {
                    self.close();
                    return None;
                }
            }
        }

        self.input.update(msg)
    }

    /// Renders the open panel; empty while closed.
    pub fn view(&self) -> String {
        if !self.open {
            return String::new();
        }

        let hint = format!(
            "{} {} • {} {}",
            self.keymap.confirm.help().key,
            self.keymap.confirm.help().desc,
            self.keymap.cancel.help().key,
            self.keymap.cancel.help().desc,
        );
        let body = format!(
            "{}\n{}\n{}",
            self.styles.title.render("Add a note"),
            self.input.view(),
            self.styles.hint.render(&hint),
        );
        self.styles.panel.render(&body)
    }

    /// Renders the committed label; empty when no note is set.
    pub fn label_view(&self) -> String {
        if self.note.is_empty() {
            return String::new();
        }
        self.styles.label.render(&self.note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(panel: &mut Model, code: KeyCode) {
        let msg: Msg = Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        });
        let _ = panel.update(&msg);
    }

    fn type_str(panel: &mut Model, s: &str) {
        for c in s.chars() {
            press(panel, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_starts_closed_and_empty() {
        let panel = new();
        assert!(!panel.is_open());
        assert_eq!(panel.note(), "");
        assert_eq!(panel.view(), "");
    }

    #[test]
    fn test_enter_commits_and_closes() {
        let mut panel = new();
        let _ = panel.open();
        type_str(&mut panel, "dentist");
        press(&mut panel, KeyCode::Enter);

        assert!(!panel.is_open());
        assert_eq!(panel.note(), "dentist");
        assert!(panel.label_view().contains("dentist"));
    }

    #[test]
    fn test_esc_closes_without_committing() {
        let mut panel = new();
        let _ = panel.open();
        type_str(&mut panel, "draft");
        press(&mut panel, KeyCode::Esc);

        assert!(!panel.is_open());
        assert_eq!(panel.note(), "");

        // The draft survives; re-opening resumes it.
        let _ = panel.open();
        press(&mut panel, KeyCode::Enter);
        assert_eq!(panel.note(), "draft");
    }

    #[test]
    fn test_clear_input_spares_the_label() {
        let mut panel = new();
        let _ = panel.open();
        type_str(&mut panel, "party");
        press(&mut panel, KeyCode::Enter);

        panel.clear_input();
        assert_eq!(panel.note(), "party");

        let _ = panel.open();
        press(&mut panel, KeyCode::Enter);
        assert_eq!(panel.note(), "");
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut panel = new();
        type_str(&mut panel, "nope");
        press(&mut panel, KeyCode::Enter);
        assert_eq!(panel.note(), "");
    }

    #[test]
    fn test_view_shows_input_while_open() {
        let mut panel = new();
        let _ = panel.open();
        assert!(panel.view().contains("Add a note"));
    }
}

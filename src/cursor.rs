//! A blinking text cursor for the note input.
//!
//! The cursor is a sub-component: it is embedded in a text input and
//! updated by forwarding messages to it. Blinking is driven by the same
//! self-renewing tick discipline as the countdown chain, with an `id`/`tag`
//! pair so a cursor only honors blink messages minted for its current
//! blink cycle.

use bubbletea_rs::{tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed)
}

const DEFAULT_BLINK_SPEED: Duration = Duration::from_millis(530);

/// Message that flips the cursor's blink state.
#[derive(Debug, Clone)]
pub struct BlinkMsg {
    /// Identifier of the cursor instance this message targets.
    pub id: usize,
    /// Blink-cycle tag; stale cycles are rejected.
    pub tag: usize,
}

/// How the cursor renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The cursor blinks while focused.
    Blink,
    /// The cursor is shown steadily.
    Static,
    /// The cursor is not shown.
    Hide,
}

/// The cursor model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Time between blink flips.
    pub blink_speed: Duration,
    /// Style of the cursor block when shown.
    pub style: Style,
    /// Style of the character underneath while the block is hidden.
    pub text_style: Style,

    char: String,
    id: usize,
    focus: bool,
    // When `blink` is true the block is in its hidden half-cycle.
    blink: bool,
    blink_tag: usize,
    mode: Mode,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            blink_speed: DEFAULT_BLINK_SPEED,
            style: Style::new(),
            text_style: Style::new(),
            char: " ".to_string(),
            id: next_id(),
            focus: false,
            blink: true,
            blink_tag: 0,
            mode: Mode::Blink,
        }
    }
}

/// Creates a cursor with default settings.
pub fn new() -> Model {
    Model::default()
}

impl Model {
    /// Creates a cursor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles blink messages; everything else is ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(blink_msg) = msg.downcast_ref::<BlinkMsg>() {
            if self.mode != Mode::Blink || !self.focus {
                return None;
            }
            if blink_msg.id != self.id || blink_msg.tag != self.blink_tag {
                return None;
            }

            self.blink = !self.blink;
            return self.blink_cmd();
        }

        None
    }

    /// Returns the cursor's render mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Sets the render mode, restarting the blink cycle if needed.
    pub fn set_mode(&mut self, mode: Mode) -> Option<Cmd> {
        self.mode = mode;
        self.blink = self.mode == Mode::Hide || !self.focus;
        if mode == Mode::Blink && self.focus {
            return self.blink_cmd();
        }
        None
    }

    fn blink_cmd(&mut self) -> Option<Cmd> {
        if self.mode != Mode::Blink {
            return None;
        }

        self.blink_tag += 1;
        let tag = self.blink_tag;
        let id = self.id;
        let speed = self.blink_speed;

        Some(tick(speed, move |_| Box::new(BlinkMsg { id, tag }) as Msg))
    }

    /// Focuses the cursor; starts blinking in blink mode.
    pub fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        self.blink = self.mode == Mode::Hide;
        if self.mode == Mode::Blink {
            return self.blink_cmd();
        }
        None
    }

    /// Blurs the cursor.
    pub fn blur(&mut self) {
        self.focus = false;
        self.blink = true;
    }

    /// Returns whether the cursor is focused.
    pub fn focused(&self) -> bool {
        self.focus
    }

    /// Sets the character under the cursor.
    pub fn set_char(&mut self, s: &str) {
        self.char = s.to_string();
    }

    /// Renders the cursor.
    pub fn view(&self) -> String {
        if self.mode == Mode::Hide || self.blink {
            return self.text_style.clone().inline(true).render(&self.char);
        }
        self.style
            .clone()
            .inline(true)
            .reverse(true)
            .render(&self.char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_cmd_captures_current_tag() {
        let mut m = Model::new();
        m.mode = Mode::Blink;
        m.focus = true;

        let _cmd1 = m.blink_cmd().expect("cmd1");
        let first_tag = m.blink_tag;
        let _cmd2 = m.blink_cmd().expect("cmd2");

        // Each cycle gets its own tag, so the first command's message is
        // stale by the time the second cycle is live.
        assert_ne!(first_tag, m.blink_tag);
    }

    #[test]
    fn test_stale_blink_is_rejected() {
        let mut m = Model::new();
        m.focus = true;
        let _cmd = m.blink_cmd();

        let stale = BlinkMsg {
            id: m.id,
            tag: m.blink_tag + 1,
        };
        assert!(m.update(&(Box::new(stale) as Msg)).is_none());
    }

    #[test]
    fn test_blur_hides_block() {
        let mut m = Model::new();
        let _ = m.focus();
        m.blur();
        assert!(!m.focused());
        assert!(m.blink);
    }
}

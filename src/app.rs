//! The application model: one screen composing the countdown controller,
//! the date/time picker, the note panel, and the help bar.
//!
//! Key routing is layered: Ctrl+C always quits; while the note panel is
//! open every other key belongs to it; otherwise the app-level bindings are
//! checked and anything left over goes to the picker. Non-key messages are
//! ticks (for the countdown) and cursor blinks (for the note field).

use crate::countdown::{self, Phase};
use crate::datepicker;
use crate::help;
use crate::key::{self, Binding, KeyMap as KeyMapTrait};
use crate::note;
use crate::Component;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use chrono::{DateTime, Local};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use once_cell::sync::OnceCell;

/// Startup options handed from the CLI to [`App::init`].
///
/// `bubbletea_rs::Model::init` takes no arguments, so `main` parks the
/// parsed flags here before starting the program.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Pre-selected target instant; must already be validated as future.
    pub target: Option<DateTime<Local>>,
    /// Pre-filled note label.
    pub note: Option<String>,
}

/// The one-time cell `main` fills before the program starts.
pub static OPTIONS: OnceCell<Options> = OnceCell::new();

/// Top-level key bindings.
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    /// Commit the picker's value as the countdown target.
    pub select: Binding,
    /// Open the note panel.
    pub edit_note: Binding,
    /// Clear the target and snap the picker back to now.
    pub reset: Binding,
    /// Toggle the expanded help view.
    pub toggle_help: Binding,
    /// Quit (outside the note panel).
    pub quit: Binding,
    /// Quit from anywhere, including the note panel.
    pub force_quit: Binding,
}

impl Default for AppKeyMap {
    fn default() -> Self {
        Self {
            select: key::new_binding(vec![
                key::with_keys_str(&["enter"]),
                key::with_help("enter", "set target"),
            ]),
            edit_note: key::new_binding(vec![
                key::with_keys_str(&["n"]),
                key::with_help("n", "note"),
            ]),
            reset: key::new_binding(vec![
                key::with_keys_str(&["r"]),
                key::with_help("r", "reset"),
            ]),
            toggle_help: key::new_binding(vec![
                key::with_keys_str(&["?"]),
                key::with_help("?", "more"),
            ]),
            quit: key::new_binding(vec![
                key::with_keys_str(&["q"]),
                key::with_help("q", "quit"),
            ]),
            force_quit: key::new_binding(vec![
                key::with_keys_str(&["ctrl+c"]),
                key::with_help("ctrl+c", "quit"),
            ]),
        }
    }
}

/// Styles for the screen.
#[derive(Debug, Clone)]
pub struct Styles {
    /// The program title.
    pub title: Style,
    /// The row labels.
    pub label: Style,
    /// The time readouts.
    pub value: Style,
    /// Countdown line with no target selected.
    pub countdown_idle: Style,
    /// Countdown line while counting.
    pub countdown_counting: Style,
    /// Countdown line once finished.
    pub countdown_finished: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        Self {
            title: Style::new()
                .bold(true)
                .foreground(Color::from("#AD58B4"))
                .padding(0, 1, 0, 1),
            label: Style::new().foreground(AdaptiveColor {
                Light: "#909090",
                Dark: "#626262",
            }),
            value: Style::new(),
            countdown_idle: Style::new().foreground(AdaptiveColor {
                Light: "#B2B2B2",
                Dark: "#4A4A4A",
            }),
            countdown_counting: Style::new().bold(true).foreground(Color::from("#04B575")),
            countdown_finished: Style::new().bold(true).foreground(Color::from("#FF5F87")),
        }
    }
}

/// The application model.
pub struct App {
    countdown: countdown::Model,
    picker: datepicker::Model,
    note: note::Model,
    help: help::Model,
    keymap: AppKeyMap,
    styles: Styles,
}

impl App {
    fn select_target(&mut self) -> Option<Cmd> {
        let now = Local::now();
        let candidate = self.picker.value();
        if candidate <= now {
            // The floor lags the wall clock by at most one tick; re-clamp
            // instead of selecting an instantly-finished target.
            self.picker.set_min(now);
            return None;
        }
        log::info!("target selected: {}", candidate);
        Some(self.countdown.select_target_at(candidate, now))
    }

    fn reset(&mut self) -> Cmd {
        let now = Local::now();
        self.picker.reset(now);
        self.note.clear_input();
        log::info!("countdown reset");
        self.countdown.reset()
    }
}

impl KeyMapTrait for App {
    fn short_help(&self) -> Vec<&Binding> {
        if self.note.is_open() {
            vec![&self.note.keymap.confirm, &self.note.keymap.cancel]
        } else {
            vec![
                &self.keymap.select,
                &self.keymap.edit_note,
                &self.keymap.reset,
                &self.keymap.toggle_help,
                &self.keymap.quit,
            ]
        }
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![
                &self.picker.keymap.prev_field,
                &self.picker.keymap.next_field,
                &self.picker.keymap.increment,
                &self.picker.keymap.decrement,
            ],
            vec![
                &self.keymap.select,
                &self.keymap.edit_note,
                &self.keymap.reset,
            ],
            vec![
                &self.keymap.toggle_help,
                &self.keymap.quit,
                &self.keymap.force_quit,
            ],
        ]
    }
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let options = OPTIONS.get().cloned().unwrap_or_default();
        let now = Local::now();

        let mut countdown = countdown::new();
        let mut picker = datepicker::new(now);
        let _ = picker.focus();

        let mut note = note::new();
        if let Some(text) = options.note {
            note.set_note(text);
        }

        let cmd = match options.target {
            Some(target) => {
                log::info!("starting with target {}", target);
                countdown.select_target_at(target, now)
            }
            None => countdown.init(),
        };

        let app = App {
            countdown,
            picker,
            note,
            help: help::new(),
            keymap: AppKeyMap::default(),
            styles: Styles::default(),
        };
        (app, Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.help.width = size.width as usize;
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.force_quit.matches(key_msg) {
                return Some(quit());
            }
            if self.note.is_open() {
                let cmd = self.note.update(&msg);
                if !self.note.is_open() {
                    // The panel closed itself; give the keyboard back.
                    let _ = self.picker.focus();
                }
                return cmd;
            }
            if self.keymap.quit.matches(key_msg) {
                return Some(quit());
            }
            if self.keymap.select.matches(key_msg) {
                return self.select_target();
            }
            if self.keymap.edit_note.matches(key_msg) {
                self.picker.blur();
                return self.note.open();
            }
            if self.keymap.reset.matches(key_msg) {
                return Some(self.reset());
            }
            if self.keymap.toggle_help.matches(key_msg) {
                self.help.show_all = !self.help.show_all;
                return None;
            }
            return self.picker.update(&msg);
        }

        if msg.downcast_ref::<countdown::TickMsg>().is_some() {
            let was_running = self.countdown.is_running();
            let cmd = self.countdown.update(&msg);
            // Keep the "not before now" floor anchored to the wall clock.
            self.picker.set_min(self.countdown.now());
            if was_running && !self.countdown.is_running() {
                log::info!("countdown finished at {}", self.countdown.now());
            }
            return cmd;
        }

        // Cursor blinks belong to the note field.
        self.note.update(&msg)
    }

    fn view(&self) -> String {
        let countdown_style = match self.countdown.phase() {
            Phase::Idle => &self.styles.countdown_idle,
            Phase::Counting => &self.styles.countdown_counting,
            Phase::Finished => &self.styles.countdown_finished,
        };

        let mut lines = vec![
            self.styles.title.render("datedown"),
            String::new(),
            format!(
                "{} {}",
                self.styles.label.render("Current Time:"),
                self.styles.value.render(&self.countdown.current_time_view()),
            ),
            format!(
                "{} {}",
                self.styles.label.render("Target Time: "),
                self.styles.value.render(&self.countdown.selected_time_view()),
            ),
            format!(
                "{} {}",
                self.styles.label.render("Countdown:   "),
                countdown_style.render(&self.countdown.view()),
            ),
        ];

        let note_label = self.note.label_view();
        if !note_label.is_empty() {
            lines.push(format!(
                "{} {}",
                self.styles.label.render("Note:        "),
                note_label,
            ));
        }

        lines.push(String::new());
        lines.push(self.picker.view());

        if self.note.is_open() {
            lines.push(String::new());
            lines.push(self.note.view());
        }

        lines.push(String::new());
        lines.push(self.help.view(self));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(app: &mut App, code: KeyCode) -> Option<Cmd> {
        app.update(Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }))
    }

    #[test]
    fn test_init_shows_placeholders() {
        let (app, cmd) = App::init();
        assert!(cmd.is_some());
        let view = app.view();
        assert!(view.contains(countdown::SELECT_PROMPT));
        assert!(view.contains(countdown::NO_TIME_SELECTED));
    }

    #[test]
    fn test_select_picks_a_future_target() {
        let (mut app, _) = App::init();
        // Navigate to the year segment and step it forward, so the
        // candidate is future regardless of the current date.
        let _ = press(&mut app, KeyCode::Left);
        let _ = press(&mut app, KeyCode::Left);
        let _ = press(&mut app, KeyCode::Up);
        let cmd = press(&mut app, KeyCode::Enter);

        assert!(cmd.is_some());
        assert_eq!(app.countdown.phase(), Phase::Counting);
        assert!(!app.view().contains(countdown::SELECT_PROMPT));
    }

    #[test]
    fn test_reset_restores_placeholders() {
        let (mut app, _) = App::init();
        let _ = press(&mut app, KeyCode::Left);
        let _ = press(&mut app, KeyCode::Left);
        let _ = press(&mut app, KeyCode::Up);
        let _ = press(&mut app, KeyCode::Enter);
        assert_eq!(app.countdown.phase(), Phase::Counting);

        let cmd = press(&mut app, KeyCode::Char('r'));
        assert!(cmd.is_some());
        assert_eq!(app.countdown.phase(), Phase::Idle);
        assert!(app.view().contains(countdown::SELECT_PROMPT));
    }

    #[test]
    fn test_note_panel_captures_keys() {
        let (mut app, _) = App::init();
        let _ = press(&mut app, KeyCode::Char('n'));
        assert!(app.note.is_open());

        // 'q' is typed into the field, not treated as quit.
        let cmd = press(&mut app, KeyCode::Char('q'));
        assert!(cmd.is_none());
        assert!(app.note.is_open());

        let _ = press(&mut app, KeyCode::Enter);
        assert!(!app.note.is_open());
        assert_eq!(app.note.note(), "q");
    }

    #[test]
    fn test_quit_key_outside_note_panel() {
        let (mut app, _) = App::init();
        assert!(press(&mut app, KeyCode::Char('q')).is_some());
    }

    #[test]
    fn test_help_toggle() {
        let (mut app, _) = App::init();
        assert!(!app.help.show_all);
        let _ = press(&mut app, KeyCode::Char('?'));
        assert!(app.help.show_all);
        let _ = press(&mut app, KeyCode::Char('?'));
        assert!(!app.help.show_all);
    }

    #[test]
    fn test_window_size_sets_help_width() {
        let (mut app, _) = App::init();
        let _ = app.update(Box::new(WindowSizeMsg {
            width: 100,
            height: 40,
        }));
        assert_eq!(app.help.width, 100);
    }
}

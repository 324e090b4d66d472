#![warn(missing_docs)]

//! # datedown
//!
//! A single-screen terminal countdown built with
//! [bubbletea-rs](https://github.com/whit3rabbit/bubbletea-rs): pick a
//! future date and time with an inline segmented picker, optionally label
//! it with a short note, and watch the countdown update once per second
//! next to a live clock.
//!
//! Every screen element is a self-contained component following the Elm
//! Architecture — `init()`, `update()`, `view()` — and all timing is
//! expressed as commands that resolve to messages, so the whole state
//! machine can be driven by hand in tests.
//!
//! ## Components
//!
//! - [`countdown`] — the countdown controller: target instant, phase
//!   machine, and the once-per-second tick chain
//! - [`datepicker`] — segmented date/time picker that never offers an
//!   instant in the past
//! - [`note`] — free-text note panel behind a show/hide toggle
//! - [`textinput`] — single-line text input backing the note panel
//! - [`clock`] — shared timestamp formatting and calendar-aware
//!   differences
//! - [`key`] / [`help`] — type-safe key bindings and the help bar they
//!   feed
//! - [`app`] — the application model wiring it all together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bubbletea_rs::Program;
//! use datedown::app::App;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let program = Program::<App>::builder()
//!     .alt_screen(true)
//!     .signal_handler(true)
//!     .build()?;
//! program.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod clock;
pub mod countdown;
pub mod cursor;
pub mod datepicker;
pub mod help;
pub mod key;
pub mod note;
pub mod textinput;

use bubbletea_rs::Cmd;

/// Focus management for components that take keyboard input.
///
/// Only one component accepts keys at a time; the application model blurs
/// one component and focuses another as the user moves between the picker
/// and the note field.
pub trait Component {
    /// Focuses the component. May return a command, e.g. to start a
    /// cursor blinking.
    fn focus(&mut self) -> Option<Cmd>;

    /// Blurs the component.
    fn blur(&mut self);

    /// Returns whether the component is focused.
    fn focused(&self) -> bool;
}

pub use app::App;
pub use clock::{calendar_diff, format_timestamp, CalendarDiff};
pub use countdown::{
    new as countdown_new, Model as Countdown, Phase as CountdownPhase,
    TickMsg as CountdownTickMsg, TimerAction,
};
pub use datepicker::{new as datepicker_new, Field as DatePickerField, Model as DatePicker};
pub use help::Model as HelpModel;
pub use key::{
    matches, matches_binding, new_binding, with_disabled, with_help, with_keys, with_keys_str,
    Binding, KeyMap, KeyPress,
};
pub use note::{new as note_new, Model as NotePanel};
pub use textinput::{new as textinput_new, Model as TextInput};

/// Prelude for convenient imports.
///
/// ```rust
/// use datedown::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::App;
    pub use crate::clock::{calendar_diff, format_timestamp, CalendarDiff};
    pub use crate::countdown::{
        new as countdown_new, Model as Countdown, Phase as CountdownPhase, TimerAction,
    };
    pub use crate::datepicker::{new as datepicker_new, Model as DatePicker};
    pub use crate::help::Model as HelpModel;
    pub use crate::key::{
        matches, matches_binding, new_binding, with_disabled, with_help, with_keys, with_keys_str,
        Binding, KeyMap, KeyPress,
    };
    pub use crate::note::{new as note_new, Model as NotePanel};
    pub use crate::textinput::{new as textinput_new, Model as TextInput};
    pub use crate::Component;
}

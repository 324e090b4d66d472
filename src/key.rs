//! Type-safe key bindings with attached help metadata.
//!
//! A [`Binding`] couples one or more key presses with the short help text
//! shown in the help bar. Components declare their bindings in a keymap
//! struct and match incoming [`KeyMsg`]s against them, so the keys a
//! component reacts to and the keys it advertises can never drift apart.
//!
//! ### Example
//! ```rust
//! use datedown::key;
//!
//! struct AppKeys {
//!     quit: key::Binding,
//! }
//!
//! let keys = AppKeys {
//!     quit: key::new_binding(vec![
//!         key::with_keys_str(&["q", "ctrl+c"]),
//!         key::with_help("q", "quit"),
//!     ]),
//! };
//! assert_eq!(keys.quit.help().key, "q");
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key press: a key code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key code to match.
    pub code: KeyCode,
    /// Modifiers that must accompany the key.
    pub mods: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::empty(),
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, mods): (KeyCode, KeyModifiers)) -> Self {
        Self { code, mods }
    }
}

/// Help metadata for a binding: the key label and what it does.
#[derive(Debug, Clone, Default)]
pub struct Help {
    /// Short label for the key, e.g. `"↑/k"`.
    pub key: String,
    /// Description of the action, e.g. `"increment"`.
    pub desc: String,
}

/// A key binding: the key presses that trigger it, its help text, and
/// whether it is currently enabled.
///
/// Disabled bindings never match and are skipped by the help bar.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from a list of key presses.
    pub fn new<T: Into<KeyPress>>(keys: Vec<T>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Attaches help text to the binding.
    pub fn with_help(mut self, key: &str, desc: &str) -> Self {
        self.help = Help {
            key: key.to_string(),
            desc: desc.to_string(),
        };
        self
    }

    /// Returns the binding's help metadata.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Returns whether the binding is currently active.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Reports whether the given key message triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|kp| key_press_matches(kp, msg))
    }
}

fn key_press_matches(kp: &KeyPress, msg: &KeyMsg) -> bool {
    if kp.code != msg.key {
        return false;
    }
    // Terminals disagree on whether printable characters and back-tab carry
    // an explicit SHIFT; the character already encodes it.
    let ignore = match msg.key {
        KeyCode::Char(_) | KeyCode::BackTab => KeyModifiers::SHIFT,
        _ => KeyModifiers::empty(),
    };
    (kp.mods | ignore) == (msg.modifiers | ignore)
}

/// A deferred configuration step for [`new_binding`].
pub struct BindingOpt(Box<dyn FnOnce(&mut Binding)>);

/// Creates a binding from a list of options.
///
/// ```rust
/// use datedown::key::{new_binding, with_keys_str, with_help};
///
/// let up = new_binding(vec![
///     with_keys_str(&["up", "k"]),
///     with_help("↑/k", "increment"),
/// ]);
/// assert!(up.enabled());
/// ```
pub fn new_binding(opts: Vec<BindingOpt>) -> Binding {
    let mut binding = Binding {
        keys: Vec::new(),
        help: Help::default(),
        disabled: false,
    };
    for opt in opts {
        (opt.0)(&mut binding);
    }
    binding
}

/// Option: set the binding's keys from explicit key presses.
pub fn with_keys<T: Into<KeyPress>>(keys: Vec<T>) -> BindingOpt {
    let keys: Vec<KeyPress> = keys.into_iter().map(Into::into).collect();
    BindingOpt(Box::new(move |b| b.keys = keys))
}

/// Option: set the binding's keys from string names.
///
/// Accepts names like `"up"`, `"enter"`, `"q"`, and modifier combinations
/// like `"ctrl+c"`, `"alt+d"`, or `"shift+tab"`. Unrecognized names are
/// dropped.
pub fn with_keys_str(keys: &[&str]) -> BindingOpt {
    let keys: Vec<KeyPress> = keys.iter().filter_map(|s| parse_key(s)).collect();
    BindingOpt(Box::new(move |b| b.keys = keys))
}

/// Option: set the binding's help text.
pub fn with_help(key: &str, desc: &str) -> BindingOpt {
    let help = Help {
        key: key.to_string(),
        desc: desc.to_string(),
    };
    BindingOpt(Box::new(move |b| b.help = help))
}

/// Option: create the binding disabled.
pub fn with_disabled() -> BindingOpt {
    BindingOpt(Box::new(|b| b.disabled = true))
}

/// Reports whether the key message triggers the given binding.
pub fn matches_binding(msg: &KeyMsg, binding: &Binding) -> bool {
    binding.matches(msg)
}

/// Reports whether the key message triggers any of the given bindings.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|b| b.matches(msg))
}

fn parse_key(s: &str) -> Option<KeyPress> {
    let mut mods = KeyModifiers::empty();
    let mut name = s;
    while let Some((prefix, rest)) = name.split_once('+') {
        match prefix {
            "ctrl" => mods |= KeyModifiers::CONTROL,
            "alt" => mods |= KeyModifiers::ALT,
            "shift" => mods |= KeyModifiers::SHIFT,
            _ => return None,
        }
        name = rest;
    }

    let code = match name {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" => KeyCode::PageUp,
        "pgdown" => KeyCode::PageDown,
        "tab" if mods.contains(KeyModifiers::SHIFT) => {
            return Some(KeyPress {
                code: KeyCode::BackTab,
                mods: KeyModifiers::empty(),
            });
        }
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyPress { code, mods })
}

/// A set of key bindings that can describe itself to the help bar.
pub trait KeyMap {
    /// The essential bindings, shown in the single-line help view.
    fn short_help(&self) -> Vec<&Binding>;

    /// All bindings, grouped into columns for the expanded help view.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(
            parse_key("left"),
            Some(KeyPress {
                code: KeyCode::Left,
                mods: KeyModifiers::empty()
            })
        );
        assert_eq!(
            parse_key("ctrl+c"),
            Some(KeyPress {
                code: KeyCode::Char('c'),
                mods: KeyModifiers::CONTROL
            })
        );
        assert_eq!(
            parse_key("shift+tab"),
            Some(KeyPress {
                code: KeyCode::BackTab,
                mods: KeyModifiers::empty()
            })
        );
        assert_eq!(parse_key("banana"), None);
    }

    #[test]
    fn test_binding_matches() {
        let b = new_binding(vec![with_keys_str(&["q", "ctrl+c"])]);
        assert!(b.matches(&key(KeyCode::Char('q'))));
        assert!(b.matches(&KeyMsg {
            key: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        }));
        assert!(!b.matches(&key(KeyCode::Char('c'))));
    }

    #[test]
    fn test_shift_is_ignored_for_characters() {
        let b = new_binding(vec![with_keys_str(&["?"])]);
        assert!(b.matches(&KeyMsg {
            key: KeyCode::Char('?'),
            modifiers: KeyModifiers::SHIFT,
        }));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut b = new_binding(vec![with_keys_str(&["r"])]);
        b.set_enabled(false);
        assert!(!b.matches(&key(KeyCode::Char('r'))));

        let b = new_binding(vec![with_keys_str(&["r"]), with_disabled()]);
        assert!(!b.matches(&key(KeyCode::Char('r'))));
    }

    #[test]
    fn test_help_text() {
        let b = new_binding(vec![
            with_keys_str(&["enter"]),
            with_help("enter", "set target"),
        ]);
        assert_eq!(b.help().key, "enter");
        assert_eq!(b.help().desc, "set target");
    }

    #[test]
    fn test_matches_any() {
        let a = new_binding(vec![with_keys_str(&["a"])]);
        let b = new_binding(vec![with_keys_str(&["b"])]);
        assert!(matches(&key(KeyCode::Char('b')), &[&a, &b]));
        assert!(!matches(&key(KeyCode::Char('x')), &[&a, &b]));
    }
}

//! A mini help bar generated from key bindings.
//!
//! Renders either a compact single line (`enter set target • n note • q
//! quit`) or an expanded multi-column view, from any type implementing
//! [`key::KeyMap`]. Disabled bindings are skipped. Width accounting is done
//! on the plain text before styles are applied, so no ANSI stripping is
//! needed.

use crate::key::{Binding, KeyMap};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use unicode_width::UnicodeWidthStr;

/// Styles for the help bar.
#[derive(Debug, Clone)]
pub struct Styles {
    /// The truncation ellipsis.
    pub ellipsis: Style,
    /// Key labels in the short view.
    pub short_key: Style,
    /// Descriptions in the short view.
    pub short_desc: Style,
    /// Separators in the short view.
    pub short_separator: Style,
    /// Key labels in the full view.
    pub full_key: Style,
    /// Descriptions in the full view.
    pub full_desc: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#909090",
            Dark: "#626262",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#B2B2B2",
            Dark: "#4A4A4A",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#DDDADA",
            Dark: "#3C3C3C",
        });

        Self {
            ellipsis: sep_style.clone(),
            short_key: key_style.clone(),
            short_desc: desc_style.clone(),
            short_separator: sep_style,
            full_key: key_style,
            full_desc: desc_style,
        }
    }
}

/// The help bar model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Toggles between the short and the expanded view.
    pub show_all: bool,
    /// Maximum width in cells; 0 means unconstrained.
    pub width: usize,
    /// Separator between items in the short view.
    pub short_separator: String,
    /// Separator between columns in the full view.
    pub full_separator: String,
    /// Marker shown when the short view is truncated.
    pub ellipsis: String,
    /// Styles.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

/// Creates a help bar with default settings.
pub fn new() -> Model {
    Model::default()
}

impl Model {
    /// Builder: sets the maximum width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders the help view for the given key map.
    pub fn view(&self, keymap: &impl KeyMap) -> String {
        if self.show_all {
            self.full_help_view(&keymap.full_help())
        } else {
            self.short_help_view(&keymap.short_help())
        }
    }

    /// Renders the single-line view, truncating with an ellipsis when the
    /// width budget runs out.
    pub fn short_help_view(&self, bindings: &[&Binding]) -> String {
        let mut out = String::new();
        let mut total_width = 0;

        for binding in bindings.iter().filter(|b| b.enabled()) {
            let sep = if out.is_empty() {
                ""
            } else {
                self.short_separator.as_str()
            };
            let item = format!("{} {}", binding.help().key, binding.help().desc);

            let item_width = sep.width() + item.width();
            if self.width > 0 && total_width + item_width > self.width {
                if total_width + self.ellipsis.width() <= self.width {
                    out.push_str(&self.styles.ellipsis.render(&self.ellipsis));
                }
                break;
            }
            total_width += item_width;

            out.push_str(&self.styles.short_separator.render(sep));
            out.push_str(&self.styles.short_key.render(&binding.help().key));
            out.push(' ');
            out.push_str(&self.styles.short_desc.render(&binding.help().desc));
        }

        out
    }

    /// Renders the multi-column view, one column per binding group.
    pub fn full_help_view(&self, groups: &[Vec<&Binding>]) -> String {
        // Lay each column out on plain text first so the rows can be
        // padded to a uniform visual width, then style per cell.
        let mut columns: Vec<Vec<(String, String)>> = Vec::new();
        for group in groups {
            let cells: Vec<(String, String)> = group
                .iter()
                .filter(|b| b.enabled())
                .map(|b| (b.help().key.clone(), b.help().desc.clone()))
                .collect();
            if !cells.is_empty() {
                columns.push(cells);
            }
        }
        if columns.is_empty() {
            return String::new();
        }

        let key_widths: Vec<usize> = columns
            .iter()
            .map(|c| c.iter().map(|(k, _)| k.width()).max().unwrap_or(0))
            .collect();
        let col_widths: Vec<usize> = columns
            .iter()
            .zip(&key_widths)
            .map(|(c, kw)| c.iter().map(|(_, d)| kw + 1 + d.width()).max().unwrap_or(0))
            .collect();

        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
        let mut lines = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut line = String::new();
            for (ci, column) in columns.iter().enumerate() {
                if ci > 0 {
                    line.push_str(&self.full_separator);
                }
                match column.get(row) {
                    Some((k, d)) => {
                        let key_pad = " ".repeat(key_widths[ci] - k.width());
                        let cell_width = key_widths[ci] + 1 + d.width();
                        line.push_str(&self.styles.full_key.render(k));
                        line.push_str(&key_pad);
                        line.push(' ');
                        line.push_str(&self.styles.full_desc.render(d));
                        line.push_str(&" ".repeat(col_widths[ci] - cell_width));
                    }
                    None => line.push_str(&" ".repeat(col_widths[ci])),
                }
            }
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{new_binding, with_disabled, with_help, with_keys_str};

    struct TestKeys {
        confirm: Binding,
        quit: Binding,
        hidden: Binding,
    }

    impl KeyMap for TestKeys {
        fn short_help(&self) -> Vec<&Binding> {
            vec![&self.confirm, &self.hidden, &self.quit]
        }

        fn full_help(&self) -> Vec<Vec<&Binding>> {
            vec![vec![&self.confirm, &self.hidden], vec![&self.quit]]
        }
    }

    fn keys() -> TestKeys {
        TestKeys {
            confirm: new_binding(vec![
                with_keys_str(&["enter"]),
                with_help("enter", "set target"),
            ]),
            quit: new_binding(vec![with_keys_str(&["q"]), with_help("q", "quit")]),
            hidden: new_binding(vec![
                with_keys_str(&["x"]),
                with_help("x", "secret"),
                with_disabled(),
            ]),
        }
    }

    #[test]
    fn test_short_view_lists_enabled_bindings() {
        let help = new();
        let view = help.view(&keys());
        assert!(view.contains("enter"));
        assert!(view.contains("set target"));
        assert!(view.contains("quit"));
        assert!(view.contains("•"));
        assert!(!view.contains("secret"));
    }

    #[test]
    fn test_short_view_truncates_with_ellipsis() {
        let help = new().with_width(18);
        let view = help.view(&keys());
        // "enter set target" fits; " • q quit" does not.
        assert!(view.contains("set target"));
        assert!(!view.contains("quit"));
        assert!(view.contains("…"));
    }

    #[test]
    fn test_full_view_has_one_line_per_row() {
        let mut help = new();
        help.show_all = true;
        let view = help.view(&keys());
        // Column one has a single enabled binding, column two as well, so
        // the tallest column is one row.
        assert_eq!(view.lines().count(), 1);
        assert!(view.contains("set target"));
        assert!(view.contains("quit"));
    }

    #[test]
    fn test_zero_width_means_unconstrained() {
        let help = new();
        let view = help.short_help_view(&[&keys().confirm, &keys().quit]);
        assert!(view.contains("set target"));
        assert!(view.contains("quit"));
    }
}

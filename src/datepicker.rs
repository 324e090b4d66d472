//! A segmented inline date/time picker.
//!
//! The picker edits one candidate instant as six segments
//! (`YYYY-MM-DD HH:MM:SS`). Left/right move between segments, up/down step
//! the active segment, and every edit is floored at "now" so an instant in
//! the past can never be offered for selection. The floor is refreshed by
//! the application on every countdown tick, keeping the constraint anchored
//! to the wall clock rather than to the moment the picker was created.
//!
//! Wrapping is per segment: months wrap 1–12 without carrying into the
//! year, days wrap within the current month's length, and the day of month
//! is re-clamped whenever a year or month edit shortens the month.

use crate::key::{self, Binding, KeyMap as KeyMapTrait};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use lipgloss_extras::prelude::*;

/// The editable segments, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Calendar year.
    Year,
    /// Month of year, wrapping 1–12.
    Month,
    /// Day of month, wrapping within the month's length.
    Day,
    /// Hour of day, wrapping mod 24.
    Hour,
    /// Minute, wrapping mod 60.
    Minute,
    /// Second, wrapping mod 60.
    Second,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Year => Field::Month,
            Field::Month => Field::Day,
            Field::Day => Field::Hour,
            Field::Hour => Field::Minute,
            Field::Minute => Field::Second,
            Field::Second => Field::Year,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Year => Field::Second,
            Field::Month => Field::Year,
            Field::Day => Field::Month,
            Field::Hour => Field::Day,
            Field::Minute => Field::Hour,
            Field::Second => Field::Minute,
        }
    }
}

/// Key bindings for navigating and editing the picker.
#[derive(Debug, Clone)]
pub struct DatePickerKeyMap {
    /// Move to the next segment.
    pub next_field: Binding,
    /// Move to the previous segment.
    pub prev_field: Binding,
    /// Step the active segment up.
    pub increment: Binding,
    /// Step the active segment down.
    pub decrement: Binding,
}

impl Default for DatePickerKeyMap {
    fn default() -> Self {
        Self {
            next_field: key::new_binding(vec![
                key::with_keys_str(&["right", "l", "tab"]),
                key::with_help("→/l", "next field"),
            ]),
            prev_field: key::new_binding(vec![
                key::with_keys_str(&["left", "h", "shift+tab"]),
                key::with_help("←/h", "prev field"),
            ]),
            increment: key::new_binding(vec![
                key::with_keys_str(&["up", "k"]),
                key::with_help("↑/k", "increment"),
            ]),
            decrement: key::new_binding(vec![
                key::with_keys_str(&["down", "j"]),
                key::with_help("↓/j", "decrement"),
            ]),
        }
    }
}

impl KeyMapTrait for DatePickerKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.prev_field, &self.next_field, &self.increment, &self.decrement]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![vec![
            &self.prev_field,
            &self.next_field,
            &self.increment,
            &self.decrement,
        ]]
    }
}

/// Styles for the picker's segments.
#[derive(Debug, Clone)]
pub struct Styles {
    /// The active segment while the picker is focused.
    pub active: Style,
    /// Inactive segments.
    pub segment: Style,
    /// The `-`, `:` and space separators.
    pub separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss_extras::lipgloss::AdaptiveColor;

        Self {
            active: Style::new().reverse(true).bold(true),
            segment: Style::new(),
            separator: Style::new().foreground(AdaptiveColor {
                Light: "#B2B2B2",
                Dark: "#4A4A4A",
            }),
        }
    }
}

/// The date/time picker model.
#[derive(Debug, Clone)]
pub struct Model {
    /// Key bindings.
    pub keymap: DatePickerKeyMap,
    /// Segment styles.
    pub styles: Styles,

    value: NaiveDateTime,
    floor: DateTime<Local>,
    field: Field,
    focus: bool,
}

/// Creates a picker whose value and floor both start at `floor`.
pub fn new(floor: DateTime<Local>) -> Model {
    Model {
        keymap: DatePickerKeyMap::default(),
        styles: Styles::default(),
        value: floor.naive_local(),
        floor,
        field: Field::Day,
        focus: false,
    }
}

impl Model {
    /// The candidate instant, resolved in the local time zone.
    ///
    /// On a DST ambiguity the earlier mapping wins; a nonexistent local
    /// time resolves to the floor.
    pub fn value(&self) -> DateTime<Local> {
        self.value
            .and_local_timezone(Local)
            .earliest()
            .unwrap_or(self.floor)
    }

    /// The active segment.
    pub fn field(&self) -> Field {
        self.field
    }

    /// Raises (or lowers) the minimum selectable instant and re-clamps the
    /// displayed value. Called once per tick with the observed "now".
    pub fn set_min(&mut self, floor: DateTime<Local>) {
        self.floor = floor;
        self.clamp_to_floor();
    }

    /// Snaps the displayed value back to `now` and makes it the new floor.
    pub fn reset(&mut self, now: DateTime<Local>) {
        self.floor = now;
        self.value = now.naive_local();
    }

    /// Handles navigation and edit keys while focused.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if !self.focus {
                return None;
            }

            if self.keymap.next_field.matches(key_msg) {
                self.field = self.field.next();
            } else if self.keymap.prev_field.matches(key_msg) {
                self.field = self.field.prev();
            } else if self.keymap.increment.matches(key_msg) {
                self.adjust(1);
            } else if self.keymap.decrement.matches(key_msg) {
                self.adjust(-1);
            }
        }

        None
    }

    fn adjust(&mut self, delta: i64) {
        let v = self.value;
        self.value = match self.field {
            Field::Year => with_date(v, v.year() + delta as i32, v.month(), v.day()),
            Field::Month => {
                let month = wrap(i64::from(v.month()) + delta, 1, 12) as u32;
                with_date(v, v.year(), month, v.day())
            }
            Field::Day => {
                let last = i64::from(days_in_month(v.year(), v.month()));
                let day = wrap(i64::from(v.day()) + delta, 1, last) as u32;
                with_date(v, v.year(), v.month(), day)
            }
            Field::Hour => {
                let hour = wrap(i64::from(v.hour()) + delta, 0, 23) as u32;
                v.with_hour(hour).unwrap_or(v)
            }
            Field::Minute => {
                let minute = wrap(i64::from(v.minute()) + delta, 0, 59) as u32;
                v.with_minute(minute).unwrap_or(v)
            }
            Field::Second => {
                let second = wrap(i64::from(v.second()) + delta, 0, 59) as u32;
                v.with_second(second).unwrap_or(v)
            }
        };
        self.clamp_to_floor();
    }

    fn clamp_to_floor(&mut self) {
        let min = self.floor.naive_local();
        if self.value < min {
            self.value = min;
        }
    }

    /// Renders the segmented value, highlighting the active segment while
    /// focused.
    pub fn view(&self) -> String {
        let v = self.value;
        let segments = [
            (Field::Year, format!("{:04}", v.year())),
            (Field::Month, format!("{:02}", v.month())),
            (Field::Day, format!("{:02}", v.day())),
            (Field::Hour, format!("{:02}", v.hour())),
            (Field::Minute, format!("{:02}", v.minute())),
            (Field::Second, format!("{:02}", v.second())),
        ];
        let separators = ["-", "-", " ", ":", ":"];

        let mut out = String::new();
        for (i, (field, text)) in segments.iter().enumerate() {
            let style = if self.focus && *field == self.field {
                &self.styles.active
            } else {
                &self.styles.segment
            };
            out.push_str(&style.render(text));
            if let Some(sep) = separators.get(i) {
                out.push_str(&self.styles.separator.render(sep));
            }
        }
        out
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

fn wrap(value: i64, min: i64, max: i64) -> i64 {
    min + (value - min).rem_euclid(max - min + 1)
}

/// Number of days in the given month, via the first of the next month.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
        .num_days() as u32
}

fn with_date(v: NaiveDateTime, year: i32, month: u32, day: u32) -> NaiveDateTime {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.and_time(v.time()))
        .unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn floor() -> DateTime<Local> {
        Local.with_ymd_and_hms(2030, 6, 15, 12, 0, 0).unwrap()
    }

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn press(picker: &mut Model, code: KeyCode) {
        let msg: Msg = Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        });
        let _ = picker.update(&msg);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 1), 31);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2028, 2), 29); // leap year
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
    }

    #[test]
    fn test_starts_at_floor() {
        let picker = new(floor());
        assert_eq!(picker.value(), floor());
        assert_eq!(picker.field(), Field::Day);
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut picker = new(floor());
        let _ = picker.focus();

        press(&mut picker, KeyCode::Left); // Day -> Month
        assert_eq!(picker.field(), Field::Month);
        press(&mut picker, KeyCode::Left); // Month -> Year
        press(&mut picker, KeyCode::Left); // Year -> Second
        assert_eq!(picker.field(), Field::Second);
        press(&mut picker, KeyCode::Right); // Second -> Year
        assert_eq!(picker.field(), Field::Year);
    }

    #[test]
    fn test_hour_wraps_mod_24() {
        let mut picker = new(floor());
        picker.value = naive(2031, 6, 15, 23, 0, 0);
        picker.field = Field::Hour;

        picker.adjust(1);
        assert_eq!(picker.value.hour(), 0);
        picker.adjust(-1);
        assert_eq!(picker.value.hour(), 23);
    }

    #[test]
    fn test_month_wraps_without_carrying_year() {
        let mut picker = new(floor());
        picker.value = naive(2031, 12, 10, 12, 0, 0);
        picker.field = Field::Month;

        picker.adjust(1);
        assert_eq!(picker.value.month(), 1);
        assert_eq!(picker.value.year(), 2031);
    }

    #[test]
    fn test_day_clamps_when_month_shortens() {
        let mut picker = new(floor());
        picker.value = naive(2031, 1, 31, 12, 0, 0);
        picker.field = Field::Month;

        picker.adjust(1); // January 31 -> February
        assert_eq!(picker.value.month(), 2);
        assert_eq!(picker.value.day(), 28);
    }

    #[test]
    fn test_edits_cannot_go_below_floor() {
        let mut picker = new(floor());
        picker.field = Field::Hour;

        // Value sits exactly on the floor; stepping the hour down lands in
        // the past and is clamped straight back.
        picker.adjust(-1);
        assert_eq!(picker.value(), floor());
    }

    #[test]
    fn test_set_min_reclamps_value() {
        let mut picker = new(floor());
        let later = floor() + chrono::Duration::minutes(5);
        picker.set_min(later);
        assert_eq!(picker.value(), later);
    }

    #[test]
    fn test_reset_snaps_to_now() {
        let mut picker = new(floor());
        picker.value = naive(2031, 1, 1, 0, 0, 0);
        let now = floor() + chrono::Duration::hours(2);
        picker.reset(now);
        assert_eq!(picker.value(), now);
    }

    #[test]
    fn test_blurred_picker_ignores_keys() {
        let mut picker = new(floor());
        let before = picker.value;
        press(&mut picker, KeyCode::Up);
        assert_eq!(picker.value, before);
    }

    #[test]
    fn test_increment_key_steps_active_field() {
        let mut picker = new(floor());
        let _ = picker.focus();
        press(&mut picker, KeyCode::Up); // Day + 1
        assert_eq!(picker.value.day(), 16);
    }

    #[test]
    fn test_view_renders_all_segments() {
        let picker = new(floor());
        let view = picker.view();
        assert!(view.contains("2030"));
        assert!(view.contains("06"));
        assert!(view.contains("15"));
        assert!(view.contains("12"));
    }
}

//! Timestamp formatting and calendar-aware duration decomposition.
//!
//! Both the current-time and target-time readouts go through the one
//! formatter in this module, so the two lines can never drift apart in
//! style. The countdown itself is produced by [`calendar_diff`], which
//! decomposes the span between two instants into whole local calendar days
//! plus an hour/minute/second remainder.

use chrono::{DateTime, Days, TimeZone};
use std::fmt;

/// The display pattern shared by the current-time and target-time lines:
/// full weekday name, abbreviated month, zero-padded day, year, and
/// zero-padded 24-hour time, e.g. `Tuesday, Jun 27, 2023, 14:05:09`.
///
/// The locale is fixed to English; chrono's formatter emits English names.
pub const TIMESTAMP_FORMAT: &str = "%A, %b %d, %Y, %H:%M:%S";

/// Formats an instant with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// The decomposition of a countdown span into calendar components.
///
/// Each field is truncated toward zero; a span of 90 seconds is
/// `0 days, 0 hours, 1 minutes, 30 seconds`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarDiff {
    /// Whole calendar days between the two instants.
    pub days: i64,
    /// Whole hours of the remainder, `0..24` in the absence of DST shifts.
    pub hours: i64,
    /// Whole minutes of the remainder, `0..60`.
    pub minutes: i64,
    /// Seconds of the remainder, `0..60`.
    pub seconds: i64,
}

impl fmt::Display for CalendarDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days, {} hours, {} minutes, {} seconds",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Computes the calendar difference from `from` to `to`.
///
/// Days are counted by stepping whole wall-clock days in the instants'
/// time zone, so a day that spans a DST transition still counts as one day
/// even though it lasts 23 or 25 hours. The remainder below one day is
/// decomposed by flat division, truncating toward zero.
///
/// When `to` is at or before `from`, every component is zero; callers
/// display the finished state instead of a negative countdown.
///
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use datedown::clock::calendar_diff;
///
/// let now = Utc.with_ymd_and_hms(2023, 6, 27, 14, 5, 9).unwrap();
/// let diff = calendar_diff(&now, &(now + Duration::seconds(90)));
/// assert_eq!((diff.days, diff.hours, diff.minutes, diff.seconds), (0, 0, 1, 30));
/// ```
pub fn calendar_diff<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> CalendarDiff {
    if to <= from {
        return CalendarDiff::default();
    }

    // Estimate from the absolute span, then settle onto wall-clock day
    // boundaries; the estimate can be off by one around DST transitions.
    let mut days = to.clone().signed_duration_since(from.clone()).num_days();
    while add_days(from, days + 1).is_some_and(|d| d <= *to) {
        days += 1;
    }
    while days > 0 && add_days(from, days).map_or(true, |d| d > *to) {
        days -= 1;
    }

    let anchor = add_days(from, days).unwrap_or_else(|| from.clone());
    let rem = to.clone().signed_duration_since(anchor).num_seconds();

    CalendarDiff {
        days,
        hours: rem / 3600,
        minutes: (rem % 3600) / 60,
        seconds: rem % 60,
    }
}

fn add_days<Tz: TimeZone>(t: &DateTime<Tz>, days: i64) -> Option<DateTime<Tz>> {
    // None when the shifted wall-clock time does not exist locally (DST gap).
    t.clone().checked_add_days(Days::new(u64::try_from(days).ok()?))
}

//! Week boundary calculation.
//!
//! Rosters are keyed by the Monday that starts their week. Week numbers and
//! years follow ISO-8601, taken from that Monday, so a week spanning New
//! Year is labelled consistently wherever it is computed.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc};

/// A Monday-aligned calendar week.
///
/// # Examples
/// ```
/// use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
/// use chore_roster::domain::RosterWeek;
///
/// let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
/// let week = RosterWeek::containing(now, FixedOffset::east_opt(0).unwrap());
/// assert_eq!(week.start(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
/// assert_eq!((week.week_number(), week.year()), (1, 2025));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RosterWeek {
    start: NaiveDate,
    week_number: u32,
    year: i32,
}

impl RosterWeek {
    /// Week containing `instant`, judged in the household's `offset`.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self::starting_on(instant.with_timezone(&offset).date_naive())
    }

    /// Week containing `date`.
    #[must_use]
    pub fn starting_on(date: NaiveDate) -> Self {
        let back = u64::from(date.weekday().num_days_from_monday());
        let start = date.checked_sub_days(Days::new(back)).unwrap_or(date);
        let iso = start.iso_week();
        Self {
            start,
            week_number: iso.week(),
            year: iso.year(),
        }
    }

    /// Monday starting the week.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// ISO week number.
    #[must_use]
    pub const fn week_number(&self) -> u32 {
        self.week_number
    }

    /// ISO week-numbering year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }
}

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

/// Number of week rows in a displayed month.
///
/// The grid always shows whole weeks, padded with leading/trailing days
/// from the adjacent months, so that every month renders at the same
/// height.
pub const WEEKS_PER_GRID: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid calendar month: year {year}, month {month}")]
    InvalidCalendarInput { year: i32, month: u32 },
}

/// First day of the week used to lay out the month grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn first_weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Sunday => Weekday::Sun,
        }
    }

    /// Weekday header names, ordered to match the grid columns.
    pub fn day_names(self) -> [&'static str; 7] {
        const NAMES: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
        let offset = match self {
            Self::Monday => 0,
            Self::Sunday => 6,
        };
        std::array::from_fn(|i| NAMES[(i + offset) % 7])
    }
}

/// The user's selected start/end pair, possibly partially filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Build a range from two instants, truncating each to its calendar day.
    pub fn from_instants<Tz: TimeZone>(
        from: Option<DateTime<Tz>>,
        to: Option<DateTime<Tz>>,
    ) -> Self {
        Self {
            from: from.map(|instant| truncate_to_day(&instant)),
            to: to.map(|instant| truncate_to_day(&instant)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// Which endpoint of a range a day is, for endpoint styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
    /// A single-day range: the day is both endpoints at once.
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    /// ISO week number of the first day in the row.
    pub number: u8,
    pub days: Vec<NaiveDate>,
}

/// Truncate an instant to its calendar day, dropping all sub-day precision.
///
/// The day is taken in the instant's own timezone; pass a
/// [`DateTime<Local>`] to truncate to the local calendar day.
pub fn truncate_to_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The cells of a month view: always [`WEEKS_PER_GRID`] whole weeks
/// (42 days), including the leading/trailing days of the adjacent
/// months, with the first column on `week_start`.
pub fn month_grid(
    year: i32,
    month: u32,
    week_start: WeekStart,
) -> Result<Vec<Week>, CalendarError> {
    let invalid = CalendarError::InvalidCalendarInput { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid)?;
    let mut day = first;
    while day.weekday() != week_start.first_weekday() {
        day = day.pred_opt().ok_or(invalid)?;
    }

    let mut weeks = Vec::with_capacity(WEEKS_PER_GRID);
    for _ in 0..WEEKS_PER_GRID {
        let mut days = Vec::with_capacity(7);
        for _ in 0..7 {
            days.push(day);
            day = day.succ_opt().ok_or(invalid)?;
        }
        weeks.push(Week {
            number: days[0].iso_week().week() as u8,
            days,
        });
    }
    Ok(weeks)
}

/// `true` iff `range.from <= day <= range.to`; `false` whenever either
/// endpoint is unset.
pub fn in_range(day: NaiveDate, range: &DateRange) -> bool {
    match (range.from, range.to) {
        (Some(from), Some(to)) => from <= day && day <= to,
        _ => false,
    }
}

pub fn endpoint_of(day: NaiveDate, range: &DateRange) -> Option<Endpoint> {
    let start = range.from == Some(day);
    let end = range.to == Some(day);
    match (start, end) {
        (true, true) => Some(Endpoint::Both),
        (true, false) => Some(Endpoint::Start),
        (false, true) => Some(Endpoint::End),
        (false, false) => None,
    }
}

pub fn is_weekend(day: NaiveDate) -> bool {
    day.weekday() == Weekday::Sat || day.weekday() == Weekday::Sun
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => panic!("Unknown month: {month}"),
    }
}

pub(crate) fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub(crate) fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

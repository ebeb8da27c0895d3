//! Calendar month arithmetic.
//!
//! All month boundaries are computed in UTC so that a transaction is filed
//! under the same month no matter which time zone the server runs in.

use std::ops::RangeInclusive;

use time::{Date, Month, OffsetDateTime, UtcOffset, macros::time};

use crate::Error;

/// An inclusive range of instants.
pub type DateTimeRange = RangeInclusive<OffsetDateTime>;

/// The earliest year accepted by [YearMonth::new].
pub const MIN_YEAR: i64 = 1000;
/// The latest year accepted by [YearMonth::new].
pub const MAX_YEAR: i64 = 9999;

/// A calendar month of a specific year, e.g. March 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first_day: Date,
    last_day: Date,
}

impl YearMonth {
    /// Create a year-month from a year and a one-based month number.
    ///
    /// # Errors
    /// Returns an [Error::InvalidMonth] if `month` is not in 1-12, or an
    /// [Error::InvalidYear] if `year` is outside of [MIN_YEAR]..=[MAX_YEAR].
    pub fn new(year: i64, month: i64) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(month));
        }

        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::InvalidYear(year));
        }

        let calendar_month = Month::try_from(month as u8).map_err(|_| Error::InvalidMonth(month))?;

        Self::from_parts(year as i32, calendar_month)
    }

    fn from_parts(year: i32, month: Month) -> Result<Self, Error> {
        let first_day =
            Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidYear(year.into()))?;
        let last_day = first_day
            .replace_day(month.length(year))
            .map_err(|_| Error::InvalidYear(year.into()))?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The calendar month.
    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    /// The first instant of the month, midnight UTC on the first day.
    pub fn start(&self) -> OffsetDateTime {
        self.first_day.midnight().assume_utc()
    }

    /// The last whole second of the month in UTC.
    pub fn end(&self) -> OffsetDateTime {
        self.last_day.with_time(time!(23:59:59)).assume_utc()
    }

    /// Every whole second of the month.
    pub fn range(&self) -> DateTimeRange {
        self.start()..=self.end()
    }

    /// The month before this one.
    ///
    /// # Errors
    /// Returns an [Error::InvalidYear] if the previous month cannot be
    /// represented.
    pub fn previous(&self) -> Result<Self, Error> {
        let day_before = self
            .first_day
            .previous_day()
            .ok_or(Error::InvalidYear(self.year().into()))?;

        Self::from_parts(day_before.year(), day_before.month())
    }

    /// The month `count` months before this one, e.g. two months before March
    /// is January.
    pub fn months_before(&self, count: u8) -> Result<Self, Error> {
        (0..count).try_fold(*self, |year_month, _| year_month.previous())
    }

    /// The display label for the month, e.g. "Mar/2024".
    pub fn label(&self) -> String {
        format_month_label(self.year(), self.month())
    }
}

/// The label of the UTC month that contains `datetime`, e.g. "Mar/2024".
///
/// Matches [YearMonth::label] for the same month.
pub fn month_label_of(datetime: OffsetDateTime) -> String {
    let utc = datetime.to_offset(UtcOffset::UTC);

    format_month_label(utc.year(), utc.month())
}

fn format_month_label(year: i32, month: Month) -> String {
    let abbreviation = match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{abbreviation}/{year:04}")
}

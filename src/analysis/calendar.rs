//! Auxiliary time fields derived from timestamps.
//!
//! Everything here is a read-only projection of the timestamp column.

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{VizError, VizResult};

/// Calendar fields for one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_year: u32,
    pub hour: u32,
    /// Monday = 0.
    pub weekday: u32,
    pub iso_week: u32,
}

impl TimeFields {
    pub fn of(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
            day: ts.day(),
            day_of_year: ts.ordinal(),
            hour: ts.hour(),
            weekday: ts.weekday().num_days_from_monday(),
            iso_week: ts.iso_week().week(),
        }
    }
}

/// Position of a date in the month-block calendar grid.
///
/// Months are laid out left to right, each [`CalendarCell::MONTH_COLUMNS`]
/// columns wide; inside a month the column is the week of the month and the
/// row is the weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub month: u32,
    pub week_of_month: u32,
    pub weekday: u32,
    pub column: u32,
}

impl CalendarCell {
    /// A month spans at most six calendar weeks; one more column separates months.
    pub const MONTH_COLUMNS: u32 = 7;

    pub fn of(date: NaiveDate) -> Self {
        let weekday = date.weekday().num_days_from_monday();
        let first_weekday = date
            .with_day(1)
            .map(|first| first.weekday().num_days_from_monday())
            .unwrap_or(0);
        let week_of_month = (date.day() - 1 + first_weekday) / 7;
        Self {
            date,
            month: date.month(),
            week_of_month,
            weekday,
            column: (date.month() - 1) * Self::MONTH_COLUMNS + week_of_month,
        }
    }

    /// Total number of grid columns for a year.
    pub fn year_columns() -> u32 {
        12 * Self::MONTH_COLUMNS
    }
}

/// Every date of `year`, in order.
pub fn dates_of_year(year: i32) -> Vec<NaiveDate> {
    let Some(start) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };
    start.iter_days().take_while(|d| d.year() == year).collect()
}

/// Reject strftime patterns chrono cannot format, before they reach a `Display` call.
pub fn validate_date_format(name: &str, format: &str) -> VizResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(VizError::invalid(name, format!("`{}` is not a valid date format", format)));
    }
    Ok(())
}

pub fn month_abbr(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    NAMES.get(month.wrapping_sub(1) as usize).copied().unwrap_or("")
}

pub fn weekday_abbr(weekday: u32) -> &'static str {
    const NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    NAMES.get(weekday as usize).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_timestamp;

    #[test]
    fn test_time_fields_for_leap_day_after() {
        let ts = parse_timestamp("2024-03-01T00:00:00").unwrap();
        let fields = TimeFields::of(&ts);
        assert_eq!(fields.day_of_year, 61);
        assert_eq!(fields.hour, 0);
        assert_eq!(fields.month, 3);
        // 2024-03-01 was a Friday
        assert_eq!(fields.weekday, 4);
        assert_eq!(fields.iso_week, 9);
    }

    #[test]
    fn test_iso_week_wraps_at_year_end() {
        let ts = parse_timestamp("2024-12-30 12:00:00").unwrap();
        assert_eq!(TimeFields::of(&ts).iso_week, 1);
    }

    #[test]
    fn test_calendar_cells() {
        // 2024-01-01 is a Monday
        let jan1 = CalendarCell::of(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!((jan1.column, jan1.weekday), (0, 0));

        let jan8 = CalendarCell::of(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(jan8.week_of_month, 1);

        // 2024-03-01 is a Friday, 2024-03-04 the following Monday
        let mar1 = CalendarCell::of(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let mar4 = CalendarCell::of(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(mar1.column, 2 * CalendarCell::MONTH_COLUMNS);
        assert_eq!(mar4.column, mar1.column + 1);
        assert_eq!(mar4.weekday, 0);
    }

    #[test]
    fn test_calendar_weeks_fit_in_month_block() {
        for date in dates_of_year(2024) {
            assert!(CalendarCell::of(date).week_of_month < CalendarCell::MONTH_COLUMNS - 1);
        }
    }

    #[test]
    fn test_dates_of_leap_year() {
        assert_eq!(dates_of_year(2024).len(), 366);
        assert_eq!(dates_of_year(2023).len(), 365);
        assert_eq!(month_abbr(2), "Feb");
        assert_eq!(weekday_abbr(6), "Sun");
    }

    #[test]
    fn test_date_format_validation() {
        assert!(validate_date_format("date_format", "%Y-%m").is_ok());
        assert!(validate_date_format("date_format", "%Q").is_err());
    }
}

//! A validated point in civil (local, zone-less) time
//!
//! [`CalendarDateTime`] is a plain value: six calendar fields, each checked when it is set, plus the
//! calendar arithmetic the rest of the crate needs (leap years, month lengths and weekdays).

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, Local, Timelike};

use crate::error::{Error, Result};

/// What an unset value renders to
pub const NOT_SET: &str = "not set";

pub const MIN_YEAR: u16 = 1;
pub const MAX_YEAR: u16 = 2999;

/// Highest day a daily event may reach when it does not roll over into the next month
const MAX_OVERFLOW_DAY: u8 = 32;

/// One of the six components of a [`CalendarDateTime`], in significance order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}


/// Days of the week, in the order Zeller's congruence yields them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Weekday {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

const ZELLER_TABLE: [Weekday; 7] = [
    Weekday::Saturday,
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
];

impl Weekday {
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}


/// Gregorian leap year rule
pub fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`.
///
/// Returns 0 for a month outside `1..=12`.
pub fn max_days(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => if is_leap_year(year) { 29 } else { 28 },
        _ => 0,
    }
}


/// A point in civil time, from year 1 to year 2999.
///
/// The default value is "not set": all fields are zero and [`Self::is_set`] is false.
/// Any successful setter marks the value as set.
///
/// Month setters wrap before validating: `0` becomes December and `13` becomes January.
/// Every other out-of-range value is rejected and leaves the field untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CalendarDateTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    is_set: bool,
}

impl CalendarDateTime {
    /// Build a fully specified value. Every field is validated.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self> {
        Self::from_tuple(&[year as i64, month as i64, day as i64, hour as i64, minute as i64, second as i64])
    }

    /// Build a value from its `(year, month, day, hour, minute, second)` components
    pub fn from_tuple(components: &[i64]) -> Result<Self> {
        if components.len() != 6 {
            return Err(Error::Validation(format!(
                "a date and time needs 6 components, got {}", components.len()
            )));
        }

        let mut dt = Self::default();
        // Year and month first, so that the day can be checked against the month length
        dt.set(Field::Year, components[0])?;
        dt.set(Field::Month, components[1])?;
        dt.set(Field::Day, components[2])?;
        dt.set(Field::Hour, components[3])?;
        dt.set(Field::Minute, components[4])?;
        dt.set(Field::Second, components[5])?;
        Ok(dt)
    }

    /// The current local time, read from the system clock
    pub fn now() -> Result<Self> {
        let now = Local::now();
        Self::from_tuple(&[
            now.year() as i64,
            now.month() as i64,
            now.day() as i64,
            now.hour() as i64,
            now.minute() as i64,
            now.second() as i64,
        ])
        .map_err(|err| Error::Validation(format!("Unable to read the system clock: {}", err)))
    }

    /// Overwrite every field with the current local time
    pub fn set_now(&mut self) -> Result<()> {
        *self = Self::now()?;
        Ok(())
    }

    pub fn year(&self) -> u16   { self.year   }
    pub fn month(&self) -> u8   { self.month  }
    pub fn day(&self) -> u8     { self.day    }
    pub fn hour(&self) -> u8    { self.hour   }
    pub fn minute(&self) -> u8  { self.minute }
    pub fn second(&self) -> u8  { self.second }
    pub fn is_set(&self) -> bool { self.is_set }

    /// The six components, most significant first. Tuples compare chronologically.
    pub fn as_tuple(&self) -> (u16, u8, u8, u8, u8, u8) {
        (self.year, self.month, self.day, self.hour, self.minute, self.second)
    }

    /// Validate and store a single field.
    ///
    /// On failure, the returned error names the field and its valid range, and the field keeps its previous value.
    /// Changing the month or the year is refused when the stored day does not exist in the new month.
    pub fn set(&mut self, field: Field, value: i64) -> Result<()> {
        match field {
            Field::Year => {
                check_range(field, value, MIN_YEAR as i64, MAX_YEAR as i64)?;
                self.check_stored_day(self.month, value as u16)?;
                self.year = value as u16;
            },
            Field::Month => {
                let value = match value {
                    0 => 12,
                    13 => 1,
                    other => other,
                };
                check_range(field, value, 1, 12)?;
                self.check_stored_day(value as u8, self.year)?;
                self.month = value as u8;
            },
            Field::Day => {
                let max = if self.month != 0 && self.year != 0 {
                    max_days(self.month, self.year)
                } else {
                    31
                };
                check_range(field, value, 1, max as i64)?;
                self.day = value as u8;
            },
            Field::Hour => {
                check_range(field, value, 0, 24)?;
                self.hour = value as u8;
            },
            Field::Minute => {
                check_range(field, value, 0, 59)?;
                self.minute = value as u8;
            },
            Field::Second => {
                check_range(field, value, 0, 59)?;
                self.second = value as u8;
            },
        }
        self.is_set = true;
        Ok(())
    }

    /// The day already stored must still exist once the month or year changes
    fn check_stored_day(&self, month: u8, year: u16) -> Result<()> {
        if self.day == 0 || month == 0 || year == 0 {
            return Ok(());
        }
        let max = max_days(month, year);
        if self.day > max {
            return Err(Error::Validation(format!(
                "{} {} does not exist in {:04}.{:02}", Field::Day, self.day, year, month
            )));
        }
        Ok(())
    }

    pub fn set_year(&mut self, year: u16) -> Result<()>       { self.set(Field::Year, year as i64)     }
    pub fn set_month(&mut self, month: u8) -> Result<()>      { self.set(Field::Month, month as i64)   }
    pub fn set_day(&mut self, day: u8) -> Result<()>          { self.set(Field::Day, day as i64)       }
    pub fn set_hour(&mut self, hour: u8) -> Result<()>        { self.set(Field::Hour, hour as i64)     }
    pub fn set_minute(&mut self, minute: u8) -> Result<()>    { self.set(Field::Minute, minute as i64) }
    pub fn set_second(&mut self, second: u8) -> Result<()>    { self.set(Field::Second, second as i64) }

    /// Day of the week, computed with Zeller's congruence. `None` for an unset value.
    pub fn weekday(&self) -> Option<Weekday> {
        if self.is_set == false {
            return None;
        }

        let mut year = self.year as i64;
        let mut month = self.month as i64;
        let day = self.day as i64;
        // January and February count as months 13 and 14 of the previous year
        if month < 3 {
            month += 12;
            year -= 1;
        }
        let h = (day + (13 * (month + 1)) / 5 + year + year / 4 - year / 100 + year / 400) % 7;
        Some(ZELLER_TABLE[h as usize])
    }

    pub fn weekday_name(&self) -> &'static str {
        self.weekday().map(|w| w.name()).unwrap_or("None")
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    /// Number of days in the month this value lies in
    pub fn days_in_month(&self) -> u8 {
        max_days(self.month, self.year)
    }

    /// Move to the same moment one year later.
    ///
    /// The day is not checked against the new month length (February 29th stays the 29th).
    pub(crate) fn advance_year(&mut self) -> Result<()> {
        let next = self.year as i64 + 1;
        check_range(Field::Year, next, MIN_YEAR as i64, MAX_YEAR as i64)?;
        self.year = next as u16;
        Ok(())
    }

    /// Move to the same day of the next month, wrapping December into January of the next year.
    ///
    /// The day is not checked against the new month length.
    pub(crate) fn advance_month(&mut self) -> Result<()> {
        if self.month >= 12 {
            self.advance_year()?;
            self.month = 1;
        } else {
            self.month += 1;
        }
        Ok(())
    }

    /// Move to the next day.
    ///
    /// Without `rollover`, only the day field is incremented, and it may exceed the month length
    /// up to day 32. Going further is an error, and the value is left untouched.
    /// With `rollover`, a day past the end of the month becomes the first day of the next month.
    pub(crate) fn advance_day(&mut self, rollover: bool) -> Result<()> {
        if rollover == false {
            let next = self.day as i64 + 1;
            check_range(Field::Day, next, 1, MAX_OVERFLOW_DAY as i64)?;
            self.day = next as u8;
            return Ok(());
        }

        if self.day >= self.days_in_month() {
            self.advance_month()?;
            self.day = 1;
        } else {
            self.day += 1;
        }
        Ok(())
    }
}

fn check_range(field: Field, value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(Error::Validation(format!(
            "{} must be in range [{}, {}], got {}", field, min, max, value
        )));
    }
    Ok(())
}

impl Display for CalendarDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_set == false {
            return write!(f, "{}", NOT_SET);
        }
        write!(f, "{:04}.{:02}.{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second)
    }
}

impl FromStr for CalendarDateTime {
    type Err = Error;

    /// Parse the `YYYY.MM.DD hh:mm:ss` form produced by `Display`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == NOT_SET {
            return Ok(Self::default());
        }

        let invalid = || Error::Validation(format!("Invalid date and time {:?}, expected YYYY.MM.DD hh:mm:ss", s));

        let mut parts = s.split_whitespace();
        let (date, time) = match (parts.next(), parts.next(), parts.next()) {
            (Some(date), Some(time), None) => (date, time),
            _ => return Err(invalid()),
        };

        let mut components = Vec::with_capacity(6);
        for part in date.split('.').chain(time.split(':')) {
            let value: i64 = part.parse().map_err(|_| invalid())?;
            components.push(value);
        }
        if components.len() != 6 {
            return Err(invalid());
        }
        Self::from_tuple(&components)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn dt(y: u16, mo: u8, d: u8) -> CalendarDateTime {
        CalendarDateTime::new(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_weekday() {
        assert_eq!(dt(2000, 1, 1).weekday(), Some(Weekday::Saturday));
        assert_eq!(dt(2024, 2, 29).weekday(), Some(Weekday::Thursday));
        assert_eq!(dt(1900, 3, 1).weekday(), Some(Weekday::Thursday));
        assert_eq!(dt(2025, 2, 17).weekday(), Some(Weekday::Monday));
        assert_eq!(dt(1, 1, 1).weekday(), Some(Weekday::Monday));
        assert_eq!(CalendarDateTime::default().weekday(), None);
        assert_eq!(CalendarDateTime::default().weekday_name(), "None");
    }

    #[test]
    fn test_weekday_matches_chrono() {
        use chrono::NaiveDate;

        let mut date = NaiveDate::from_ymd_opt(1899, 12, 20).unwrap();
        for _ in 0..1000 {
            let ours = dt(date.year() as u16, date.month() as u8, date.day() as u8);
            let expected = match date.weekday() {
                chrono::Weekday::Mon => Weekday::Monday,
                chrono::Weekday::Tue => Weekday::Tuesday,
                chrono::Weekday::Wed => Weekday::Wednesday,
                chrono::Weekday::Thu => Weekday::Thursday,
                chrono::Weekday::Fri => Weekday::Friday,
                chrono::Weekday::Sat => Weekday::Saturday,
                chrono::Weekday::Sun => Weekday::Sunday,
            };
            assert_eq!(ours.weekday(), Some(expected), "weekday of {}", date);
            date = date + chrono::Duration::days(37);
        }
    }

    #[test]
    fn test_leap_years() {
        assert_eq!(is_leap_year(1900), false);
        assert_eq!(is_leap_year(2000), true);
        assert_eq!(is_leap_year(2004), true);
        assert_eq!(is_leap_year(2023), false);
    }

    #[test]
    fn test_max_days() {
        assert_eq!(max_days(2, 2024), 29);
        assert_eq!(max_days(2, 2023), 28);
        assert_eq!(max_days(4, 2023), 30);
        assert_eq!(max_days(4, 2024), 30);
        assert_eq!(max_days(12, 1), 31);
        assert_eq!(max_days(13, 2024), 0);
    }

    #[test]
    fn test_validation() {
        let mut value = dt(2025, 6, 15);

        let err = value.set(Field::Hour, 25).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("hour"));
        assert_eq!(value.hour(), 0);

        assert!(value.set_hour(24).is_ok());
        assert!(value.set_minute(60).is_err());
        assert!(value.set_second(60).is_err());
        assert!(value.set(Field::Year, 0).is_err());
        assert!(value.set(Field::Year, 3000).is_err());
        assert!(value.set(Field::Day, 0).is_err());
        assert_eq!(value.year(), 2025);
        assert_eq!(value.day(), 15);
    }

    #[test]
    fn test_month_wraps() {
        let mut value = dt(2025, 6, 15);
        value.set_month(0).unwrap();
        assert_eq!(value.month(), 12);
        value.set_month(13).unwrap();
        assert_eq!(value.month(), 1);

        // Only 0 and 13 wrap
        assert!(value.set(Field::Month, 14).is_err());
        assert!(value.set(Field::Month, -1).is_err());
        assert_eq!(value.month(), 1);
    }

    #[test]
    fn test_day_is_bounded_by_month_length() {
        assert!(CalendarDateTime::new(2023, 2, 29, 0, 0, 0).is_err());
        assert!(CalendarDateTime::new(2024, 2, 29, 0, 0, 0).is_ok());
        assert!(CalendarDateTime::new(2024, 4, 31, 0, 0, 0).is_err());

        // Without a month, only the absolute bound applies
        let mut value = CalendarDateTime::default();
        assert!(value.set_day(31).is_ok());
        assert!(value.set_day(32).is_err());
    }

    #[test]
    fn test_month_and_year_keep_the_day_valid() {
        let mut value = dt(2025, 1, 31);
        let err = value.set_month(2).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("day"));
        assert_eq!(value.as_tuple(), (2025, 1, 31, 0, 0, 0));

        // Lowering the day first makes the change possible
        value.set_day(28).unwrap();
        value.set_month(2).unwrap();
        assert_eq!(value.as_tuple(), (2025, 2, 28, 0, 0, 0));

        let mut leap_day = dt(2024, 2, 29);
        assert!(leap_day.set_year(2025).is_err());
        assert_eq!(leap_day.year(), 2024);
        leap_day.set_year(2028).unwrap();
        assert_eq!(leap_day.as_tuple(), (2028, 2, 29, 0, 0, 0));

        // The wrap is applied before the day is checked
        let mut value = dt(2025, 12, 31);
        value.set_month(13).unwrap();
        assert_eq!(value.month(), 1);
        let mut value = dt(2025, 3, 31);
        assert!(value.set_month(4).is_err());
        assert_eq!(value.month(), 3);
    }

    #[test]
    fn test_is_set() {
        let mut value = CalendarDateTime::default();
        assert_eq!(value.is_set(), false);
        assert_eq!(value.to_string(), NOT_SET);

        value.set_minute(5).unwrap();
        assert!(value.is_set());
    }

    #[test]
    fn test_rendering() {
        let value = CalendarDateTime::new(2025, 2, 17, 6, 35, 0).unwrap();
        assert_eq!(value.to_string(), "2025.02.17 06:35:00");
        assert_eq!("2025.02.17 06:35:00".parse::<CalendarDateTime>().unwrap(), value);
        assert_eq!(NOT_SET.parse::<CalendarDateTime>().unwrap(), CalendarDateTime::default());
        assert!("2025-02-17 06:35:00".parse::<CalendarDateTime>().is_err());
        assert!("2025.02.30 06:35:00".parse::<CalendarDateTime>().is_err());
    }

    #[test]
    fn test_now() {
        let now = CalendarDateTime::now().unwrap();
        assert!(now.is_set());
        assert!(now.year() >= 2024);
        assert!(now.weekday().is_some());
    }

    #[test]
    fn test_advance() {
        let mut value = CalendarDateTime::new(2025, 12, 1, 8, 0, 0).unwrap();
        value.advance_month().unwrap();
        assert_eq!(value.as_tuple(), (2026, 1, 1, 8, 0, 0));

        value.advance_year().unwrap();
        assert_eq!(value.as_tuple(), (2027, 1, 1, 8, 0, 0));

        let mut end_of_april = CalendarDateTime::new(2025, 4, 30, 8, 0, 0).unwrap();
        let mut rolled = end_of_april;
        end_of_april.advance_day(false).unwrap();
        assert_eq!(end_of_april.as_tuple(), (2025, 4, 31, 8, 0, 0));
        end_of_april.advance_day(false).unwrap();
        assert_eq!(end_of_april.as_tuple(), (2025, 4, 32, 8, 0, 0));
        // Day 32 is as far as a day can overflow
        assert!(end_of_april.advance_day(false).unwrap_err().is_validation());
        assert_eq!(end_of_april.as_tuple(), (2025, 4, 32, 8, 0, 0));
        rolled.advance_day(true).unwrap();
        assert_eq!(rolled.as_tuple(), (2025, 5, 1, 8, 0, 0));

        let mut new_year = CalendarDateTime::new(2025, 12, 31, 8, 0, 0).unwrap();
        new_year.advance_day(true).unwrap();
        assert_eq!(new_year.as_tuple(), (2026, 1, 1, 8, 0, 0));

        let mut last = CalendarDateTime::new(MAX_YEAR, 6, 1, 0, 0, 0).unwrap();
        assert!(last.advance_year().is_err());
        assert_eq!(last.year(), MAX_YEAR);
    }
}

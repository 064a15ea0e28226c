//! Month grid projection of the habit record.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use time::{Date, Month, Weekday};

use crate::date::{DateKey, days_in_month};
use crate::error::{HabitError, Result};
use crate::record::{Category, HabitRecord};

/// A calendar month, used as the calendar's navigation position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthCursor {
    year: i32,
    month: Month,
}

impl MonthCursor {
    /// Cursor for `year` and 1-based `month`.
    ///
    /// # Errors
    /// Returns [`HabitError::InvalidMonth`] when the pair does not name a
    /// month within `0000..=9999`.
    pub fn new(year: i32, month: u8) -> Result<Self> {
        let invalid = || HabitError::InvalidMonth { year, month };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        DateKey::from_calendar(year, month as u8, 1).map_err(|_| invalid())?;
        Ok(Self { year, month })
    }

    /// Month containing `date`.
    #[must_use]
    pub const fn containing(date: DateKey) -> Self {
        let inner = date.date();
        Self {
            year: inner.year(),
            month: inner.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number (1-based).
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month as u8
    }

    /// Number of days in this month.
    #[must_use]
    pub const fn len(self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// Always false; every month has at least 28 days.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Key of the given day of this month.
    ///
    /// # Errors
    /// Returns [`HabitError::DateOutOfRange`] when `day` is not in the month.
    pub fn day(self, day: u8) -> Result<DateKey> {
        let date = Date::from_calendar_date(self.year, self.month, day).map_err(|_| HabitError::DateOutOfRange)?;
        DateKey::new(date)
    }

    /// First day of the month.
    ///
    /// # Errors
    /// Never fails for a cursor built through [`MonthCursor::new`]; the
    /// signature mirrors [`MonthCursor::day`].
    pub fn first(self) -> Result<DateKey> {
        self.day(1)
    }

    /// Last day of the month.
    ///
    /// # Errors
    /// See [`MonthCursor::first`].
    pub fn last(self) -> Result<DateKey> {
        self.day(self.len())
    }

    /// Whether `date` falls inside this month.
    #[must_use]
    pub fn contains(self, date: DateKey) -> bool {
        Self::containing(date) == self
    }

    /// Previous month.
    ///
    /// # Errors
    /// Returns [`HabitError::InvalidMonth`] before January of year 0.
    pub fn prev(self) -> Result<Self> {
        match self.month {
            Month::January => Self::new(self.year - 1, 12),
            month => Self::new(self.year, month.previous() as u8),
        }
    }

    /// Next month.
    ///
    /// # Errors
    /// Returns [`HabitError::InvalidMonth`] after December of year 9999.
    pub fn next(self) -> Result<Self> {
        match self.month {
            Month::December => Self::new(self.year + 1, 1),
            month => Self::new(self.year, month.next() as u8),
        }
    }

    /// Number of blank cells before day 1 in a week row starting on `week_start`.
    ///
    /// # Errors
    /// See [`MonthCursor::first`].
    pub fn leading_blanks(self, week_start: Weekday) -> Result<u8> {
        let first = self.first()?.date().weekday().number_days_from_sunday();
        Ok((first + 7 - week_start.number_days_from_sunday()) % 7)
    }

    /// Project the record onto every day of this month.
    ///
    /// # Errors
    /// See [`MonthCursor::first`].
    pub fn project(self, record: &HabitRecord, today: DateKey) -> Result<Vec<CellMarker>> {
        (1..=self.len())
            .map(|day| {
                let date = self.day(day)?;
                Ok(CellMarker::classify(day, date, record, today))
            })
            .collect()
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

impl Serialize for MonthCursor {
    fn serialize<S>(&self, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl FromStr for MonthCursor {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HabitError::InvalidDateKey(s.to_owned());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let shaped = year.len() == 4
            && month.len() == 2
            && year.bytes().chain(month.bytes()).all(|byte| byte.is_ascii_digit());
        if !shaped {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Primary highlight of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Nothing completed.
    None,
    /// Only daily journaling.
    Daily,
    /// Weekly review, possibly with daily.
    Weekly,
    /// Monthly extraction, possibly with others.
    Monthly,
}

impl From<Category> for Marker {
    fn from(category: Category) -> Self {
        match category {
            Category::Daily => Self::Daily,
            Category::Weekly => Self::Weekly,
            Category::Monthly => Self::Monthly,
        }
    }
}

/// Classification of one day in a projected month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellMarker {
    /// Day of month (1-based).
    pub day: u8,
    /// Key of the day.
    pub date: DateKey,
    /// Whether this is the reference "today".
    pub is_today: bool,
    /// Highest-precedence completed category (monthly > weekly > daily).
    pub primary: Marker,
    /// Completed categories hidden by the primary highlight.
    pub secondary: Vec<Category>,
}

impl CellMarker {
    fn classify(day: u8, date: DateKey, record: &HabitRecord, today: DateKey) -> Self {
        let daily = record.is_completed(Category::Daily, date);
        let weekly = record.is_completed(Category::Weekly, date);
        let monthly = record.is_completed(Category::Monthly, date);

        let primary = [(Category::Monthly, monthly), (Category::Weekly, weekly), (Category::Daily, daily)]
            .into_iter()
            .find_map(|(category, done)| done.then_some(category))
            .map_or(Marker::None, Marker::from);

        let mut secondary = Vec::new();
        if daily && (weekly || monthly) {
            secondary.push(Category::Daily);
        }
        if weekly && monthly {
            secondary.push(Category::Weekly);
        }

        Self {
            day,
            date,
            is_today: date == today,
            primary,
            secondary,
        }
    }

    /// Whether anything at all was completed on this day.
    #[must_use]
    pub fn has_completion(&self) -> bool {
        self.primary != Marker::None
    }
}

/// Project `record` onto every day of `year`/`month` (1-based).
///
/// # Errors
/// Returns [`HabitError::InvalidMonth`] when the pair does not name a month.
pub fn project_month(year: i32, month: u8, record: &HabitRecord, today: DateKey) -> Result<Vec<CellMarker>> {
    MonthCursor::new(year, month)?.project(record, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse()
            .unwrap_or_else(|err| panic!("{s} must parse: {err}"))
    }

    fn record_with(entries: &[(Category, &str)]) -> HabitRecord {
        let mut record = HabitRecord::default();
        for (category, raw) in entries {
            record.toggle(*category, key(raw));
        }
        record
    }

    fn cell(cells: &[CellMarker], day: u8) -> &CellMarker {
        cells
            .iter()
            .find(|cell| cell.day == day)
            .unwrap_or_else(|| panic!("day {day} must be projected"))
    }

    #[test]
    fn february_length_follows_leap_years() -> Result<()> {
        let record = HabitRecord::default();
        let today = key("2024-01-01");
        assert_eq!(project_month(2024, 2, &record, today)?.len(), 29);
        assert_eq!(project_month(2023, 2, &record, today)?.len(), 28);
        assert_eq!(project_month(2000, 2, &record, today)?.len(), 29);
        assert_eq!(project_month(1900, 2, &record, today)?.len(), 28);
        assert_eq!(project_month(2024, 4, &record, today)?.len(), 30);
        assert_eq!(project_month(2024, 12, &record, today)?.len(), 31);
        Ok(())
    }

    #[test]
    fn days_are_numbered_in_order() -> Result<()> {
        let cells = project_month(2024, 9, &HabitRecord::default(), key("2024-09-15"))?;
        let days: Vec<u8> = cells.iter().map(|cell| cell.day).collect();
        assert_eq!(days, (1..=30).collect::<Vec<_>>());
        assert_eq!(cells.iter().filter(|cell| cell.is_today).count(), 1);
        assert!(cell(&cells, 15).is_today);
        Ok(())
    }

    #[test]
    fn monthly_outranks_daily_and_keeps_it_as_secondary() -> Result<()> {
        let record = record_with(&[(Category::Monthly, "2024-05-31"), (Category::Daily, "2024-05-31")]);
        let cells = project_month(2024, 5, &record, key("2024-06-01"))?;
        let last = cell(&cells, 31);
        assert_eq!(last.primary, Marker::Monthly);
        assert_eq!(last.secondary, vec![Category::Daily]);
        Ok(())
    }

    #[test]
    fn precedence_and_secondary_markers() -> Result<()> {
        let record = record_with(&[
            (Category::Daily, "2024-06-01"),
            (Category::Weekly, "2024-06-02"),
            (Category::Daily, "2024-06-02"),
            (Category::Weekly, "2024-06-30"),
            (Category::Monthly, "2024-06-30"),
            (Category::Daily, "2024-06-29"),
            (Category::Weekly, "2024-06-29"),
            (Category::Monthly, "2024-06-29"),
        ]);
        let cells = project_month(2024, 6, &record, key("2024-06-10"))?;

        assert_eq!(cell(&cells, 1).primary, Marker::Daily);
        assert!(cell(&cells, 1).secondary.is_empty());

        assert_eq!(cell(&cells, 2).primary, Marker::Weekly);
        assert_eq!(cell(&cells, 2).secondary, vec![Category::Daily]);

        assert_eq!(cell(&cells, 30).primary, Marker::Monthly);
        assert_eq!(cell(&cells, 30).secondary, vec![Category::Weekly]);

        assert_eq!(cell(&cells, 29).primary, Marker::Monthly);
        assert_eq!(cell(&cells, 29).secondary, vec![Category::Daily, Category::Weekly]);

        assert_eq!(cell(&cells, 3).primary, Marker::None);
        assert!(!cell(&cells, 3).has_completion());
        Ok(())
    }

    #[test]
    fn completions_outside_the_month_are_ignored() -> Result<()> {
        let record = record_with(&[(Category::Daily, "2024-07-01"), (Category::Daily, "2024-05-31")]);
        let cells = project_month(2024, 6, &record, key("2024-06-10"))?;
        assert!(cells.iter().all(|cell| !cell.has_completion()));
        Ok(())
    }

    #[test]
    fn projection_does_not_touch_inputs() -> Result<()> {
        let record = record_with(&[(Category::Weekly, "2024-06-02")]);
        let before = record.clone();
        let cursor = MonthCursor::new(2024, 6)?;
        cursor.project(&record, key("2024-06-10"))?;
        assert_eq!(record, before);
        assert_eq!(cursor, MonthCursor::new(2024, 6)?);
        Ok(())
    }

    #[test]
    fn rejects_invalid_months() {
        for (year, month) in [(2024, 0), (2024, 13), (10_000, 1), (-1, 12)] {
            let Err(err) = project_month(year, month, &HabitRecord::default(), key("2024-01-01")) else {
                panic!("{year}-{month} must be rejected");
            };
            assert!(matches!(err, HabitError::InvalidMonth { .. }));
        }
    }

    #[test]
    fn cursor_navigation_wraps_years() -> Result<()> {
        let january = MonthCursor::new(2024, 1)?;
        assert_eq!(january.prev()?, MonthCursor::new(2023, 12)?);
        assert_eq!(january.prev()?.next()?, january);
        assert_eq!(MonthCursor::new(2024, 12)?.next()?.to_string(), "2025-01");
        assert!(MonthCursor::new(9999, 12)?.next().is_err());
        Ok(())
    }

    #[test]
    fn cursor_parses_year_month() -> Result<()> {
        let cursor: MonthCursor = "2024-02".parse()?;
        assert_eq!((cursor.year(), cursor.month(), cursor.len()), (2024, 2, 29));
        assert!("2024-2".parse::<MonthCursor>().is_err());
        assert!("2024-13".parse::<MonthCursor>().is_err());
        assert!(cursor.contains(key("2024-02-29")));
        assert!(!cursor.contains(key("2024-03-01")));
        Ok(())
    }

    #[test]
    fn leading_blanks_depend_on_week_start() -> Result<()> {
        // 2024-09-01 is a Sunday.
        let september = MonthCursor::new(2024, 9)?;
        assert_eq!(september.leading_blanks(Weekday::Sunday)?, 0);
        assert_eq!(september.leading_blanks(Weekday::Monday)?, 6);
        // 2024-10-01 is a Tuesday.
        let october = MonthCursor::new(2024, 10)?;
        assert_eq!(october.leading_blanks(Weekday::Sunday)?, 2);
        assert_eq!(october.leading_blanks(Weekday::Monday)?, 1);
        Ok(())
    }
}

//! Calendar dates, canonical date keys and the clock that supplies "today".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Duration, Month, OffsetDateTime, Weekday};
use tracing::debug;

use crate::error::{HabitError, Result};

const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Canonical `YYYY-MM-DD` key of a local calendar date.
///
/// Ordering follows the calendar, which matches the lexicographic order of
/// the textual form because the year is always four digits.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DateKey(Date);

impl DateKey {
    /// Wrap a calendar date.
    ///
    /// # Errors
    /// Returns [`HabitError::DateOutOfRange`] when the year needs more than four digits.
    pub fn new(date: Date) -> Result<Self> {
        if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            Ok(Self(date))
        } else {
            Err(HabitError::DateOutOfRange)
        }
    }

    /// Build a key from year, month (1-based) and day numbers.
    ///
    /// # Errors
    /// Returns [`HabitError::InvalidMonth`] for a month outside `1..=12` and
    /// [`HabitError::DateOutOfRange`] when the day does not exist in that month.
    pub fn from_calendar(year: i32, month: u8, day: u8) -> Result<Self> {
        let month_value = Month::try_from(month).map_err(|_| HabitError::InvalidMonth { year, month })?;
        let date = Date::from_calendar_date(year, month_value, day).map_err(|_| HabitError::DateOutOfRange)?;
        Self::new(date)
    }

    /// Underlying calendar date.
    #[must_use]
    pub const fn date(self) -> Date {
        self.0
    }

    /// Key shifted by `days` (negative = past).
    ///
    /// # Errors
    /// Returns [`HabitError::DateOutOfRange`] when the result leaves the supported range.
    pub fn offset(self, days: i64) -> Result<Self> {
        let shifted = self
            .0
            .checked_add(Duration::days(days))
            .ok_or(HabitError::DateOutOfRange)?;
        Self::new(shifted)
    }

    /// Whole calendar days from `earlier` to `self`.
    #[must_use]
    pub fn days_since(self, earlier: Self) -> i64 {
        (self.0 - earlier.0).whole_days()
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.0.year()
    }

    /// Month number (1-based).
    #[must_use]
    pub const fn month(self) -> u8 {
        self.0.month() as u8
    }

    /// Day of month (1-based).
    #[must_use]
    pub const fn day(self) -> u8 {
        self.0.day()
    }

    /// Weekday index with Sunday as 0.
    #[must_use]
    pub const fn weekday_index(self) -> u8 {
        self.0.weekday().number_days_from_sunday()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for DateKey {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || HabitError::InvalidDateKey(s.to_owned());
        let bytes = s.as_bytes();
        let well_shaped = bytes.len() == 10
            && bytes.iter().enumerate().all(|(idx, byte)| match idx {
                4 | 7 => *byte == b'-',
                _ => byte.is_ascii_digit(),
            });
        if !well_shaped {
            return Err(invalid());
        }

        let year: i32 = s[0..4].parse().map_err(|_| invalid())?;
        let month: u8 = s[5..7].parse().map_err(|_| invalid())?;
        let day: u8 = s[8..10].parse().map_err(|_| invalid())?;
        Self::from_calendar(year, month, day).map_err(|_| invalid())
    }
}

impl From<DateKey> for Date {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

impl Serialize for DateKey {
    fn serialize<S>(&self, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(d: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of the reference "today" for every date computation.
pub trait Clock {
    /// Current local calendar date.
    fn today(&self) -> Date;
}

/// Host clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        match OffsetDateTime::now_local() {
            Ok(now) => now.date(),
            Err(err) => {
                debug!(%err, "local offset unavailable, using UTC date");
                OffsetDateTime::now_utc().date()
            }
        }
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> Date {
        (**self).today()
    }
}

/// Key for the clock's current date.
///
/// # Errors
/// Returns [`HabitError::DateOutOfRange`] if the clock reports a year outside `0000..=9999`.
pub fn today_key(clock: &impl Clock) -> Result<DateKey> {
    DateKey::new(clock.today())
}

/// Key for today shifted by `days` (negative = past).
///
/// # Errors
/// Returns [`HabitError::DateOutOfRange`] when the shifted date is not representable.
pub fn offset_key(clock: &impl Clock, days: i64) -> Result<DateKey> {
    today_key(clock)?.offset(days)
}

/// Weekday index of today, Sunday = 0.
pub fn day_of_week(clock: &impl Clock) -> u8 {
    clock.today().weekday().number_days_from_sunday()
}

/// True when tomorrow is the first of a month.
pub fn is_last_day_of_local_month(clock: &impl Clock) -> bool {
    is_last_day_of_month(clock.today())
}

/// True when the day after `date` is the first of a month.
#[must_use]
pub fn is_last_day_of_month(date: Date) -> bool {
    date.next_day().is_none_or(|tomorrow| tomorrow.day() == 1)
}

/// Days until the next date (today counts as 0) falling on `target`.
pub fn days_until_next_occurrence(clock: &impl Clock, target: Weekday) -> u8 {
    days_until_weekday(clock.today(), target)
}

/// Days from `from` until the next date (inclusive) falling on `target`.
#[must_use]
pub const fn days_until_weekday(from: Date, target: Weekday) -> u8 {
    let current = from.weekday().number_days_from_sunday();
    let wanted = target.number_days_from_sunday();
    (wanted + 7 - current) % 7
}

/// Map a Sunday-based index (`0..=6`) to a weekday.
///
/// # Errors
/// Returns [`HabitError::InvalidWeekday`] for indexes above 6.
pub const fn weekday_from_index(index: u8) -> Result<Weekday> {
    if index > 6 {
        return Err(HabitError::InvalidWeekday(index));
    }
    Ok(Weekday::Sunday.nth_next(index))
}

/// Number of days in the given month.
#[must_use]
pub const fn days_in_month(year: i32, month: Month) -> u8 {
    time::util::days_in_year_month(year, month)
}

/// Last calendar day of the month containing `date`.
#[must_use]
pub fn last_day_of_month(date: Date) -> Date {
    let last = days_in_month(date.year(), date.month());
    date.replace_day(last).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn key(s: &str) -> DateKey {
        s.parse()
            .unwrap_or_else(|err| panic!("{s} must parse: {err}"))
    }

    #[test]
    fn parses_and_formats_canonical_keys() {
        let parsed = key("2024-02-29");
        assert_eq!(parsed.date(), date!(2024 - 02 - 29));
        assert_eq!(parsed.to_string(), "2024-02-29");
        assert_eq!(key("0007-01-05").to_string(), "0007-01-05");
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in [
            "",
            "2024-2-29",
            "2024/02/29",
            "2023-02-29",
            "2024-13-01",
            "2024-00-10",
            "2024-04-31",
            "+024-01-01",
            "2024-01-01T00:00",
            "２０２４-01-01",
        ] {
            let Err(err) = raw.parse::<DateKey>() else {
                panic!("{raw:?} should be rejected");
            };
            assert!(matches!(err, HabitError::InvalidDateKey(_)), "{raw:?}: {err}");
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn ordering_is_chronological() {
        let mut keys = vec![key("2024-10-01"), key("2023-12-31"), key("2024-09-30")];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["2023-12-31", "2024-09-30", "2024-10-01"]);
    }

    #[test]
    fn offset_crosses_month_and_year_boundaries() -> Result<()> {
        let clock = FixedClock(date!(2024 - 03 - 01));
        assert_eq!(offset_key(&clock, -1)?.to_string(), "2024-02-29");
        assert_eq!(offset_key(&clock, 0)?, today_key(&clock)?);
        let new_year = FixedClock(date!(2023 - 12 - 31));
        assert_eq!(offset_key(&new_year, 1)?.to_string(), "2024-01-01");
        Ok(())
    }

    #[test]
    fn offset_outside_four_digit_years_is_rejected() {
        let last = key("9999-12-31");
        assert!(matches!(last.offset(1), Err(HabitError::DateOutOfRange)));
    }

    #[test]
    fn day_of_week_uses_sunday_as_zero() {
        assert_eq!(day_of_week(&FixedClock(date!(2024 - 06 - 02))), 0);
        assert_eq!(day_of_week(&FixedClock(date!(2024 - 06 - 08))), 6);
    }

    #[test]
    fn detects_last_day_of_month() {
        assert!(is_last_day_of_local_month(&FixedClock(date!(2024 - 02 - 29))));
        assert!(!is_last_day_of_local_month(&FixedClock(date!(2023 - 02 - 27))));
        assert!(is_last_day_of_local_month(&FixedClock(date!(2023 - 02 - 28))));
        assert!(is_last_day_of_local_month(&FixedClock(date!(2024 - 12 - 31))));
    }

    #[test]
    fn next_occurrence_counts_today_as_zero() {
        let sunday = FixedClock(date!(2024 - 06 - 02));
        assert_eq!(days_until_next_occurrence(&sunday, Weekday::Sunday), 0);
        assert_eq!(days_until_next_occurrence(&sunday, Weekday::Saturday), 6);

        let monday = FixedClock(date!(2024 - 06 - 03));
        assert_eq!(days_until_next_occurrence(&monday, Weekday::Sunday), 6);
        assert_eq!(days_until_next_occurrence(&monday, Weekday::Tuesday), 1);
    }

    #[test]
    fn weekday_index_round_trips() -> Result<()> {
        for index in 0..=6 {
            assert_eq!(weekday_from_index(index)?.number_days_from_sunday(), index);
        }
        assert!(matches!(weekday_from_index(7), Err(HabitError::InvalidWeekday(7))));
        Ok(())
    }

    #[test]
    fn last_day_of_month_handles_leap_years() {
        assert_eq!(last_day_of_month(date!(2024 - 02 - 10)), date!(2024 - 02 - 29));
        assert_eq!(last_day_of_month(date!(2100 - 02 - 01)), date!(2100 - 02 - 28));
        assert_eq!(last_day_of_month(date!(2024 - 04 - 30)), date!(2024 - 04 - 30));
    }

    #[test]
    fn serde_uses_textual_form() {
        let value = serde_json::to_value(key("2024-01-09"))
            .unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(value, serde_json::json!("2024-01-09"));
        let back: DateKey = serde_json::from_value(value).unwrap_or_else(|err| panic!("deserialize: {err}"));
        assert_eq!(back, key("2024-01-09"));
        assert!(serde_json::from_value::<DateKey>(serde_json::json!("2024-1-9")).is_err());
    }
}

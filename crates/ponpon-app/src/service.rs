use anyhow::{Context, Result};
use ponpon_core::date::{days_until_weekday, is_last_day_of_month, last_day_of_month};
use ponpon_core::{
    Category, CellMarker, Clock, DateKey, HabitRecord, HabitStore, MonthCursor, StateMedium, Stats, compute_stats,
    today_key,
};
use ponpon_store_file::FileStore;
use serde::Serialize;
use time::Weekday;
use tracing::debug;

use crate::config::{AppConfig, ScheduleConfig};

/// Service façade that encapsulates every read and mutation of the journal.
pub struct HabitService<M, C> {
    store: HabitStore<M>,
    clock: C,
    schedule: ScheduleConfig,
}

impl<C: Clock> HabitService<FileStore, C> {
    /// Open the state file named by `config`.
    ///
    /// # Errors
    /// Returns an error if the state file location cannot be determined or read.
    pub fn open_configured(config: &AppConfig, clock: C) -> Result<Self> {
        let path = config.storage.state_file()?;
        debug!(path = %path.display(), "Opening state file");
        Self::open(FileStore::new(path), clock, config.schedule)
    }
}

impl<M: StateMedium, C: Clock> HabitService<M, C> {
    /// Load the record from `medium`.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be read.
    pub fn open(medium: M, clock: C, schedule: ScheduleConfig) -> Result<Self> {
        let store = HabitStore::open(medium).context("failed to load habit record")?;
        Ok(Self { store, clock, schedule })
    }

    /// Key of the clock's current date.
    ///
    /// # Errors
    /// Returns an error if the clock reports a date outside the supported range.
    pub fn today(&self) -> Result<DateKey> {
        Ok(today_key(&self.clock)?)
    }

    /// Read-only view of the record.
    pub const fn record(&self) -> &HabitRecord {
        self.store.record()
    }

    /// Whether the first-run onboarding still has to be shown.
    pub const fn needs_onboarding(&self) -> bool {
        !self.store.record().onboarding_done()
    }

    /// Flip today's completion for `category`.
    ///
    /// # Errors
    /// Returns an error if the record could not be saved; the in-memory change is kept.
    pub fn toggle_today(&mut self, category: Category) -> Result<ToggleOutcome> {
        let today = self.today()?;
        self.toggle_on(category, today)
    }

    /// Flip the completion for `category` on `date`.
    ///
    /// # Errors
    /// Returns an error if the record could not be saved; the in-memory change is kept.
    pub fn toggle_on(&mut self, category: Category, date: DateKey) -> Result<ToggleOutcome> {
        let added = self
            .store
            .toggle(category, date)
            .with_context(|| format!("failed to save {category} completion for {date}"))?;
        Ok(ToggleOutcome { category, date, added })
    }

    /// Record today's emotional session; returns `false` if already recorded.
    ///
    /// # Errors
    /// Returns an error if the record could not be saved.
    pub fn complete_emotional_session(&mut self) -> Result<bool> {
        let today = self.today()?;
        self.store
            .complete_emotional_session(today)
            .context("failed to save emotional session")
    }

    /// Add extracted beliefs; returns the new total.
    ///
    /// # Errors
    /// Returns an error if the record could not be saved.
    pub fn record_beliefs(&mut self, count: u64) -> Result<u64> {
        self.store.record_beliefs(count).context("failed to save belief count")
    }

    /// Finish onboarding; returns `false` if it was already finished.
    ///
    /// # Errors
    /// Returns an error if the record could not be saved.
    pub fn complete_onboarding(&mut self) -> Result<bool> {
        self.store.complete_onboarding().context("failed to save onboarding state")
    }

    /// Statistics for today.
    ///
    /// # Errors
    /// Returns an error if today's date is outside the supported range.
    pub fn stats(&self) -> Result<Stats> {
        Ok(compute_stats(self.record(), self.today()?)?)
    }

    /// Everything the dashboard shows for today.
    ///
    /// # Errors
    /// Returns an error if today's date is outside the supported range.
    pub fn dashboard(&self) -> Result<Dashboard> {
        let today = self.today()?;
        let record = self.record();
        Ok(Dashboard {
            today,
            daily_done: record.is_completed(Category::Daily, today),
            weekly: weekly_status(record, today, self.schedule.weekly_review_day.weekday())?,
            monthly: monthly_status(record, today)?,
            emotional_session_done: record.emotional_sessions().contains(&today),
            onboarding_done: record.onboarding_done(),
            stats: compute_stats(record, today)?,
        })
    }

    /// Month grid for `month`, defaulting to the current month.
    ///
    /// # Errors
    /// Returns an error if today's date is outside the supported range.
    pub fn calendar(&self, month: Option<MonthCursor>) -> Result<CalendarView> {
        let today = self.today()?;
        let month = month.unwrap_or_else(|| MonthCursor::containing(today));
        Ok(CalendarView {
            month,
            cells: month.project(self.record(), today)?,
        })
    }

    /// Per-category completion state of a single day.
    pub fn day_status(&self, date: DateKey) -> Vec<CategoryStatus> {
        Category::ALL
            .into_iter()
            .map(|category| CategoryStatus {
                category,
                done: self.record().is_completed(category, date),
            })
            .collect()
    }
}

fn weekly_status(record: &HabitRecord, today: DateKey, review_day: Weekday) -> Result<PeriodicStatus> {
    let days_until = days_until_weekday(today.date(), review_day);
    if days_until == 0 {
        return Ok(PeriodicStatus::DueToday {
            done: record.is_completed(Category::Weekly, today),
        });
    }
    Ok(PeriodicStatus::Upcoming {
        date: today.offset(i64::from(days_until))?,
        days_until: i64::from(days_until),
    })
}

fn monthly_status(record: &HabitRecord, today: DateKey) -> Result<PeriodicStatus> {
    if is_last_day_of_month(today.date()) {
        return Ok(PeriodicStatus::DueToday {
            done: record.is_completed(Category::Monthly, today),
        });
    }
    let last = DateKey::new(last_day_of_month(today.date()))?;
    Ok(PeriodicStatus::Upcoming {
        date: last,
        days_until: last.days_since(today),
    })
}

/// Result of flipping one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub category: Category,
    pub date: DateKey,
    pub added: bool,
}

impl ToggleOutcome {
    /// Additions are celebrated, removals are not.
    pub const fn celebrate(&self) -> bool {
        self.added
    }
}

/// Due state of a weekly or monthly activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PeriodicStatus {
    /// Today is the scheduled day.
    DueToday { done: bool },
    /// The next scheduled day is in the future.
    Upcoming { date: DateKey, days_until: i64 },
}

/// Snapshot of today's state for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub today: DateKey,
    pub daily_done: bool,
    pub weekly: PeriodicStatus,
    pub monthly: PeriodicStatus,
    pub emotional_session_done: bool,
    pub onboarding_done: bool,
    pub stats: Stats,
}

/// Projected month ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub month: MonthCursor,
    pub cells: Vec<CellMarker>,
}

/// Completion state of one category on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStatus {
    pub category: Category,
    pub done: bool,
}

//! The persisted habit record and the categories it tracks.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::date::DateKey;
use crate::error::HabitError;

/// Recurring activity whose completions are tracked per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Daily journaling.
    Daily,
    /// Weekly review.
    Weekly,
    /// Monthly belief extraction.
    Monthly,
}

impl Category {
    /// Every category, lowest display precedence first.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// Name used on the command line and in projections.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Field holding this category's completions in the persisted blob.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Daily => "dailyCompletions",
            Self::Weekly => "weeklyCompletions",
            Self::Monthly => "monthlyCompletions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HabitError::UnknownCategory(s.to_owned()))
    }
}

pub(crate) const EMOTIONAL_SESSIONS_FIELD: &str = "emotionalSessions";
pub(crate) const BELIEF_COUNT_FIELD: &str = "beliefCount";
pub(crate) const ONBOARDING_DONE_FIELD: &str = "onboardingDone";

/// Aggregate of everything the journal remembers.
///
/// Mutation goes through [`HabitStore`](crate::store::HabitStore) so every
/// change is followed by a persist; readers only get shared references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub(crate) daily_completions: BTreeSet<DateKey>,
    pub(crate) weekly_completions: BTreeSet<DateKey>,
    pub(crate) monthly_completions: BTreeSet<DateKey>,
    pub(crate) emotional_sessions: BTreeSet<DateKey>,
    pub(crate) belief_count: u64,
    pub(crate) onboarding_done: bool,
    /// Fields found in the persisted blob that this version does not know.
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl HabitRecord {
    /// Completion set for a category.
    #[must_use]
    pub const fn completions(&self, category: Category) -> &BTreeSet<DateKey> {
        match category {
            Category::Daily => &self.daily_completions,
            Category::Weekly => &self.weekly_completions,
            Category::Monthly => &self.monthly_completions,
        }
    }

    pub(crate) const fn completions_mut(&mut self, category: Category) -> &mut BTreeSet<DateKey> {
        match category {
            Category::Daily => &mut self.daily_completions,
            Category::Weekly => &mut self.weekly_completions,
            Category::Monthly => &mut self.monthly_completions,
        }
    }

    /// Whether `category` was completed on `date`.
    #[must_use]
    pub fn is_completed(&self, category: Category, date: DateKey) -> bool {
        self.completions(category).contains(&date)
    }

    /// Categories completed on `date`, lowest precedence first.
    #[must_use]
    pub fn categories_on(&self, date: DateKey) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.is_completed(*category, date))
            .collect()
    }

    /// Dates on which an emotional session was completed.
    #[must_use]
    pub const fn emotional_sessions(&self) -> &BTreeSet<DateKey> {
        &self.emotional_sessions
    }

    /// Number of beliefs extracted so far.
    #[must_use]
    pub const fn belief_count(&self) -> u64 {
        self.belief_count
    }

    /// Whether first-run onboarding has been completed.
    #[must_use]
    pub const fn onboarding_done(&self) -> bool {
        self.onboarding_done
    }

    /// Copy of the record with `date` flipped in `category`, plus whether it was added.
    #[must_use]
    pub fn toggled(&self, category: Category, date: DateKey) -> (Self, bool) {
        let mut next = self.clone();
        let added = next.toggle(category, date);
        (next, added)
    }

    /// Flip membership of `date`; returns `true` when it was added.
    pub(crate) fn toggle(&mut self, category: Category, date: DateKey) -> bool {
        let set = self.completions_mut(category);
        if set.remove(&date) {
            false
        } else {
            set.insert(date)
        }
    }
}

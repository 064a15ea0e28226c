//! Summary numbers shown on the dashboard.

use serde::Serialize;

use crate::calendar::MonthCursor;
use crate::date::DateKey;
use crate::error::Result;
use crate::record::{Category, HabitRecord};
use crate::streak::compute_streak;

/// Derived statistics for a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Consecutive journaling days ending today or yesterday.
    pub streak: u32,
    /// Daily completions within today's month.
    pub daily_this_month: usize,
    /// Beliefs extracted so far.
    pub belief_count: u64,
    /// Weekly reviews ever completed.
    pub weekly_reviews: usize,
}

/// Compute [`Stats`] for `today`.
///
/// # Errors
/// Propagates date range errors for keys at the edge of the supported range.
pub fn compute_stats(record: &HabitRecord, today: DateKey) -> Result<Stats> {
    let daily = record.completions(Category::Daily);
    let month = MonthCursor::containing(today);
    let daily_this_month = daily.range(month.first()?..=month.last()?).count();

    Ok(Stats {
        streak: compute_streak(daily, today),
        daily_this_month,
        belief_count: record.belief_count(),
        weekly_reviews: record.completions(Category::Weekly).len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::load;

    #[test]
    fn counts_only_current_month() -> Result<()> {
        let record = load(Some(
            r#"{
                "dailyCompletions": ["2024-02-29", "2024-03-01", "2024-03-02", "2024-03-31", "2024-04-01"],
                "weeklyCompletions": ["2024-02-25", "2024-03-03"],
                "beliefCount": 7
            }"#,
        ));
        let today: DateKey = "2024-03-02".parse()?;
        let stats = compute_stats(&record, today)?;
        assert_eq!(
            stats,
            Stats {
                streak: 0,
                daily_this_month: 3,
                belief_count: 7,
                weekly_reviews: 2,
            }
        );
        Ok(())
    }

    #[test]
    fn streak_counts_up_to_today() -> Result<()> {
        let record = load(Some(r#"{"dailyCompletions": ["2024-02-29", "2024-03-01", "2024-03-02"]}"#));
        let stats = compute_stats(&record, "2024-03-02".parse()?)?;
        assert_eq!(stats.streak, 3);
        assert_eq!(stats.daily_this_month, 2);
        Ok(())
    }

    #[test]
    fn empty_record_is_all_zero() -> Result<()> {
        let stats = compute_stats(&HabitRecord::default(), "2024-03-02".parse()?)?;
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.daily_this_month, 0);
        assert_eq!(stats.belief_count, 0);
        assert_eq!(stats.weekly_reviews, 0);
        Ok(())
    }
}

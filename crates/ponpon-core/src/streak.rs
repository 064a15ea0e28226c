//! Consecutive-day streak of daily journaling.

use std::collections::BTreeSet;

use crate::date::DateKey;

/// Current streak of consecutive completed days ending today or yesterday.
///
/// The latest completion decides whether the streak is alive: if it is
/// neither today nor yesterday (including a date after today) the streak is
/// broken and 0 is returned.
#[must_use]
pub fn compute_streak(daily: &BTreeSet<DateKey>, today: DateKey) -> u32 {
    let mut latest_first = daily.iter().rev();
    let Some(&latest) = latest_first.next() else {
        return 0;
    };
    if !matches!(today.days_since(latest), 0 | 1) {
        return 0;
    }

    let mut streak = 1_u32;
    let mut newer = latest;
    for &older in latest_first {
        // Adjacent entries in key order can be far apart on the calendar.
        if newer.days_since(older) != 1 {
            break;
        }
        streak = streak.saturating_add(1);
        newer = older;
    }
    streak
}

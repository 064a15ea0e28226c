//! Plain-text rendering of dashboard, calendar and day views.

use std::fmt::Write as _;

use ponpon_app::{CalendarView, CategoryStatus, Dashboard, PeriodicStatus, ToggleOutcome};
use ponpon_core::{Category, CellMarker, DateKey, Marker, Stats};
use time::Weekday;

const CELL_WIDTH: usize = 6;
const WEEKDAY_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const fn label(category: Category) -> &'static str {
    match category {
        Category::Daily => "Daily journaling",
        Category::Weekly => "Weekly review",
        Category::Monthly => "Monthly belief extraction",
    }
}

const fn check(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", dashboard.today, dashboard.today.date().weekday());
    if !dashboard.onboarding_done {
        let _ = writeln!(out, "Welcome! Run `ponpon onboarding done` once you have set things up.");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{} {:<26}", check(dashboard.daily_done), label(Category::Daily));
    let _ = writeln!(out, "{}", periodic_line(Category::Weekly, dashboard.weekly));
    let _ = writeln!(out, "{}", periodic_line(Category::Monthly, dashboard.monthly));
    if dashboard.emotional_session_done {
        let _ = writeln!(out, "[x] Emotional session");
    }
    let _ = writeln!(out);
    out.push_str(&render_stats(&dashboard.stats));
    out
}

fn periodic_line(category: Category, status: PeriodicStatus) -> String {
    match status {
        PeriodicStatus::DueToday { done } => format!("{} {:<26} due today", check(done), label(category)),
        PeriodicStatus::Upcoming { date, days_until } => {
            format!(
                "    {:<26} next: {} {} (in {})",
                label(category),
                date.date().weekday(),
                date,
                count_of(u64::try_from(days_until).unwrap_or(0), "day", "days")
            )
        }
    }
}

fn count_of(count: u64, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

fn as_count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

pub fn render_stats(stats: &Stats) -> String {
    format!(
        "Streak: {}\nThis month: {}\nBeliefs: {}\nWeekly reviews: {}\n",
        count_of(u64::from(stats.streak), "day", "days"),
        count_of(as_count(stats.daily_this_month), "entry", "entries"),
        stats.belief_count,
        stats.weekly_reviews,
    )
}

/// Month grid; `>` marks today, D/W/M the primary completion and lowercase letters the hidden ones.
pub fn render_calendar(view: &CalendarView, week_start: Weekday) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^width$}", view.month.to_string(), width = CELL_WIDTH * 7);

    let start = usize::from(week_start.number_days_from_sunday());
    for offset in 0..7 {
        let _ = write!(out, "{:^width$}", WEEKDAY_LABELS[(start + offset) % 7], width = CELL_WIDTH);
    }
    out.push('\n');

    let blanks = usize::from(view.month.leading_blanks(week_start).unwrap_or(0));
    let mut column = 0;
    for _ in 0..blanks {
        out.push_str(&" ".repeat(CELL_WIDTH));
        column += 1;
    }
    for cell in &view.cells {
        out.push_str(&render_cell(cell));
        column += 1;
        if column % 7 == 0 {
            out.push('\n');
        }
    }
    if column % 7 != 0 {
        out.push('\n');
    }
    out.push_str("D daily  W weekly  M monthly  (lowercase: also completed)\n");
    out
}

fn render_cell(cell: &CellMarker) -> String {
    let today = if cell.is_today { '>' } else { ' ' };
    let primary = match cell.primary {
        Marker::None => ' ',
        Marker::Daily => 'D',
        Marker::Weekly => 'W',
        Marker::Monthly => 'M',
    };
    let secondary: String = cell
        .secondary
        .iter()
        .map(|category| match category {
            Category::Daily => 'd',
            Category::Weekly => 'w',
            Category::Monthly => 'm',
        })
        .collect();
    format!("{today}{:>2}{primary}{secondary:<2}", cell.day)
}

pub fn render_day(date: DateKey, statuses: &[CategoryStatus]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{date} ({})", date.date().weekday());
    for status in statuses {
        let _ = writeln!(out, "{} {}", check(status.done), label(status.category));
    }
    out
}

pub fn render_toggle(outcome: &ToggleOutcome) -> String {
    if outcome.celebrate() {
        format!("🎉 {} recorded for {}. Keep it up!\n", label(outcome.category), outcome.date)
    } else {
        format!("{} removed for {}.\n", label(outcome.category), outcome.date)
    }
}

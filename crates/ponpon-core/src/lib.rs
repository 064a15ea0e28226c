//! Date-keyed habit state model for ponpon-journal.
//!
//! Tracks daily journaling, weekly reviews and monthly belief extraction as
//! sets of calendar dates, derives the journaling streak and projects the
//! record onto a month grid.

/// Month grid projection.
pub mod calendar;
/// Date keys, the clock and calendar helpers.
pub mod date;
/// Error types.
pub mod error;
/// The persisted record.
pub mod record;
/// Dashboard statistics.
pub mod stats;
/// Loading and persisting the record.
pub mod store;
/// Journaling streak.
pub mod streak;

pub use calendar::{CellMarker, Marker, MonthCursor, project_month};
pub use date::{
    Clock, DateKey, FixedClock, SystemClock, day_of_week, days_until_next_occurrence, is_last_day_of_local_month,
    offset_key, today_key, weekday_from_index,
};
pub use error::{HabitError, Result};
pub use record::{Category, HabitRecord};
pub use stats::{Stats, compute_stats};
pub use store::{HabitStore, MemoryMedium, StateMedium, encode, load};
pub use streak::compute_streak;

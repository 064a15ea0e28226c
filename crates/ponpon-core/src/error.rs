//! Error types for habit state operations.

use std::error::Error as StdError;

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, HabitError>;

/// Boxed error raised by a [`StateMedium`](crate::store::StateMedium).
pub type MediumError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced by the habit state model.
#[derive(Debug, Error)]
pub enum HabitError {
    /// A date key was not a well-formed `YYYY-MM-DD` calendar date.
    #[error("invalid date key {0:?}: expected YYYY-MM-DD")]
    InvalidDateKey(String),

    /// Year/month pair does not name a calendar month.
    #[error("invalid calendar month: {year}-{month:02}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month number (1-based).
        month: u8,
    },

    /// Weekday index outside `0..=6`.
    #[error("invalid weekday index {0}: expected 0..=6")]
    InvalidWeekday(u8),

    /// Category name not recognised.
    #[error("unknown habit category: {0}")]
    UnknownCategory(String),

    /// Date arithmetic left the representable `0000..=9999` range.
    #[error("date out of supported range")]
    DateOutOfRange,

    /// Failed to serialize the record.
    #[error("failed to encode habit record: {0}")]
    Encode(#[from] serde_json::Error),

    /// The persistence medium could not be read.
    #[error("failed to read persisted habit record: {0}")]
    Read(#[source] MediumError),

    /// The persistence medium rejected the write. The in-memory record stays valid.
    #[error("failed to persist habit record: {0}")]
    Persist(#[source] MediumError),
}

impl HabitError {
    /// True for errors caused by caller input that could not be interpreted.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateKey(_)
                | Self::InvalidMonth { .. }
                | Self::InvalidWeekday(_)
                | Self::UnknownCategory(_)
                | Self::DateOutOfRange
        )
    }
}

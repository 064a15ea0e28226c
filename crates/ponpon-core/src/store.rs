//! Loading, mutating and persisting the habit record.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::date::DateKey;
use crate::error::{HabitError, Result};
use crate::record::{BELIEF_COUNT_FIELD, Category, EMOTIONAL_SESSIONS_FIELD, HabitRecord, ONBOARDING_DONE_FIELD};

/// Get/set-string persistence contract for the single record blob.
pub trait StateMedium {
    /// Error type bubbled up from the backing medium.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the stored blob, `None` when nothing was saved yet.
    ///
    /// # Errors
    /// Returns a medium-specific error when the blob cannot be read.
    fn get(&self) -> std::result::Result<Option<String>, Self::Error>;

    /// Replace the stored blob.
    ///
    /// # Errors
    /// Returns a medium-specific error when the write is rejected.
    fn set(&mut self, blob: &str) -> std::result::Result<(), Self::Error>;
}

impl<M: StateMedium + ?Sized> StateMedium for &mut M {
    type Error = M::Error;

    fn get(&self) -> std::result::Result<Option<String>, Self::Error> {
        (**self).get()
    }

    fn set(&mut self, blob: &str) -> std::result::Result<(), Self::Error> {
        (**self).set(blob)
    }
}

/// Parse a persisted blob, merging it over the default record.
///
/// Absent, empty or unparseable input yields [`HabitRecord::default`]. When
/// the blob is an object, each known field is salvaged on its own: a field of
/// the wrong type keeps its default and date entries that are not valid keys
/// are dropped. Unknown fields are kept and written back on the next persist.
#[must_use]
pub fn load(blob: Option<&str>) -> HabitRecord {
    let Some(raw) = blob.filter(|raw| !raw.trim().is_empty()) else {
        return HabitRecord::default();
    };
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "persisted habit record is not valid JSON, using defaults");
            return HabitRecord::default();
        }
    };
    let Value::Object(mut fields) = value else {
        warn!("persisted habit record is not an object, using defaults");
        return HabitRecord::default();
    };

    let mut record = HabitRecord::default();
    for category in Category::ALL {
        if let Some(value) = fields.remove(category.field_name()) {
            *record.completions_mut(category) = salvage_keys(category.field_name(), value);
        }
    }
    if let Some(value) = fields.remove(EMOTIONAL_SESSIONS_FIELD) {
        record.emotional_sessions = salvage_keys(EMOTIONAL_SESSIONS_FIELD, value);
    }
    if let Some(value) = fields.remove(BELIEF_COUNT_FIELD) {
        match value.as_u64() {
            Some(count) => record.belief_count = count,
            None => warn!(field = BELIEF_COUNT_FIELD, %value, "expected a non-negative integer, using default"),
        }
    }
    if let Some(value) = fields.remove(ONBOARDING_DONE_FIELD) {
        match value.as_bool() {
            Some(done) => record.onboarding_done = done,
            None => warn!(field = ONBOARDING_DONE_FIELD, %value, "expected a boolean, using default"),
        }
    }
    record.extra = fields;
    record
}

fn salvage_keys(field: &str, value: Value) -> BTreeSet<DateKey> {
    let Value::Array(entries) = value else {
        warn!(field, "expected an array of date keys, using default");
        return BTreeSet::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| match entry.as_str().map(str::parse::<DateKey>) {
            Some(Ok(key)) => Some(key),
            _ => {
                warn!(field, %entry, "dropping malformed date key");
                None
            }
        })
        .collect()
}

/// Serialize the full record into its persisted form.
///
/// # Errors
/// Returns [`HabitError::Encode`] if serialization fails.
pub fn encode(record: &HabitRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Owner of the single in-memory record and its persistence medium.
#[derive(Debug)]
pub struct HabitStore<M> {
    medium: M,
    record: HabitRecord,
}

impl<M: StateMedium> HabitStore<M> {
    /// Read the medium once and build the record from whatever it holds.
    ///
    /// # Errors
    /// Returns [`HabitError::Read`] when the medium itself fails. Malformed
    /// content is not an error.
    pub fn open(medium: M) -> Result<Self> {
        let blob = medium.get().map_err(|err| HabitError::Read(Box::new(err)))?;
        let record = load(blob.as_deref());
        debug!(
            daily = record.daily_completions.len(),
            weekly = record.weekly_completions.len(),
            monthly = record.monthly_completions.len(),
            "Loaded habit record"
        );
        Ok(Self { medium, record })
    }

    /// Flip `date` in `category` and persist; returns `true` when it was added.
    ///
    /// # Errors
    /// Returns [`HabitError::Persist`] if the write fails; the toggle is still
    /// applied to the in-memory record.
    pub fn toggle(&mut self, category: Category, date: DateKey) -> Result<bool> {
        let added = self.record.toggle(category, date);
        info!(%category, %date, added, "Toggled completion");
        self.persist()?;
        Ok(added)
    }

    /// Like [`toggle`](Self::toggle) but parses the textual key first.
    ///
    /// # Errors
    /// Returns [`HabitError::InvalidDateKey`] without touching the record when
    /// `date` is malformed, or [`HabitError::Persist`] if the write fails.
    pub fn toggle_key(&mut self, category: Category, date: &str) -> Result<bool> {
        let date: DateKey = date.parse()?;
        self.toggle(category, date)
    }

    /// Record an emotional session on `date`; returns `false` if one was already recorded.
    ///
    /// # Errors
    /// Returns [`HabitError::Persist`] if the write fails.
    pub fn complete_emotional_session(&mut self, date: DateKey) -> Result<bool> {
        if !self.record.emotional_sessions.insert(date) {
            return Ok(false);
        }
        info!(%date, "Recorded emotional session");
        self.persist()?;
        Ok(true)
    }

    /// Add `count` extracted beliefs; returns the new total.
    ///
    /// # Errors
    /// Returns [`HabitError::Persist`] if the write fails.
    pub fn record_beliefs(&mut self, count: u64) -> Result<u64> {
        if count == 0 {
            return Ok(self.record.belief_count);
        }
        self.record.belief_count = self.record.belief_count.saturating_add(count);
        info!(added = count, total = self.record.belief_count, "Recorded beliefs");
        self.persist()?;
        Ok(self.record.belief_count)
    }

    /// Mark onboarding as done; returns `false` if it already was.
    ///
    /// # Errors
    /// Returns [`HabitError::Persist`] if the write fails.
    pub fn complete_onboarding(&mut self) -> Result<bool> {
        if self.record.onboarding_done {
            return Ok(false);
        }
        self.record.onboarding_done = true;
        info!("Completed onboarding");
        self.persist()?;
        Ok(true)
    }

    /// Write the full record to the medium.
    ///
    /// # Errors
    /// Returns [`HabitError::Encode`] or [`HabitError::Persist`].
    pub fn persist(&mut self) -> Result<()> {
        let blob = encode(&self.record)?;
        self.medium
            .set(&blob)
            .map_err(|err| HabitError::Persist(Box::new(err)))?;
        debug!(bytes = blob.len(), "Persisted habit record");
        Ok(())
    }
}

impl<M> HabitStore<M> {
    /// Read-only view of the current record.
    pub const fn record(&self) -> &HabitRecord {
        &self.record
    }

    /// Borrow the persistence medium.
    pub const fn medium(&self) -> &M {
        &self.medium
    }

    /// Give back the medium and the last in-memory record.
    pub fn into_parts(self) -> (M, HabitRecord) {
        (self.medium, self.record)
    }
}

/// Write rejected by a [`MemoryMedium`] configured to fail.
#[derive(Debug, Error)]
#[error("in-memory medium rejected the write")]
pub struct WriteRejected;

/// Medium keeping the blob in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    blob: Option<String>,
    reject_writes: bool,
}

impl MemoryMedium {
    /// Empty medium.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blob: None,
            reject_writes: false,
        }
    }

    /// Medium pre-filled with `blob`.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            reject_writes: false,
        }
    }

    /// Make every subsequent write fail.
    #[must_use]
    pub const fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Currently stored blob.
    #[must_use]
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl StateMedium for MemoryMedium {
    type Error = WriteRejected;

    fn get(&self) -> std::result::Result<Option<String>, Self::Error> {
        Ok(self.blob.clone())
    }

    fn set(&mut self, blob: &str) -> std::result::Result<(), Self::Error> {
        if self.reject_writes {
            return Err(WriteRejected);
        }
        self.blob = Some(blob.to_owned());
        Ok(())
    }
}

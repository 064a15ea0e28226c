//! Application layer logic for ponpon-journal.
//!
//! This crate provides configuration and the service façade shared by the
//! command line front end.

pub mod config;
pub mod service;

// Re-exports for convenience
pub use config::{AppConfig, CalendarConfig, ScheduleConfig, StorageConfig, WeekdayName};
pub use service::{CalendarView, CategoryStatus, Dashboard, HabitService, PeriodicStatus, ToggleOutcome};

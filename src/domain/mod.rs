/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, PeriodRecord, DateKey) and
/// their validation rules, plus the pure date/period and streak logic the
/// rollover engine builds on.

pub mod dates;
pub mod habit;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid date key: {0}")]
    InvalidDateKey(String),

    #[error("Invalid reminder time: {0}")]
    InvalidReminderTime(String),
}

/// Core types used throughout the domain layer
///
/// This module defines the fundamental types like HabitId, DateKey, and
/// ResetFrequency that are shared by the habit entity, the rollover engine,
/// and the history layer.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// Stored as an opaque string so that ids written by earlier versions of the
/// app (counter-style ids like `habit_3_1680000000`) keep working unchanged.
/// Freshly created habits get a UUIDv4 string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing id string (used when loading persisted records)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Legacy records may carry an empty id; those are keyed only by their
    /// position in the persisted map and need the key copied back in.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical `YYYY-MM-DD` key identifying a calendar day in local time
///
/// All history maps are keyed by this type. A DateKey can only be built from
/// a `NaiveDate` (or parsed from an exactly canonical string), so two
/// different textual forms of the same day can never coexist as keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Parse a stored key, accepting only the canonical zero-padded form
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| DomainError::InvalidDateKey(s.to_string()))?;
        let canonical = Self::from(date);
        if canonical.0 != s {
            return Err(DomainError::InvalidDateKey(s.to_string()));
        }
        Ok(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_date(&self) -> NaiveDate {
        // Keys are only constructed from valid dates, so this cannot fail.
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").unwrap_or_default()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How often a habit's tracking period resets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetFrequency {
    Daily,
    /// Default cadence, also used when repairing legacy records
    #[default]
    Weekly,
    Monthly,
}

impl ResetFrequency {
    pub fn display_name(&self) -> &'static str {
        match self {
            ResetFrequency::Daily => "daily",
            ResetFrequency::Weekly => "weekly",
            ResetFrequency::Monthly => "monthly",
        }
    }
}

/// Two-valued completion tag stored in the global history
///
/// Serialized strictly as `"completed"` / `"not_completed"`; any other stored
/// value is treated as corrupt data and dropped at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Completed,
    NotCompleted,
}

impl CompletionStatus {
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            CompletionStatus::Completed
        } else {
            CompletionStatus::NotCompleted
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CompletionStatus::Completed)
    }
}

/// Immutable snapshot of a period's final state, stored in habit history
///
/// Written once when the rollover engine closes a period; today's entry is
/// the one exception and is overwritten live as progress changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub completed: bool,
    pub progress: u32,
    pub target: u32,
}

/// Categories for organizing habits into life areas
///
/// Display-only grouping; no engine logic depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mind,
    Body,
    Spirit,
    #[default]
    Other,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Mind => "Mind",
            Category::Body => "Body",
            Category::Spirit => "Spirit",
            Category::Other => "Other",
        }
    }
}

/// Time of day a habit's reminder should fire, at minute granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTime {
    pub hour: u8,
    pub minute: u8,
}

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::InvalidReminderTime(format!(
                "{:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Parse a `HH:MM` string (the form the reminder form produces)
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidReminderTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }

    /// Whether this reminder matches the given wall-clock time, checked at
    /// minute granularity (the reminder tick runs once per minute)
    pub fn matches(&self, time: NaiveTime) -> bool {
        time.hour() == self.hour as u32 && time.minute() == self.minute as u32
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

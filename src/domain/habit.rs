/// Habit entity and lifecycle helpers
///
/// This module defines the core Habit struct: a recurring goal with a numeric
/// target, a reset cadence, and the per-habit completion history the rollover
/// engine maintains.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Category, DateKey, DomainError, HabitId, PeriodRecord, ReminderTime, ResetFrequency,
};

/// Color applied to habits created without an explicit one
pub const DEFAULT_COLOR: &str = "#2196F3";

/// A habit the user wants to track
///
/// `progress` accumulates within the current period and is bounded by
/// `target`; `last_updated` marks the start of the period `progress` belongs
/// to. It is optional in the type because records written by early versions
/// of the app lack it; the rollover engine repairs those in place instead of
/// rejecting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier; legacy records may omit it, in which case the
    /// loader copies the persisted map key back in
    #[serde(default)]
    pub id: HabitId,
    /// Display name (e.g., "Drink Water")
    pub name: String,
    /// Display color token; not semantically load-bearing
    #[serde(default)]
    pub color: String,
    /// Optional icon reference, opaque to the engine
    #[serde(default)]
    pub icon: Option<String>,
    /// Life-area grouping
    #[serde(default)]
    pub category: Category,
    /// Goal count for the current period, always >= 1
    pub target: u32,
    /// Accumulated count for the current period, 0 <= progress <= target
    #[serde(default)]
    pub progress: u32,
    /// Cadence at which the period rolls over
    #[serde(default)]
    pub reset_frequency: ResetFrequency,
    /// Start of the period currently represented by `progress`
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
    /// Closed-period snapshots keyed by the period's date
    #[serde(default)]
    pub history: BTreeMap<DateKey, PeriodRecord>,
    /// Count of consecutive completed periods
    #[serde(default)]
    pub streak: u32,
    /// Period last credited to the streak; doubles as the double-count guard
    #[serde(default)]
    pub last_streak_date: Option<DateKey>,
    /// Optional daily reminder time
    #[serde(default)]
    pub reminder_time: Option<ReminderTime>,
    #[serde(default)]
    pub reminder_enabled: bool,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// New habits start with zero progress, an empty history, and the period
    /// opened at the creation instant.
    pub fn new(
        name: String,
        color: String,
        icon: Option<String>,
        category: Category,
        target: u32,
        reset_frequency: ResetFrequency,
        now: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_target(target)?;

        let color = if color.trim().is_empty() {
            DEFAULT_COLOR.to_string()
        } else {
            color
        };

        Ok(Self {
            id: HabitId::new(),
            name,
            color,
            icon,
            category,
            target,
            progress: 0,
            reset_frequency,
            last_updated: Some(now),
            history: BTreeMap::new(),
            streak: 0,
            last_streak_date: None,
            reminder_time: None,
            reminder_enabled: false,
        })
    }

    /// Apply a partial update with validation
    ///
    /// Fields left as `None` are unchanged. Shrinking the target clamps any
    /// now-out-of-range progress so the bounds invariant keeps holding.
    pub fn apply_update(&mut self, update: HabitUpdate) -> Result<(), DomainError> {
        if let Some(ref name) = update.name {
            Self::validate_name(name)?;
        }
        if let Some(target) = update.target {
            Self::validate_target(target)?;
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(color) = update.color {
            if !color.trim().is_empty() {
                self.color = color;
            }
        }
        if let Some(icon) = update.icon {
            self.icon = icon;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(target) = update.target {
            self.target = target;
            self.progress = self.progress.min(target);
        }
        if let Some(frequency) = update.reset_frequency {
            self.reset_frequency = frequency;
        }
        if let Some(reminder_time) = update.reminder_time {
            self.reminder_time = reminder_time;
        }
        if let Some(enabled) = update.reminder_enabled {
            self.reminder_enabled = enabled;
        }

        Ok(())
    }

    /// Whether the current period's goal has been reached
    pub fn is_complete(&self) -> bool {
        self.progress >= self.target
    }

    /// Repair a freshly deserialized record so the engine's invariants hold
    ///
    /// Returns an error only for records too damaged to keep (the caller
    /// drops those and proceeds); partial records are patched with defaults.
    pub fn sanitize(&mut self, key: &str) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidHabitName(
                "habit record has an empty name".to_string(),
            ));
        }
        if self.target == 0 {
            return Err(DomainError::InvalidTarget(
                "habit record has a zero target".to_string(),
            ));
        }
        if self.id.is_empty() {
            self.id = HabitId::from_string(key);
        }
        if self.color.trim().is_empty() {
            self.color = DEFAULT_COLOR.to_string();
        }
        // Older data may hold progress beyond the target.
        self.progress = self.progress.min(self.target);
        Ok(())
    }

    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "habit name cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > 100 {
            return Err(DomainError::InvalidHabitName(
                "habit name cannot be longer than 100 characters".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_target(target: u32) -> Result<(), DomainError> {
        if target == 0 {
            return Err(DomainError::InvalidTarget(
                "target must be greater than 0".to_string(),
            ));
        }
        if target > 100 {
            return Err(DomainError::InvalidTarget(
                "target cannot exceed 100".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial habit update; `None` fields are left unchanged
///
/// The doubled options on `icon` and `reminder_time` distinguish "don't
/// touch" from "clear the value".
#[derive(Debug, Clone, Default)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<Option<String>>,
    pub category: Option<Category>,
    pub target: Option<u32>,
    pub reset_frequency: Option<ResetFrequency>,
    pub reminder_time: Option<Option<ReminderTime>>,
    pub reminder_enabled: Option<bool>,
}

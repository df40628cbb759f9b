/// Completion history and calendar queries
///
/// Two overlapping history representations coexist: per-habit snapshots
/// written by the rollover engine, and a global cross-habit map populated by
/// the explicit daily-status sweep. They are not kept in sync; queries
/// reconcile them with a fixed precedence (per-habit wins).

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::dates::date_key;
use crate::domain::{CompletionStatus, DateKey, Habit, HabitId};

/// Denormalized cross-habit history: date -> stored key -> status
///
/// The inner key is a habit id for data written by current versions; records
/// from before stable ids existed may be keyed by the habit's display name,
/// which the query layer falls back to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalHistory {
    days: BTreeMap<DateKey, BTreeMap<String, CompletionStatus>>,
}

impl GlobalHistory {
    /// Rebuild from a raw persisted record, dropping anything corrupt
    ///
    /// Non-canonical date keys and status values outside the two-valued tag
    /// set are discarded entry by entry; whatever parses cleanly survives.
    pub fn from_value(value: serde_json::Value) -> Self {
        let mut history = GlobalHistory::default();
        let serde_json::Value::Object(days) = value else {
            tracing::warn!("global history record is not an object, starting empty");
            return history;
        };

        for (date_raw, entries) in days {
            let Ok(date) = DateKey::parse(&date_raw) else {
                tracing::warn!(key = %date_raw, "dropping history entries under malformed date key");
                continue;
            };
            let serde_json::Value::Object(entries) = entries else {
                tracing::warn!(date = %date, "dropping non-object history day");
                continue;
            };
            for (habit_key, status) in entries {
                match serde_json::from_value::<CompletionStatus>(status) {
                    Ok(status) => {
                        history.record(date.clone(), habit_key, status);
                    }
                    Err(_) => {
                        tracing::warn!(date = %date, habit = %habit_key, "dropping corrupt status value");
                    }
                }
            }
        }

        history
    }

    pub fn record(&mut self, date: DateKey, habit_key: impl Into<String>, status: CompletionStatus) {
        self.days.entry(date).or_default().insert(habit_key.into(), status);
    }

    pub fn day(&self, date: &DateKey) -> Option<&BTreeMap<String, CompletionStatus>> {
        self.days.get(date)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Record every habit's current completion status under today's date
///
/// This is the explicit whole-day sweep; it is the only writer of the global
/// history (per-habit history is written by the rollover engine and the
/// progress operation).
pub fn record_daily_status(
    habits: &BTreeMap<HabitId, Habit>,
    history: &mut GlobalHistory,
    now: NaiveDateTime,
) {
    let today = date_key(now);
    for habit in habits.values() {
        history.record(
            today.clone(),
            habit.id.as_str(),
            CompletionStatus::from_completed(habit.is_complete()),
        );
    }
    tracing::debug!(date = %today, habits = habits.len(), "recorded daily status");
}

/// Resolve a habit's completion status on a given date
///
/// Precedence, first match wins:
/// 1. the habit's own history snapshot for that date;
/// 2. the global history entry under the habit's id;
/// 3. a global entry keyed by the habit's display name (legacy data written
///    before stable ids existed);
/// 4. nothing recorded.
pub fn completion_status(
    habit: &Habit,
    date: &DateKey,
    history: &GlobalHistory,
) -> Option<CompletionStatus> {
    if let Some(record) = habit.history.get(date) {
        return Some(CompletionStatus::from_completed(record.completed));
    }

    let day = history.day(date)?;
    if let Some(status) = day.get(habit.id.as_str()) {
        return Some(*status);
    }
    day.get(habit.name.as_str()).copied()
}

/// Per-day completion counts for the calendar view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub completed: usize,
    pub not_completed: usize,
}

impl DaySummary {
    pub fn total(&self) -> usize {
        self.completed + self.not_completed
    }
}

/// Count completion outcomes for one day, optionally restricted to a single
/// habit
///
/// The filter is an explicit parameter so independent views can query
/// concurrently without shared selection state.
pub fn day_summary(
    habits: &BTreeMap<HabitId, Habit>,
    date: &DateKey,
    history: &GlobalHistory,
    filter: Option<&HabitId>,
) -> DaySummary {
    let mut summary = DaySummary::default();
    for habit in habits.values() {
        if let Some(filter) = filter {
            if habit.id != *filter {
                continue;
            }
        }
        match completion_status(habit, date, history) {
            Some(CompletionStatus::Completed) => summary.completed += 1,
            Some(CompletionStatus::NotCompleted) => summary.not_completed += 1,
            None => {}
        }
    }
    summary
}

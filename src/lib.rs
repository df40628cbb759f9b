/// Public library interface for the Atomic Momentum habit engine
///
/// The engine tracks recurring habits with numeric targets and a reset
/// cadence, closing finished periods into history and maintaining streak
/// counts. `MomentumApp` is the facade UI frontends drive: it owns the habit
/// map, the global history, and the injected persistence port, and performs
/// every mutation and its write-through save synchronously.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use thiserror::Error;

pub mod domain;
pub mod engine;
pub mod reminder;
pub mod storage;

pub use domain::*;
pub use engine::{
    apply_progress_delta, completion_status, day_summary, evaluate_rollovers,
    record_daily_status, DaySummary, GlobalHistory, ProgressUpdate, RolloverOutcome,
};
pub use reminder::{due_reminders, ReminderNotifier, ReminderTicker, REMINDER_TICK};
pub use storage::{JsonFileStore, RecordStore, StorageError};

use storage::{DARK_MODE_KEY, HABITS_KEY, HISTORY_KEY, NOTIFICATIONS_KEY, PROJECTS_KEY};

/// Errors surfaced by the application facade
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Habit not found: {0}")]
    HabitNotFound(HabitId),
}

/// The habit tracker application state
///
/// All operations follow load-modify-save: the mutation happens in memory
/// and is written through the persistence port before the call returns. A
/// failed save is logged and the in-memory effect stands, so storage can lag
/// memory until the next successful save, never the other way around.
pub struct MomentumApp {
    store: Box<dyn RecordStore>,
    habits: BTreeMap<HabitId, Habit>,
    history: GlobalHistory,
    /// Unrelated project records; persisted alongside but opaque to the core
    projects: serde_json::Value,
    dark_mode: bool,
    /// Tri-state: `None` means the user has never been asked
    notifications_enabled: Option<bool>,
}

impl MomentumApp {
    /// Load persisted state and settle any pending period rollovers
    ///
    /// Corrupt records are discarded entry by entry and defaults proceed in
    /// their place. If any habit rolled over (the app may not have been
    /// opened for days), the changed state is recorded into the global
    /// history and persisted before this returns.
    pub fn open(store: Box<dyn RecordStore>, now: NaiveDateTime) -> Result<Self, AppError> {
        let habits = match store.load(HABITS_KEY)? {
            Some(value) => Self::habits_from_value(value),
            None => BTreeMap::new(),
        };
        let history = match store.load(HISTORY_KEY)? {
            Some(value) => GlobalHistory::from_value(value),
            None => GlobalHistory::default(),
        };
        let projects = store
            .load(PROJECTS_KEY)?
            .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
        let dark_mode = store
            .load(DARK_MODE_KEY)?
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let notifications_enabled = store.load(NOTIFICATIONS_KEY)?.and_then(|v| v.as_bool());

        let mut app = Self {
            store,
            habits,
            history,
            projects,
            dark_mode,
            notifications_enabled,
        };

        tracing::info!(habits = app.habits.len(), "loaded habit state");

        let outcome = engine::evaluate_rollovers(&mut app.habits, now);
        if outcome.changed {
            tracing::info!(
                closed = outcome.periods_closed,
                repaired = outcome.repaired,
                "periods rolled over on startup"
            );
            engine::record_daily_status(&app.habits, &mut app.history, now);
            app.persist_habits();
            app.persist_history();
        }

        Ok(app)
    }

    // --- habit CRUD ---

    /// Create a new habit and persist it
    pub fn create_habit(
        &mut self,
        name: String,
        color: String,
        icon: Option<String>,
        category: Category,
        target: u32,
        reset_frequency: ResetFrequency,
        now: NaiveDateTime,
    ) -> Result<HabitId, AppError> {
        let habit = Habit::new(name, color, icon, category, target, reset_frequency, now)?;
        let id = habit.id.clone();
        tracing::debug!(habit = %id, name = %habit.name, "created habit");
        self.habits.insert(id.clone(), habit);
        self.persist_habits();
        Ok(id)
    }

    /// Apply a partial update to an existing habit and persist it
    pub fn update_habit(&mut self, id: &HabitId, update: HabitUpdate) -> Result<(), AppError> {
        let habit = self
            .habits
            .get_mut(id)
            .ok_or_else(|| AppError::HabitNotFound(id.clone()))?;
        habit.apply_update(update)?;
        self.persist_habits();
        Ok(())
    }

    /// Delete a habit permanently, including its history. No tombstoning.
    pub fn delete_habit(&mut self, id: &HabitId) -> Result<(), AppError> {
        if self.habits.remove(id).is_none() {
            return Err(AppError::HabitNotFound(id.clone()));
        }
        tracing::debug!(habit = %id, "deleted habit");
        self.persist_habits();
        Ok(())
    }

    pub fn habit(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.get(id)
    }

    pub fn habits(&self) -> &BTreeMap<HabitId, Habit> {
        &self.habits
    }

    // --- engine operations ---

    /// Increment or decrement the current period's progress
    ///
    /// Out-of-range deltas are a silent no-op (`ProgressUpdate::Rejected`).
    /// Completing the period triggers the daily-status sweep so the global
    /// history picks up the completion immediately.
    pub fn adjust_progress(
        &mut self,
        id: &HabitId,
        delta: i64,
        now: NaiveDateTime,
    ) -> Result<ProgressUpdate, AppError> {
        let habit = self
            .habits
            .get_mut(id)
            .ok_or_else(|| AppError::HabitNotFound(id.clone()))?;

        let was_complete = habit.is_complete();
        let update = engine::apply_progress_delta(habit, delta, now);

        if update.is_applied() {
            if let ProgressUpdate::Applied { completed: true } = update {
                if !was_complete {
                    engine::record_daily_status(&self.habits, &mut self.history, now);
                    self.persist_history();
                }
            }
            self.persist_habits();
        }
        Ok(update)
    }

    /// Re-evaluate period boundaries, e.g. when the app resumes
    pub fn evaluate_rollovers(&mut self, now: NaiveDateTime) -> RolloverOutcome {
        let outcome = engine::evaluate_rollovers(&mut self.habits, now);
        if outcome.changed {
            engine::record_daily_status(&self.habits, &mut self.history, now);
            self.persist_habits();
            self.persist_history();
        }
        outcome
    }

    /// Record every habit's current status under today's date
    pub fn record_daily_status(&mut self, now: NaiveDateTime) {
        engine::record_daily_status(&self.habits, &mut self.history, now);
        self.persist_history();
    }

    /// Was the habit completed on the given date? `None` if nothing recorded
    pub fn completion_status(&self, id: &HabitId, date: &DateKey) -> Option<CompletionStatus> {
        let habit = self.habits.get(id)?;
        engine::completion_status(habit, date, &self.history)
    }

    /// Completion counts for one calendar day, optionally for a single habit
    pub fn day_summary(&self, date: &DateKey, filter: Option<&HabitId>) -> DaySummary {
        engine::day_summary(&self.habits, date, &self.history, filter)
    }

    /// Habits whose enabled reminder matches the current minute
    pub fn due_reminders(&self, now: NaiveDateTime) -> Vec<&Habit> {
        reminder::due_reminders(&self.habits, now)
    }

    // --- scalar flags and pass-through records ---

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
        self.write_through(DARK_MODE_KEY, serde_json::Value::Bool(enabled));
    }

    /// `None` until the user has answered the notification prompt
    pub fn notifications_enabled(&self) -> Option<bool> {
        self.notifications_enabled
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.notifications_enabled = Some(enabled);
        self.write_through(NOTIFICATIONS_KEY, serde_json::Value::Bool(enabled));
    }

    /// Project records owned by the (out-of-scope) projects screen
    pub fn projects(&self) -> &serde_json::Value {
        &self.projects
    }

    pub fn set_projects(&mut self, projects: serde_json::Value) {
        self.projects = projects;
        self.write_through(PROJECTS_KEY, self.projects.clone());
    }

    // --- persistence helpers ---

    fn habits_from_value(value: serde_json::Value) -> BTreeMap<HabitId, Habit> {
        let mut habits = BTreeMap::new();
        let serde_json::Value::Object(entries) = value else {
            tracing::warn!("habits record is not an object, starting empty");
            return habits;
        };

        for (key, raw) in entries {
            match serde_json::from_value::<Habit>(raw) {
                Ok(mut habit) => match habit.sanitize(&key) {
                    Ok(()) => {
                        habits.insert(habit.id.clone(), habit);
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "dropping unusable habit record");
                    }
                },
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "dropping corrupt habit record");
                }
            }
        }
        habits
    }

    fn persist_habits(&self) {
        match serde_json::to_value(&self.habits) {
            Ok(record) => self.write_through(HABITS_KEY, record),
            Err(e) => tracing::warn!(error = %e, "failed to serialize habits"),
        }
    }

    fn persist_history(&self) {
        match serde_json::to_value(&self.history) {
            Ok(record) => self.write_through(HISTORY_KEY, record),
            Err(e) => tracing::warn!(error = %e, "failed to serialize history"),
        }
    }

    fn write_through(&self, key: &str, record: serde_json::Value) {
        if let Err(e) = self.store.save(key, &record) {
            // The in-memory effect stands; storage catches up on the next
            // successful save.
            tracing::warn!(key, error = %e, "save failed, proceeding unpersisted");
        }
    }
}

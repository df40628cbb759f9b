/// Progress update operation
///
/// Applies a bounded increment/decrement to the current period's progress and
/// keeps today's live history snapshot and the streak counters in step.

use chrono::NaiveDateTime;

use crate::domain::dates::date_key;
use crate::domain::{apply_streak_update, Habit, PeriodRecord};

/// Outcome of a progress delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Delta applied; `completed` is the period's state afterwards
    Applied { completed: bool },
    /// Delta would leave progress outside `0..=target`; state untouched
    Rejected,
}

impl ProgressUpdate {
    pub fn is_applied(&self) -> bool {
        matches!(self, ProgressUpdate::Applied { .. })
    }
}

/// Apply a progress delta to a habit
///
/// A delta that would take progress below zero or above the target is a
/// silent no-op. On success the period-open marker is re-based to `now`
/// (a same-period edit must not trigger a rollover), and today's history
/// entry is overwritten with the new live snapshot. Unlike closed-period
/// snapshots, today's period is still in progress and always overwritable.
///
/// Streak counters change only on transitions: reaching the target credits
/// today (guarded against double-crediting), dropping back below it clears
/// the streak. Same-day toggling therefore settles on whatever the latest
/// state is instead of accumulating.
pub fn apply_progress_delta(habit: &mut Habit, delta: i64, now: NaiveDateTime) -> ProgressUpdate {
    let next = habit.progress as i64 + delta;
    if next < 0 || next > habit.target as i64 {
        return ProgressUpdate::Rejected;
    }

    let was_complete = habit.is_complete();
    habit.progress = next as u32;
    habit.last_updated = Some(now);

    let today = date_key(now);
    let completed = habit.is_complete();
    habit.history.insert(
        today.clone(),
        PeriodRecord {
            completed,
            progress: habit.progress,
            target: habit.target,
        },
    );

    if completed && !was_complete {
        if habit.last_streak_date.as_ref() != Some(&today) {
            apply_streak_update(habit, &today, true);
        }
    } else if was_complete && !completed {
        apply_streak_update(habit, &today, false);
    }

    ProgressUpdate::Applied { completed }
}

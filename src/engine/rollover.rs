/// Period rollover engine
///
/// Scans every habit against the current instant, closes periods whose
/// cadence boundary has been crossed since the habit was last touched, and
/// opens the new period. Runs on every app start/resume, so it must cope
/// with state persisted days or months earlier and must be idempotent within
/// a session.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::domain::dates::{date_key, period_crossed};
use crate::domain::{apply_streak_update, Habit, HabitId, PeriodRecord};

/// Result of a rollover evaluation pass
///
/// `changed` tells the caller to persist and to run the global-history
/// recording sweep; the counts exist for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloverOutcome {
    pub changed: bool,
    pub periods_closed: usize,
    pub repaired: usize,
}

/// Evaluate every habit's period boundary against `now`
///
/// For each habit whose boundary was crossed, the outgoing period (keyed by
/// the date of `last_updated`) is archived, the streak is settled, and
/// progress is reset with the new period opened at `now`. Habits missing
/// `last_updated` are legacy records: they are repaired in place without
/// closing any period.
pub fn evaluate_rollovers(
    habits: &mut BTreeMap<HabitId, Habit>,
    now: NaiveDateTime,
) -> RolloverOutcome {
    let mut outcome = RolloverOutcome::default();

    for habit in habits.values_mut() {
        let Some(last_updated) = habit.last_updated else {
            // Record predates period tracking: open a period now, close
            // nothing. The weekly cadence default was already applied when
            // the record was deserialized.
            habit.last_updated = Some(now);
            outcome.changed = true;
            outcome.repaired += 1;
            tracing::debug!(habit = %habit.id, "repaired habit without a period marker");
            continue;
        };

        if !period_crossed(habit.reset_frequency, last_updated, now) {
            continue;
        }

        let closing_key = date_key(last_updated);
        let was_completed = habit.is_complete();

        // Never overwrite an existing snapshot: within one session the same
        // closing period could otherwise be processed twice.
        habit.history.entry(closing_key.clone()).or_insert(PeriodRecord {
            completed: was_completed,
            progress: habit.progress,
            target: habit.target,
        });

        if was_completed {
            if habit.last_streak_date.as_ref() != Some(&closing_key) {
                apply_streak_update(habit, &closing_key, true);
            }
        } else {
            // An incomplete period always clears the streak, even if it was
            // already clear.
            apply_streak_update(habit, &closing_key, false);
        }

        habit.progress = 0;
        habit.last_updated = Some(now);
        outcome.changed = true;
        outcome.periods_closed += 1;

        tracing::debug!(
            habit = %habit.id,
            period = %closing_key,
            completed = was_completed,
            streak = habit.streak,
            "closed period"
        );
    }

    outcome
}

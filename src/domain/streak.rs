/// Streak accounting
///
/// A streak counts consecutive fully-completed periods. The rules are
/// deliberately strict: no partial credit and no grace periods, a single
/// missed period fully resets the count.

use crate::domain::{DateKey, Habit};

/// Streak lengths celebrated by the UI; detection is a pure read of `streak`
pub const STREAK_MILESTONES: [u32; 7] = [7, 14, 21, 30, 60, 90, 100];

/// Apply a period outcome to a habit's streak counters
///
/// `completed = true` credits the period and records it in
/// `last_streak_date`; `completed = false` clears both. Callers guard the
/// credit path with `last_streak_date != period_key` so a period is never
/// counted twice. The clear path needs no guard because clearing is
/// idempotent.
pub fn apply_streak_update(habit: &mut Habit, period_key: &DateKey, completed: bool) {
    if completed {
        habit.streak += 1;
        habit.last_streak_date = Some(period_key.clone());
    } else {
        habit.streak = 0;
        habit.last_streak_date = None;
    }
}

/// The milestone hit at exactly this streak length, if any
pub fn milestone_reached(streak: u32) -> Option<u32> {
    STREAK_MILESTONES.iter().copied().find(|&m| m == streak)
}

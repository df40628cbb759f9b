/// Reminder matching and the periodic tick source
///
/// The engine only decides *when* a reminder matches; delivering the
/// notification is an injected capability. The tick source runs on a
/// background thread but owns no habit state: it just sends unit ticks over
/// a channel so the single logical thread of control can run the check.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::domain::{Habit, HabitId};

/// Interval between reminder checks; reminder times have minute granularity,
/// so one check per minute is sufficient
pub const REMINDER_TICK: Duration = Duration::from_secs(60);

/// Consumer of matched reminders, injected by the frontend
pub trait ReminderNotifier {
    fn notify(&self, habit: &Habit);
}

/// Habits whose enabled reminder matches the current minute
pub fn due_reminders(habits: &BTreeMap<HabitId, Habit>, now: NaiveDateTime) -> Vec<&Habit> {
    habits
        .values()
        .filter(|habit| habit.reminder_enabled)
        .filter(|habit| {
            habit
                .reminder_time
                .is_some_and(|time| time.matches(now.time()))
        })
        .collect()
}

/// Restartable fixed-interval tick source
///
/// `start` replaces any running ticker; `stop` is idempotent. The receiving
/// end is dropped on stop, after which the background thread notices its
/// sends fail and exits by the next interval.
#[derive(Default)]
pub struct ReminderTicker {
    handle: Option<(JoinHandle<()>, Receiver<()>)>,
}

impl ReminderTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking at `interval`, restarting if already running
    ///
    /// The current run's ticks are consumed via [`ticks`](Self::ticks).
    pub fn start(&mut self, interval: Duration) {
        self.stop();
        let (tx, rx): (Sender<()>, Receiver<()>) = mpsc::channel();
        let handle = thread::spawn(move || {
            // First check fires immediately, matching the behavior of
            // checking once on startup and then every interval.
            loop {
                if tx.send(()).is_err() {
                    break;
                }
                thread::sleep(interval);
            }
        });
        self.handle = Some((handle, rx));
        tracing::debug!(interval_secs = interval.as_secs(), "reminder ticker started");
    }

    /// Tick stream for the current run, if the ticker is running
    pub fn ticks(&self) -> Option<&Receiver<()>> {
        self.handle.as_ref().map(|(_, rx)| rx)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop ticking; safe to call whether or not the ticker is running
    pub fn stop(&mut self) {
        if let Some((handle, rx)) = self.handle.take() {
            drop(rx);
            // The thread exits on its next send; detach rather than block
            // for up to a full interval.
            drop(handle);
            tracing::debug!("reminder ticker stopped");
        }
    }
}

impl Drop for ReminderTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// App lifecycle tests against a real JSON file store
use atomic_momentum::*;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use tempfile::TempDir;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn open_app(dir: &TempDir, now: NaiveDateTime) -> MomentumApp {
    let store = JsonFileStore::new(dir.path()).expect("store init");
    MomentumApp::open(Box::new(store), now).expect("app open")
}

#[test]
fn test_habits_persist_across_sessions() {
    let dir = TempDir::new().unwrap();
    let now = at(2024, 3, 5);

    let mut app = open_app(&dir, now);
    let id = app
        .create_habit(
            "Read".to_string(),
            "#009688".to_string(),
            None,
            Category::Mind,
            5,
            ResetFrequency::Daily,
            now,
        )
        .unwrap();
    app.adjust_progress(&id, 2, now).unwrap();
    drop(app);

    let app = open_app(&dir, now);
    let habit = app.habit(&id).expect("habit survived reload");
    assert_eq!(habit.name, "Read");
    assert_eq!(habit.progress, 2);
    assert_eq!(habit.target, 5);
}

#[test]
fn test_rollover_runs_on_reopen_days_later() {
    let dir = TempDir::new().unwrap();
    let day1 = at(2024, 3, 5);

    let mut app = open_app(&dir, day1);
    let id = app
        .create_habit(
            "Stretch".to_string(),
            String::new(),
            None,
            Category::Body,
            2,
            ResetFrequency::Daily,
            day1,
        )
        .unwrap();
    app.adjust_progress(&id, 2, day1).unwrap();
    drop(app);

    // The user doesn't open the app again until three days later.
    let day4 = at(2024, 3, 8);
    let app = open_app(&dir, day4);
    let habit = app.habit(&id).unwrap();

    let day1_key = DateKey::parse("2024-03-05").unwrap();
    assert_eq!(
        habit.history.get(&day1_key),
        Some(&PeriodRecord { completed: true, progress: 2, target: 2 })
    );
    assert_eq!(habit.progress, 0);
    assert_eq!(habit.last_updated, Some(day4));
    assert_eq!(
        app.completion_status(&id, &day1_key),
        Some(CompletionStatus::Completed)
    );

    // The startup sweep stamped today's (empty) status into global history.
    let day4_key = DateKey::parse("2024-03-08").unwrap();
    assert_eq!(
        app.completion_status(&id, &day4_key),
        Some(CompletionStatus::NotCompleted)
    );
    drop(app);

    // Reopening the same day changes nothing further.
    let mut app = open_app(&dir, day4);
    assert!(!app.evaluate_rollovers(day4).changed);
}

#[test]
fn test_completion_updates_global_history_immediately() {
    let dir = TempDir::new().unwrap();
    let now = at(2024, 3, 5);

    let mut app = open_app(&dir, now);
    let id = app
        .create_habit(
            "Meditate".to_string(),
            String::new(),
            None,
            Category::Spirit,
            1,
            ResetFrequency::Daily,
            now,
        )
        .unwrap();
    let update = app.adjust_progress(&id, 1, now).unwrap();
    assert_eq!(update, ProgressUpdate::Applied { completed: true });
    drop(app);

    let app = open_app(&dir, now);
    let today = DateKey::parse("2024-03-05").unwrap();
    assert_eq!(
        app.completion_status(&id, &today),
        Some(CompletionStatus::Completed)
    );
    assert_eq!(
        app.day_summary(&today, None),
        DaySummary { completed: 1, not_completed: 0 }
    );
}

#[test]
fn test_corrupt_habit_store_recovers_to_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("habits.json"), b"{{{ definitely not json").unwrap();

    let app = open_app(&dir, at(2024, 3, 5));
    assert!(app.habits().is_empty());
}

#[test]
fn test_corrupt_entries_are_dropped_but_good_ones_survive() {
    let dir = TempDir::new().unwrap();
    let record = json!({
        "habit_good": { "name": "Walk", "target": 3, "progress": 1 },
        "habit_bad": { "name": "", "target": 3 },
        "habit_worse": "not an object"
    });
    std::fs::write(
        dir.path().join("habits.json"),
        serde_json::to_vec(&record).unwrap(),
    )
    .unwrap();

    let app = open_app(&dir, at(2024, 3, 5));
    assert_eq!(app.habits().len(), 1);
    let habit = app.habit(&HabitId::from_string("habit_good")).unwrap();
    assert_eq!(habit.name, "Walk");
}

#[test]
fn test_legacy_record_is_repaired_and_persisted_on_open() {
    let dir = TempDir::new().unwrap();
    // A record written before period tracking existed: no id field, no
    // last_updated, no cadence.
    let record = json!({
        "habit_1_1600000000": { "name": "Journal", "target": 7, "progress": 4 }
    });
    std::fs::write(
        dir.path().join("habits.json"),
        serde_json::to_vec(&record).unwrap(),
    )
    .unwrap();

    let now = at(2024, 3, 5);
    let app = open_app(&dir, now);
    let id = HabitId::from_string("habit_1_1600000000");
    let habit = app.habit(&id).unwrap();
    assert_eq!(habit.reset_frequency, ResetFrequency::Weekly);
    assert_eq!(habit.last_updated, Some(now));
    assert!(habit.history.is_empty());
    assert_eq!(habit.progress, 4);
    drop(app);

    // The repair was written through; a second open finds it intact.
    let app = open_app(&dir, now);
    assert_eq!(app.habit(&id).unwrap().last_updated, Some(now));
}

#[test]
fn test_delete_is_permanent() {
    let dir = TempDir::new().unwrap();
    let now = at(2024, 3, 5);

    let mut app = open_app(&dir, now);
    let id = app
        .create_habit(
            "Temp".to_string(),
            String::new(),
            None,
            Category::Other,
            1,
            ResetFrequency::Daily,
            now,
        )
        .unwrap();
    app.delete_habit(&id).unwrap();
    assert!(matches!(
        app.delete_habit(&id),
        Err(AppError::HabitNotFound(_))
    ));
    drop(app);

    let app = open_app(&dir, now);
    assert!(app.habit(&id).is_none());
}

#[test]
fn test_flags_round_trip() {
    let dir = TempDir::new().unwrap();
    let now = at(2024, 3, 5);

    let mut app = open_app(&dir, now);
    assert!(!app.dark_mode());
    assert_eq!(app.notifications_enabled(), None);
    app.set_dark_mode(true);
    app.set_notifications_enabled(false);
    drop(app);

    let app = open_app(&dir, now);
    assert!(app.dark_mode());
    assert_eq!(app.notifications_enabled(), Some(false));
}

#[test]
fn test_projects_record_passes_through_untouched() {
    let dir = TempDir::new().unwrap();
    let projects = json!([{ "name": "Garden", "tasks": 3 }]);
    std::fs::write(
        dir.path().join("projects.json"),
        serde_json::to_vec(&projects).unwrap(),
    )
    .unwrap();

    let app = open_app(&dir, at(2024, 3, 5));
    assert_eq!(*app.projects(), projects);
}

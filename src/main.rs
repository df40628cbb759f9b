/// Main entry point for the Atomic Momentum CLI
///
/// Sets up logging, resolves the data directory, opens the app (which settles
/// any pending period rollovers), and dispatches the subcommand.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use tracing::info;

use atomic_momentum::{
    milestone_reached, Category, DateKey, Habit, HabitId, HabitUpdate, JsonFileStore,
    MomentumApp, ProgressUpdate, ReminderNotifier, ReminderTicker, ReminderTime,
    ResetFrequency, REMINDER_TICK,
};

/// Get the default data directory with a fallback strategy
fn default_data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        dirs::home_dir().map(|mut p| {
            p.push(".atomic_momentum");
            p
        }),
        dirs::data_dir().map(|mut p| {
            p.push("atomic_momentum");
            p
        }),
        dirs::config_dir().map(|mut p| {
            p.push("atomic_momentum");
            p
        }),
        std::env::current_dir().ok().map(|mut p| {
            p.push(".atomic_momentum");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.clone());
            }
        }
    }

    // Ultimate fallback: a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("atomic_momentum");
    std::fs::create_dir_all(&temp_path)?;
    tracing::warn!("Using temporary directory for data: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for the Atomic Momentum CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the persisted habit data
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all habits with progress and streaks
    List,
    /// Create a new habit
    Add {
        name: String,
        /// Goal count for each period
        #[arg(long, default_value_t = 7)]
        target: u32,
        /// Reset cadence: daily, weekly, or monthly
        #[arg(long, default_value = "weekly")]
        frequency: String,
        #[arg(long, default_value = "")]
        color: String,
        #[arg(long)]
        icon: Option<String>,
        /// Life area: mind, body, spirit, or other
        #[arg(long, default_value = "other")]
        category: String,
        /// Daily reminder time as HH:MM
        #[arg(long)]
        remind_at: Option<String>,
    },
    /// Increment a habit's progress
    Up { habit: String },
    /// Decrement a habit's progress
    Down { habit: String },
    /// Delete a habit and its history permanently
    Remove { habit: String },
    /// Show a habit's completion status for a date (defaults to today)
    Status {
        habit: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Record today's status for all habits into the global history
    Record,
    /// Run the minute reminder loop, printing due reminders
    Watch,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("atomic_momentum={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    let data_dir = match args.data_dir {
        Some(path) => path,
        None => default_data_dir()?,
    };
    info!("Using data directory: {}", data_dir.display());

    let store = JsonFileStore::new(data_dir)?;
    let now = Local::now().naive_local();
    let mut app = MomentumApp::open(Box::new(store), now)?;

    match args.command {
        Command::List => {
            for habit in app.habits().values() {
                println!(
                    "{:<36}  {:<20} {:>3}/{:<3} {:<8} streak {}",
                    habit.id,
                    habit.name,
                    habit.progress,
                    habit.target,
                    habit.reset_frequency.display_name(),
                    habit.streak
                );
            }
        }
        Command::Add {
            name,
            target,
            frequency,
            color,
            icon,
            category,
            remind_at,
        } => {
            let frequency = parse_frequency(&frequency)?;
            let category = parse_category(&category)?;
            let id = app.create_habit(name, color, icon, category, target, frequency, now)?;
            if let Some(time) = remind_at {
                let time = ReminderTime::parse(&time)?;
                app.update_habit(
                    &id,
                    HabitUpdate {
                        reminder_time: Some(Some(time)),
                        reminder_enabled: Some(true),
                        ..HabitUpdate::default()
                    },
                )?;
            }
            println!("Created habit {}", id);
        }
        Command::Up { habit } => {
            let id = resolve_habit(&app, &habit)?;
            let update = app.adjust_progress(&id, 1, now)?;
            report_update(&app, &id, update);
        }
        Command::Down { habit } => {
            let id = resolve_habit(&app, &habit)?;
            let update = app.adjust_progress(&id, -1, now)?;
            report_update(&app, &id, update);
        }
        Command::Remove { habit } => {
            let id = resolve_habit(&app, &habit)?;
            app.delete_habit(&id)?;
            println!("Removed habit {}", id);
        }
        Command::Status { habit, date } => {
            let id = resolve_habit(&app, &habit)?;
            let date = match date {
                Some(s) => DateKey::parse(&s)?,
                None => DateKey::from(now.date()),
            };
            match app.completion_status(&id, &date) {
                Some(status) if status.is_completed() => println!("{}: completed", date),
                Some(_) => println!("{}: not completed", date),
                None => println!("{}: no data", date),
            }
        }
        Command::Record => {
            app.record_daily_status(now);
            println!("Recorded daily status for {} habits", app.habits().len());
        }
        Command::Watch => {
            watch(&mut app)?;
        }
    }

    Ok(())
}

/// Prints reminders to the terminal; a desktop frontend would swap in a
/// notification backend here
struct StdoutNotifier;

impl ReminderNotifier for StdoutNotifier {
    fn notify(&self, habit: &Habit) {
        println!("Reminder: {} ({}/{})", habit.name, habit.progress, habit.target);
    }
}

/// Reminder loop: one rollover + reminder check per ticker tick
fn watch(app: &mut MomentumApp) -> Result<(), Box<dyn std::error::Error>> {
    let notifier = StdoutNotifier;
    let mut ticker = ReminderTicker::new();
    ticker.start(REMINDER_TICK);
    info!("Reminder loop running, checking once per minute");

    while let Some(ticks) = ticker.ticks() {
        if ticks.recv().is_err() {
            break;
        }
        let now: NaiveDateTime = Local::now().naive_local();
        app.evaluate_rollovers(now);
        for habit in app.due_reminders(now) {
            notifier.notify(habit);
        }
    }
    Ok(())
}

fn report_update(app: &MomentumApp, id: &HabitId, update: ProgressUpdate) {
    let Some(habit) = app.habit(id) else {
        return;
    };
    match update {
        ProgressUpdate::Applied { completed: true } => {
            println!("{}: {}/{} done!", habit.name, habit.progress, habit.target);
            if let Some(milestone) = milestone_reached(habit.streak) {
                println!("{} day streak milestone!", milestone);
            }
        }
        ProgressUpdate::Applied { completed: false } => {
            println!("{}: {}/{}", habit.name, habit.progress, habit.target);
        }
        ProgressUpdate::Rejected => {
            println!("{}: already at the limit", habit.name);
        }
    }
}

/// Resolve a habit by id or exact name
fn resolve_habit(app: &MomentumApp, selector: &str) -> Result<HabitId, String> {
    let by_id = HabitId::from_string(selector);
    if app.habit(&by_id).is_some() {
        return Ok(by_id);
    }
    let mut matches = app
        .habits()
        .values()
        .filter(|h| h.name.eq_ignore_ascii_case(selector));
    match (matches.next(), matches.next()) {
        (Some(habit), None) => Ok(habit.id.clone()),
        (Some(_), Some(_)) => Err(format!("Ambiguous habit name: {}", selector)),
        (None, _) => Err(format!("Habit not found: {}", selector)),
    }
}

fn parse_frequency(s: &str) -> Result<ResetFrequency, String> {
    match s.to_ascii_lowercase().as_str() {
        "daily" => Ok(ResetFrequency::Daily),
        "weekly" => Ok(ResetFrequency::Weekly),
        "monthly" => Ok(ResetFrequency::Monthly),
        other => Err(format!("Unknown frequency: {}", other)),
    }
}

fn parse_category(s: &str) -> Result<Category, String> {
    match s.to_ascii_lowercase().as_str() {
        "mind" => Ok(Category::Mind),
        "body" => Ok(Category::Body),
        "spirit" => Ok(Category::Spirit),
        "other" => Ok(Category::Other),
        other => Err(format!("Unknown category: {}", other)),
    }
}

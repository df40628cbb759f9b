/// Engine module: the stateful operations layered on the domain types
///
/// Contains the period rollover scan, the bounded progress-delta operation,
/// and the completion-history query layer. All entry points take `now`
/// explicitly so behavior is evaluable against any injected instant.

pub mod history;
pub mod progress;
pub mod rollover;

pub use history::{
    completion_status, day_summary, record_daily_status, DaySummary, GlobalHistory,
};
pub use progress::{apply_progress_delta, ProgressUpdate};
pub use rollover::{evaluate_rollovers, RolloverOutcome};

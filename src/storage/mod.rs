/// Storage layer: the keyed-record persistence port
///
/// The engine depends only on the `RecordStore` trait: load/save of opaque
/// JSON records under well-known keys. The concrete implementation is a
/// one-file-per-key JSON store, but tests or alternative frontends can inject
/// anything that satisfies the contract.

pub mod json;

pub use json::JsonFileStore;

use thiserror::Error;

/// Persisted record keys
pub const HABITS_KEY: &str = "habits";
pub const HISTORY_KEY: &str = "habit_history";
pub const PROJECTS_KEY: &str = "projects";
pub const DARK_MODE_KEY: &str = "dark_mode";
pub const NOTIFICATIONS_KEY: &str = "notifications_enabled";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Load/save contract the engine persists through
///
/// Corrupt stored data is not an error at this boundary: implementations
/// report it as an absent record (logging the discard) and the caller falls
/// back to defaults. Errors are reserved for failures to read or write the
/// underlying medium.
pub trait RecordStore {
    /// Load the record stored under `key`, or `None` if absent
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Store `record` under `key`, replacing any previous value
    fn save(&self, key: &str, record: &serde_json::Value) -> Result<(), StorageError>;
}
